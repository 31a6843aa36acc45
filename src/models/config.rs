//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::SelectorChains;

/// Environment variable holding the bot token.
pub const ENV_BOT_TOKEN: &str = "BOT_TOKEN";

/// Environment variable holding the source site base URL.
pub const ENV_SOURCE_URL: &str = "MUFTIWP_URL";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and scraping behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Listing source description
    #[serde(default)]
    pub source: SourceConfig,

    /// Selector fallback chains
    #[serde(default)]
    pub selectors: SelectorChains,

    /// Corpus file location
    #[serde(default)]
    pub store: StoreConfig,

    /// Bot transport and rendering settings
    #[serde(default)]
    pub bot: BotConfig,

    /// Periodic scrape settings
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary lookup (used by tests).
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(ENV_BOT_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.bot.token = token;
        }
        if let Some(url) = lookup(ENV_SOURCE_URL).filter(|v| !v.trim().is_empty()) {
            self.source.base_url = url;
        }
    }

    /// Bot token, failing when none was configured.
    pub fn require_token(&self) -> Result<&str> {
        let token = self.bot.token.trim();
        if token.is_empty() {
            return Err(AppError::config(format!("{ENV_BOT_TOKEN} not set")));
        }
        Ok(token)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.listing_timeout_secs == 0 || self.crawler.article_timeout_secs == 0 {
            return Err(AppError::validation("crawler timeouts must be > 0"));
        }
        if self.source.category.trim().is_empty() {
            return Err(AppError::validation("source.category is empty"));
        }
        url::Url::parse(&self.source.origin)?;

        for (field, candidates) in self.selectors.fields() {
            if candidates.is_empty() {
                return Err(AppError::validation(format!(
                    "selectors.{field} has no candidates"
                )));
            }
            for candidate in candidates {
                scraper::Selector::parse(candidate)
                    .map_err(|e| AppError::selector(candidate, format!("{e:?}")))?;
            }
        }

        if self.bot.max_message_len <= self.bot.chunk_reserve {
            return Err(AppError::validation(
                "bot.max_message_len must exceed bot.chunk_reserve",
            ));
        }
        if self.bot.max_results == 0 {
            return Err(AppError::validation("bot.max_results must be > 0"));
        }
        if self.schedule.hour > 23 {
            return Err(AppError::validation("schedule.hour must be in 0..=23"));
        }
        Ok(())
    }
}

/// HTTP client and scraping behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Accept header for HTTP requests
    #[serde(default = "defaults::accept")]
    pub accept: String,

    /// Accept-Language header for HTTP requests
    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Timeout for the listing page in seconds
    #[serde(default = "defaults::listing_timeout")]
    pub listing_timeout_secs: u64,

    /// Timeout for each article page in seconds
    #[serde(default = "defaults::article_timeout")]
    pub article_timeout_secs: u64,

    /// Delay between article requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Characters of body text logged when a listing yields nothing
    #[serde(default = "defaults::diagnostic_preview")]
    pub diagnostic_preview_chars: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            accept: defaults::accept(),
            accept_language: defaults::accept_language(),
            listing_timeout_secs: defaults::listing_timeout(),
            article_timeout_secs: defaults::article_timeout(),
            request_delay_ms: defaults::request_delay(),
            diagnostic_preview_chars: defaults::diagnostic_preview(),
        }
    }
}

/// Where the listing lives and how its entries are labelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Site base URL (normally supplied through `MUFTIWP_URL`)
    #[serde(default)]
    pub base_url: String,

    /// Listing path and query appended to the base URL
    #[serde(default = "defaults::listing_path")]
    pub listing_path: String,

    /// Origin used to absolutize relative article links
    #[serde(default = "defaults::origin")]
    pub origin: String,

    /// Category label attached to every scraped document
    #[serde(default = "defaults::category")]
    pub category: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            listing_path: defaults::listing_path(),
            origin: defaults::origin(),
            category: defaults::category(),
        }
    }
}

impl SourceConfig {
    /// Full listing URL, failing when no base URL was configured.
    pub fn listing_url(&self) -> Result<String> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(AppError::config(format!("{ENV_SOURCE_URL} not set")));
        }
        Ok(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            self.listing_path.trim_start_matches('/')
        ))
    }
}

/// Corpus file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the CSV corpus
    #[serde(default = "defaults::store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: defaults::store_path(),
        }
    }
}

/// Bot transport and rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Bot API token (normally supplied through `BOT_TOKEN`)
    #[serde(default, skip_serializing)]
    pub token: String,

    /// Bot API base URL
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Long-polling timeout in seconds
    #[serde(default = "defaults::poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Transport limit for one message, in characters
    #[serde(default = "defaults::max_message_len")]
    pub max_message_len: usize,

    /// Room kept free in each content chunk for the part header
    #[serde(default = "defaults::chunk_reserve")]
    pub chunk_reserve: usize,

    /// Maximum search results shown per query
    #[serde(default = "defaults::max_results")]
    pub max_results: usize,

    /// Characters of content shown under each search result
    #[serde(default = "defaults::result_preview")]
    pub result_preview_chars: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base: defaults::api_base(),
            poll_timeout_secs: defaults::poll_timeout(),
            max_message_len: defaults::max_message_len(),
            chunk_reserve: defaults::chunk_reserve(),
            max_results: defaults::max_results(),
            result_preview_chars: defaults::result_preview(),
        }
    }
}

impl BotConfig {
    /// Maximum length of one content chunk in a split detail view.
    pub fn chunk_limit(&self) -> usize {
        self.max_message_len.saturating_sub(self.chunk_reserve)
    }
}

/// Periodic scrape settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Run the monthly scrape while serving
    #[serde(default = "defaults::schedule_enabled")]
    pub enabled: bool,

    /// Local hour of the last day of the month at which the scrape runs
    #[serde(default = "defaults::schedule_hour")]
    pub hour: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::schedule_enabled(),
            hour: defaults::schedule_hour(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".into()
    }
    pub fn accept() -> String {
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8".into()
    }
    pub fn accept_language() -> String {
        "en-US,en;q=0.5".into()
    }
    pub fn listing_timeout() -> u64 {
        60
    }
    pub fn article_timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        1000
    }
    pub fn diagnostic_preview() -> usize {
        500
    }

    // Source defaults
    pub fn listing_path() -> String {
        "ms/artikel/irsyad-hukum/umum?filter-search=&limit=0&filter_order=&filter_order_Dir=&limitstart=&task=&filter_submit=".into()
    }
    pub fn origin() -> String {
        "https://www.muftiwp.gov.my".into()
    }
    pub fn category() -> String {
        "Irsyad Hukum - Umum".into()
    }

    // Store defaults
    pub fn store_path() -> PathBuf {
        PathBuf::from("data/fatwa.csv")
    }

    // Bot defaults
    pub fn api_base() -> String {
        "https://api.telegram.org".into()
    }
    pub fn poll_timeout() -> u64 {
        60
    }
    pub fn max_message_len() -> usize {
        4096
    }
    pub fn chunk_reserve() -> usize {
        200
    }
    pub fn max_results() -> usize {
        10
    }
    pub fn result_preview() -> usize {
        100
    }

    // Schedule defaults
    pub fn schedule_enabled() -> bool {
        true
    }
    pub fn schedule_hour() -> u32 {
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_invalid_selector() {
        let mut config = Config::default();
        config.selectors.title.push("[[invalid".to_string());
        assert!(matches!(config.validate(), Err(AppError::Selector { .. })));
    }

    #[test]
    fn validate_rejects_empty_chain() {
        let mut config = Config::default();
        config.selectors.rows.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn chunk_limit_leaves_room_for_header() {
        assert_eq!(BotConfig::default().chunk_limit(), 3896);
    }

    #[test]
    fn env_overrides_token_and_base_url() {
        let mut config = Config::default();
        config.apply_env_from(|key| match key {
            ENV_BOT_TOKEN => Some("123:abc".to_string()),
            ENV_SOURCE_URL => Some("https://www.muftiwp.gov.my/".to_string()),
            _ => None,
        });
        assert_eq!(config.require_token().unwrap(), "123:abc");
        assert!(
            config
                .source
                .listing_url()
                .unwrap()
                .starts_with("https://www.muftiwp.gov.my/ms/artikel/irsyad-hukum/umum?")
        );
    }

    #[test]
    fn missing_token_and_base_url_are_config_errors() {
        let config = Config::default();
        assert!(matches!(config.require_token(), Err(AppError::Config(_))));
        assert!(matches!(
            config.source.listing_url(),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            request_delay_ms = 0

            [schedule]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.crawler.request_delay_ms, 0);
        assert_eq!(config.crawler.article_timeout_secs, 30);
        assert!(!config.schedule.enabled);
        assert_eq!(config.bot.max_results, 10);
    }
}
