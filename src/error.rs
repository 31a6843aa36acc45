// src/error.rs

//! Unified error handling for the scraper and the bot.

use std::fmt;

use thiserror::Error;

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client error outside of page fetching (bot API calls)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// CSV reading or writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Page fetch failed at the transport level or with a non-200 status
    #[error("Network error for {url}: {message}")]
    Network {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// Page body could not be turned into a document
    #[error("Parse error for {url}: {message}")]
    Parse { url: String, message: String },

    /// No body locator matched on an article page
    #[error("Article body not found at {0}")]
    Extraction(String),

    /// Corpus file could not be opened
    #[error("Store unavailable at {path}: {message}")]
    StoreUnavailable { path: String, message: String },

    /// Corpus file has no data rows
    #[error("Corpus at {0} must have a header and at least one data row")]
    EmptyCorpus(String),

    /// Search was attempted with blank query text
    #[error("Query must not be empty")]
    EmptyQuery,

    /// Bot API answered with `ok: false`
    #[error("Telegram API error in {method}: {message}")]
    Telegram { method: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a network error, keeping the status when there is one.
    pub fn network(url: impl Into<String>, status: Option<u16>, message: impl fmt::Display) -> Self {
        Self::Network {
            url: url.into(),
            status,
            message: message.to_string(),
        }
    }

    /// Create a parse error.
    pub fn parse(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a store-unavailable error.
    pub fn store_unavailable(path: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::StoreUnavailable {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether a scrape cycle may continue past this error for a single article.
    pub fn is_per_article(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Parse { .. } | Self::Extraction(_)
        )
    }
}
