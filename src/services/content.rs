// src/services/content.rs

//! Article body extraction.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, SelectorChains};
use crate::services::selectors::{SelectorChain, visible_text};
use crate::utils::http::fetch_page_async;

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newline pattern is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Fetches article pages and pulls out their normalized body text.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    body: SelectorChain,
    timeout: Duration,
}

impl ContentExtractor {
    /// Compile the body chain.
    pub fn new(selectors: &SelectorChains, config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            body: SelectorChain::parse("body", &selectors.body)?,
            timeout: Duration::from_secs(config.article_timeout_secs),
        })
    }

    /// Fetch an article and extract its body.
    pub async fn fetch(&self, client: &Client, url: &str) -> Result<String> {
        let page = fetch_page_async(client, url, self.timeout).await?;
        self.extract_from(&page, url)
    }

    /// Extract the body from an already parsed article page.
    ///
    /// Text of every element matched by the winning candidate is joined.
    pub fn extract_from(&self, document: &Html, url: &str) -> Result<String> {
        let (candidate, elements) = self
            .body
            .first_in_document(document)
            .ok_or_else(|| AppError::Extraction(url.to_string()))?;

        let raw: String = elements.into_iter().map(visible_text).collect();
        let content = normalize_content(&raw);
        if content.is_empty() {
            return Err(AppError::Extraction(url.to_string()));
        }

        log::debug!(
            "Extracted {} chars from {} via '{}'",
            content.chars().count(),
            url,
            candidate
        );
        Ok(content)
    }
}

/// Normalize article text: long newline runs shrink to a paragraph break,
/// every whitespace run becomes one space, ends are trimmed.
pub fn normalize_content(text: &str) -> String {
    let text = EXCESS_NEWLINES.replace_all(text, "\n\n");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ContentExtractor {
        ContentExtractor::new(&SelectorChains::default(), &CrawlerConfig::default()).unwrap()
    }

    #[test]
    fn test_normalize_content() {
        assert_eq!(
            normalize_content("  Soalan:\n\n\n\n  Apakah   hukum\t\tnya?  "),
            "Soalan: Apakah hukum nya?"
        );
        assert_eq!(normalize_content(" \n\t "), "");
    }

    #[test]
    fn test_primary_locator() {
        let html = Html::parse_document(
            r#"<div class="content">sidebar</div>
               <div itemprop="articleBody"><p>Soalan.</p>
               <p>Jawapan   panjang.</p></div>"#,
        );
        let content = extractor().extract_from(&html, "u").unwrap();
        assert_eq!(content, "Soalan. Jawapan panjang.");
    }

    #[test]
    fn test_fallback_locator() {
        let html = Html::parse_document(
            r#"<div id="article-content"><p>Isi fatwa</p><script>track()</script></div>"#,
        );
        let content = extractor().extract_from(&html, "u").unwrap();
        assert_eq!(content, "Isi fatwa");
    }

    #[test]
    fn test_joins_all_matches_of_winning_locator() {
        let html = Html::parse_document(
            r#"<div class="article-body">Bahagian satu.</div>
               <div class="article-body"> Bahagian dua.</div>"#,
        );
        let content = extractor().extract_from(&html, "u").unwrap();
        assert_eq!(content, "Bahagian satu. Bahagian dua.");
    }

    #[test]
    fn test_missing_body_is_extraction_error() {
        let html = Html::parse_document("<main>Tiada</main>");
        match extractor().extract_from(&html, "https://x.my/1-a") {
            Err(AppError::Extraction(url)) => assert_eq!(url, "https://x.my/1-a"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_blank_body_is_extraction_error() {
        let html = Html::parse_document(r#"<div itemprop="articleBody">   </div>"#);
        assert!(matches!(
            extractor().extract_from(&html, "u"),
            Err(AppError::Extraction(_))
        ));
    }
}
