// src/services/fatwas.rs

//! Fatwa scraper service.
//!
//! One listing pass, then every article page in listing order with a delay
//! between requests.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::models::{Config, Document, SENTINEL_CONTENT};
use crate::services::content::ContentExtractor;
use crate::services::listing::{ListingScraper, body_preview};
use crate::utils::http::{create_async_client, fetch_page_async};

/// Summary of a scrape cycle.
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub documents: Vec<Document>,
    pub row_selector: Option<String>,
    pub content_failures: usize,
}

/// Service for scraping the fatwa listing and its articles.
pub struct FatwaScraper {
    config: Arc<Config>,
    client: Client,
    listing: ListingScraper,
    content: ContentExtractor,
}

impl FatwaScraper {
    /// Create a scraper, compiling every selector chain up front.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = create_async_client(&config.crawler)?;
        Self::with_client(config, client)
    }

    /// Create a scraper around an existing HTTP client.
    pub fn with_client(config: Arc<Config>, client: Client) -> Result<Self> {
        let listing = ListingScraper::new(&config.selectors, &config.source)?;
        let content = ContentExtractor::new(&config.selectors, &config.crawler)?;
        Ok(Self {
            config,
            client,
            listing,
            content,
        })
    }

    /// Scrape the listing and fill in every article body.
    ///
    /// A listing failure aborts the cycle. An article failure stores the
    /// sentinel content and moves on.
    pub async fn fetch_all(&self) -> Result<ScrapeOutcome> {
        let listing_url = self.config.source.listing_url()?;
        let listing_timeout = Duration::from_secs(self.config.crawler.listing_timeout_secs);
        log::info!("Scraping page: {}", listing_url);

        let pass = {
            let page = fetch_page_async(&self.client, &listing_url, listing_timeout).await?;
            let pass = self.listing.extract(&page);
            if pass.documents.is_empty() {
                log::warn!(
                    "No articles found with any selector. Page content preview:\n{}",
                    body_preview(&page, self.config.crawler.diagnostic_preview_chars)
                );
            }
            pass
        };

        let mut outcome = ScrapeOutcome {
            row_selector: pass.row_selector,
            ..ScrapeOutcome::default()
        };
        let total = pass.documents.len();
        let delay = Duration::from_millis(self.config.crawler.request_delay_ms);

        for (index, mut document) in pass.documents.into_iter().enumerate() {
            match self.content.fetch(&self.client, &document.url).await {
                Ok(content) => document.content = content,
                Err(error) => {
                    outcome.content_failures += 1;
                    if error.is_per_article() {
                        log::warn!("Error extracting content from {}: {}", document.url, error);
                    } else {
                        log::error!("Unexpected error for {}: {}", document.url, error);
                    }
                    document.content = SENTINEL_CONTENT.to_string();
                }
            }
            log::info!("Processed article {}/{}: {}", index + 1, total, document.title);
            outcome.documents.push(document);

            if !delay.is_zero() && index + 1 < total {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(outcome)
    }
}
