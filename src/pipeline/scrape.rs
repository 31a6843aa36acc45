// src/pipeline/scrape.rs

//! Scrape cycle: listing, articles, store.

use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::models::Config;
use crate::services::{FatwaScraper, ScrapeOutcome};
use crate::storage::CsvStorage;

/// Run one scrape cycle and persist its result.
///
/// A cycle that finds no documents leaves the existing store untouched.
pub async fn run_scrape(config: Arc<Config>) -> Result<ScrapeOutcome> {
    let start_time = Utc::now();
    log::info!("Starting scrape cycle");

    let scraper = FatwaScraper::new(Arc::clone(&config))?;
    let outcome = scraper.fetch_all().await?;

    if outcome.documents.is_empty() {
        log::warn!(
            "No articles found; keeping {}",
            config.store.path.display()
        );
        return Ok(outcome);
    }

    let storage = CsvStorage::new(&config.store.path);
    let written = storage.save(&outcome.documents)?;

    let elapsed = Utc::now() - start_time;
    log::info!(
        "Scrape complete: {} articles ({} without content) via '{}' in {}s",
        written,
        outcome.content_failures,
        outcome.row_selector.as_deref().unwrap_or("-"),
        elapsed.num_seconds()
    );

    Ok(outcome)
}
