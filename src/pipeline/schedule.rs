// src/pipeline/schedule.rs

//! Monthly scrape scheduler.
//!
//! The scrape runs on the last day of every month at a fixed local hour and
//! publishes the fresh corpus to the serving handle.

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};

use crate::models::Config;
use crate::pipeline::scrape::run_scrape;
use crate::services::{Corpus, CorpusHandle};

/// Run time in the given month: last day, `hour:00:00`.
fn run_in_month(year: i32, month: u32, hour: u32) -> Option<NaiveDateTime> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()?
        .and_hms_opt(hour, 0, 0)
}

/// Next run strictly after `now`.
///
/// Returns `None` only for an hour outside `0..=23`.
pub fn next_run_after(now: NaiveDateTime, hour: u32) -> Option<NaiveDateTime> {
    let this_month = run_in_month(now.year(), now.month(), hour)?;
    if this_month > now {
        return Some(this_month);
    }
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    run_in_month(year, month, hour)
}

/// Scrape on schedule forever, publishing every non-empty result.
pub async fn run_schedule(config: Arc<Config>, corpus: Arc<CorpusHandle>) {
    let hour = config.schedule.hour;
    loop {
        let now = Local::now().naive_local();
        let Some(next) = next_run_after(now, hour) else {
            log::error!("Invalid schedule hour {}; scheduler stopped", hour);
            return;
        };
        log::info!("Next scheduled scrape at {}", next);
        let wait = (next - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;

        match run_scrape(Arc::clone(&config)).await {
            Ok(outcome) if !outcome.documents.is_empty() => {
                let fresh = Corpus::new(outcome.documents);
                let count = fresh.len();
                let previous = corpus.publish(fresh);
                log::info!(
                    "Serving refreshed corpus with {} documents (replacing {} loaded at {})",
                    count,
                    previous.len(),
                    previous.loaded_at().format("%Y-%m-%d %H:%M:%S UTC")
                );
            }
            Ok(_) => log::warn!("Scheduled scrape found nothing; keeping current corpus"),
            Err(e) => log::error!("Scheduled scrape failed: {}", e),
        }
    }
}
