//! Pipeline entry points.
//!
//! - `run_scrape`: one scrape cycle written to the store
//! - `run_schedule`: monthly scrapes published to the serving corpus
//! - `run_serve`: the bot, with the scheduler alongside

pub mod schedule;
pub mod scrape;
pub mod serve;

pub use schedule::{next_run_after, run_schedule};
pub use scrape::run_scrape;
pub use serve::run_serve;
