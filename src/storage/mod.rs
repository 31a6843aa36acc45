//! Corpus persistence.
//!
//! The corpus is a single flat CSV file that each scrape cycle rewrites
//! wholesale and the bot reads once at startup.

pub mod local;

// Re-export for convenience
pub use local::{CsvStorage, HEADER};
