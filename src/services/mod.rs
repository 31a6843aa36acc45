//! Service layer.
//!
//! This module contains the business logic for:
//! - Selector fallback chains (`SelectorChain`)
//! - Listing extraction (`ListingScraper`)
//! - Article body extraction (`ContentExtractor`)
//! - Full scrape cycles (`FatwaScraper`)
//! - Corpus search and serving (`Corpus`, `CorpusHandle`, `search`)
//! - Message chunking (`split_text`)

pub mod chunker;
pub mod content;
pub mod corpus;
mod fatwas;
pub mod listing;
pub mod metadata;
pub mod search;
pub mod selectors;

pub use chunker::split_text;
pub use content::{ContentExtractor, normalize_content};
pub use corpus::{Corpus, CorpusHandle, format_category_summary};
pub use fatwas::{FatwaScraper, ScrapeOutcome};
pub use listing::{ListingPass, ListingScraper};
pub use search::{SearchMode, SearchResults, search};
pub use selectors::SelectorChain;
