//! Fatwa document structure.

use serde::{Deserialize, Serialize};

/// Content stored when an article body could not be extracted.
pub const SENTINEL_CONTENT: &str = "Error extracting content";

/// A fatwa scraped from the listing and its article page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Document {
    /// Numeric ID taken from the URL (0 when the URL has none)
    pub id: u64,

    /// Fatwa title
    pub title: String,

    /// Absolute URL of the article page
    pub url: String,

    /// Display date, kept as scraped
    pub date: String,

    /// View counter (0 when unparseable)
    pub hits: u64,

    /// Listing category label
    pub category: String,

    /// Normalized body text or [`SENTINEL_CONTENT`]
    pub content: String,
}

impl Document {
    /// Whether the document carries the fields needed to be listed.
    pub fn is_listable(&self) -> bool {
        !self.title.is_empty() && !self.url.is_empty()
    }

    /// Whether content extraction failed for this document.
    pub fn has_sentinel_content(&self) -> bool {
        self.content == SENTINEL_CONTENT
    }

    /// Content preview cut at `max_chars` characters, with an ellipsis when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        match self.content.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &self.content[..idx]),
            None => self.content.clone(),
        }
    }

    /// Callback payload that opens this document's detail view.
    pub fn view_payload(&self) -> String {
        format!("view_{}", self.id)
    }
}
