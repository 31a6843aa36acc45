//! Substring search over the corpus.

use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, Result};
use crate::models::Document;

/// Which fields a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Title or content
    #[default]
    Keyword,
    /// Title only
    Title,
    /// Category only
    Category,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Keyword => "keyword",
            SearchMode::Title => "title",
            SearchMode::Category => "category",
        }
    }

    /// Whether `document` matches an already lowercased query.
    fn matches(&self, document: &Document, query: &str) -> bool {
        let contains = |field: &str| field.to_lowercase().contains(query);
        match self {
            SearchMode::Keyword => contains(&document.title) || contains(&document.content),
            SearchMode::Title => contains(&document.title),
            SearchMode::Category => contains(&document.category),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "keyword" => Ok(SearchMode::Keyword),
            "title" => Ok(SearchMode::Title),
            "category" => Ok(SearchMode::Category),
            other => Err(AppError::validation(format!("unknown search mode '{other}'"))),
        }
    }
}

/// Matches for one query, in corpus order.
#[derive(Debug)]
pub struct SearchResults<'a> {
    /// Trimmed, lowercased query text
    pub query: String,

    /// Mode the query ran in
    pub mode: SearchMode,

    /// At most `limit` matching documents
    pub items: Vec<&'a Document>,

    /// Number of matches before the cap
    pub total_matches: usize,

    /// Set when matches were dropped by the cap
    pub truncated: bool,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Case-insensitive substring search.
///
/// Blank queries fail with [`AppError::EmptyQuery`].
pub fn search<'a>(
    documents: &'a [Document],
    query: &str,
    mode: SearchMode,
    limit: usize,
) -> Result<SearchResults<'a>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Err(AppError::EmptyQuery);
    }

    let mut items = Vec::new();
    let mut total_matches = 0;
    for document in documents.iter().filter(|d| mode.matches(d, &query)) {
        total_matches += 1;
        if items.len() < limit {
            items.push(document);
        }
    }

    Ok(SearchResults {
        query,
        mode,
        items,
        total_matches,
        truncated: total_matches > limit,
    })
}
