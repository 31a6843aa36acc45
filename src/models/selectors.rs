// src/models/selectors.rs

//! Prioritized CSS selector lists for each semantic field.

use serde::{Deserialize, Serialize};

/// Ordered selector candidates, highest priority first.
///
/// Every list is tried front to back and the first candidate that matches
/// wins. Rows are resolved against the whole listing page; the title, date
/// and hits lists are resolved inside each row; the body list is resolved
/// against an article page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectorChains {
    /// Candidates for each row/item in the listing
    #[serde(default = "defaults::rows")]
    pub rows: Vec<String>,

    /// Candidates for the title anchor within a row
    #[serde(default = "defaults::title")]
    pub title: Vec<String>,

    /// Candidates for the date cell within a row
    #[serde(default = "defaults::date")]
    pub date: Vec<String>,

    /// Candidates for the hit-count badge within a row
    #[serde(default = "defaults::hits")]
    pub hits: Vec<String>,

    /// Candidates for the article body on the detail page
    #[serde(default = "defaults::body")]
    pub body: Vec<String>,

    /// HTML attribute holding the article link
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,
}

impl Default for SelectorChains {
    fn default() -> Self {
        Self {
            rows: defaults::rows(),
            title: defaults::title(),
            date: defaults::date(),
            hits: defaults::hits(),
            body: defaults::body(),
            link_attr: defaults::link_attr(),
        }
    }
}

impl SelectorChains {
    /// Field name and candidate list pairs, in resolution order.
    pub fn fields(&self) -> [(&'static str, &[String]); 5] {
        [
            ("rows", &self.rows),
            ("title", &self.title),
            ("date", &self.date),
            ("hits", &self.hits),
            ("body", &self.body),
        ]
    }
}

mod defaults {
    fn owned(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    pub fn rows() -> Vec<String> {
        owned(&[
            "table.category tbody tr",
            ".category tbody tr",
            "tbody tr",
            ".list-item",
            ".article-item",
            "tr",
        ])
    }

    pub fn title() -> Vec<String> {
        owned(&[
            "td.list-title a",
            ".list-title a",
            "td a",
            "a[href*='artikel']",
            "a",
        ])
    }

    pub fn date() -> Vec<String> {
        owned(&["td.list-date", ".list-date", "td:nth-child(3)", ".date"])
    }

    pub fn hits() -> Vec<String> {
        owned(&[
            "td.list-hits span.badge",
            ".list-hits .badge",
            "td:nth-child(4) span",
            ".hits",
            "span.badge",
        ])
    }

    pub fn body() -> Vec<String> {
        owned(&[
            "div[itemprop='articleBody']",
            ".article-body",
            ".content",
            "#article-content",
            ".post-content",
        ])
    }

    pub fn link_attr() -> String {
        "href".to_string()
    }
}
