// src/services/corpus.rs

//! In-memory corpus and its swappable serving handle.
//!
//! Readers take an `Arc<Corpus>` snapshot per request; a refresh builds a new
//! corpus and publishes it in one pointer swap, so a query never sees a
//! half-written sequence.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Document;
use crate::services::search::{SearchMode, SearchResults, search};

/// Ordered, immutable set of documents.
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<Document>,
    loaded_at: DateTime<Utc>,
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            loaded_at: Utc::now(),
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// First document with the given ID (IDs are not guaranteed unique).
    pub fn find(&self, id: u64) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Document count per category, keys sorted.
    pub fn category_summary(&self) -> BTreeMap<&str, usize> {
        let mut summary = BTreeMap::new();
        for document in &self.documents {
            *summary.entry(document.category.as_str()).or_insert(0) += 1;
        }
        summary
    }

    pub fn search(&self, query: &str, mode: SearchMode, limit: usize) -> Result<SearchResults<'_>> {
        search(&self.documents, query, mode, limit)
    }
}

/// Render a category summary as `A: 2, B: 1`.
pub fn format_category_summary(summary: &BTreeMap<&str, usize>) -> String {
    summary
        .iter()
        .map(|(category, count)| format!("{category}: {count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Shared owner of the serving corpus.
#[derive(Debug)]
pub struct CorpusHandle {
    current: RwLock<Arc<Corpus>>,
}

impl CorpusHandle {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            current: RwLock::new(Arc::new(corpus)),
        }
    }

    /// Snapshot of the corpus as of now.
    pub fn snapshot(&self) -> Arc<Corpus> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the corpus, returning the previous snapshot.
    pub fn publish(&self, corpus: Corpus) -> Arc<Corpus> {
        let next = Arc::new(corpus);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: u64, category: &str) -> Document {
        Document {
            id,
            title: format!("Fatwa {id}"),
            url: format!("https://x.my/{id}-a"),
            category: category.to_string(),
            ..Document::default()
        }
    }

    #[test]
    fn test_category_summary_sorted() {
        let corpus = Corpus::new(vec![doc(1, "A"), doc(2, "A"), doc(3, "B")]);
        let summary = corpus.category_summary();
        assert_eq!(summary.get("A"), Some(&2));
        assert_eq!(summary.get("B"), Some(&1));
        assert_eq!(format_category_summary(&summary), "A: 2, B: 1");
    }

    #[test]
    fn test_find_returns_first_duplicate() {
        let mut second = doc(7, "B");
        second.title = "Kedua".to_string();
        let corpus = Corpus::new(vec![doc(7, "A"), second]);
        assert_eq!(corpus.find(7).unwrap().category, "A");
        assert!(corpus.find(99).is_none());
    }

    #[test]
    fn test_snapshot_survives_publish() {
        let handle = CorpusHandle::new(Corpus::new(vec![doc(1, "A")]));
        let before = handle.snapshot();

        let previous = handle.publish(Corpus::new(vec![doc(2, "B"), doc(3, "B")]));

        assert_eq!(before.len(), 1);
        assert_eq!(previous.len(), 1);
        assert_eq!(handle.snapshot().len(), 2);
        assert!(handle.snapshot().find(1).is_none());
        assert!(handle.snapshot().loaded_at() >= previous.loaded_at());
    }
}
