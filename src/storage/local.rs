//! Local CSV corpus storage.
//!
//! The whole corpus lives in one file and is replaced on every scrape:
//!
//! ```text
//! ID,Title,URL,Date,Hits,Category,Content
//! 5123,Hukum solat jumaat,https://...,12 Januari 2024,31,Irsyad Hukum - Umum,...
//! ```

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder, Writer};

use crate::error::{AppError, Result};
use crate::models::Document;

/// Column header of the corpus file.
pub const HEADER: [&str; 7] = ["ID", "Title", "URL", "Date", "Hits", "Category", "Content"];

/// CSV file backend for the corpus.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
}

impl CsvStorage {
    /// Create a storage for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full corpus, replacing any previous file.
    ///
    /// Rows go to a temporary sibling first and are renamed into place, so a
    /// failed write leaves the old corpus intact.
    pub fn save(&self, documents: &[Document]) -> Result<usize> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("csv.tmp");
        {
            let mut writer = Writer::from_path(&tmp)?;
            writer.write_record(HEADER)?;
            for document in documents {
                let id = document.id.to_string();
                let hits = document.hits.to_string();
                writer.write_record([
                    id.as_str(),
                    document.title.as_str(),
                    document.url.as_str(),
                    document.date.as_str(),
                    hits.as_str(),
                    document.category.as_str(),
                    document.content.as_str(),
                ])?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;

        log::info!(
            "CSV file '{}' written with {} records",
            self.path.display(),
            documents.len()
        );
        Ok(documents.len())
    }

    /// Read the full corpus.
    ///
    /// The header row is skipped and rows with fewer than seven fields are
    /// dropped. Unparseable ID and hits fields become 0. Invalid UTF-8 is
    /// replaced rather than rejected.
    pub fn load(&self) -> Result<Vec<Document>> {
        let display = self.path.display().to_string();
        let file = File::open(&self.path).map_err(|e| AppError::store_unavailable(&display, e))?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut rows = 0usize;
        let mut skipped = 0usize;
        let mut documents = Vec::new();

        for record in reader.byte_records() {
            let record = record?;
            rows += 1;
            if rows == 1 {
                continue;
            }
            match parse_record(&record) {
                Some(document) => documents.push(document),
                None => skipped += 1,
            }
        }

        if rows < 2 {
            return Err(AppError::EmptyCorpus(display));
        }
        if skipped > 0 {
            log::debug!("Skipped {} malformed rows in {}", skipped, display);
        }
        Ok(documents)
    }
}

fn parse_record(record: &ByteRecord) -> Option<Document> {
    if record.len() < HEADER.len() {
        return None;
    }
    let field = |index: usize| String::from_utf8_lossy(&record[index]).into_owned();
    let number = |index: usize| field(index).trim().parse().unwrap_or(0);
    Some(Document {
        id: number(0),
        title: field(1),
        url: field(2),
        date: field(3),
        hits: number(4),
        category: field(5),
        content: field(6),
    })
}
