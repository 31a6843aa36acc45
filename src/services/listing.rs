// src/services/listing.rs

//! Listing page extraction.
//!
//! Resolves rows with the row chain, then title/link, date and hits inside
//! each row with their own chains. A row candidate wins only when its rows
//! produce at least one listable document; otherwise the next candidate is
//! tried.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::Result;
use crate::models::{Document, SelectorChains, SourceConfig};
use crate::services::metadata::{clean_text, extract_hits, extract_id};
use crate::services::selectors::{SelectorChain, visible_text};
use crate::utils::{absolutize, truncate_chars};

/// Result of one listing pass.
#[derive(Debug, Default)]
pub struct ListingPass {
    /// Documents in listing order, content not yet filled in
    pub documents: Vec<Document>,

    /// Row candidate that produced the documents
    pub row_selector: Option<String>,
}

/// Extracts documents from a listing page.
#[derive(Debug, Clone)]
pub struct ListingScraper {
    rows: SelectorChain,
    title: SelectorChain,
    date: SelectorChain,
    hits: SelectorChain,
    link_attr: String,
    origin: Url,
    category: String,
}

impl ListingScraper {
    /// Compile the selector chains for a source.
    pub fn new(selectors: &SelectorChains, source: &SourceConfig) -> Result<Self> {
        Ok(Self {
            rows: SelectorChain::parse("rows", &selectors.rows)?,
            title: SelectorChain::parse("title", &selectors.title)?,
            date: SelectorChain::parse("date", &selectors.date)?,
            hits: SelectorChain::parse("hits", &selectors.hits)?,
            link_attr: selectors.link_attr.clone(),
            origin: Url::parse(&source.origin)?,
            category: source.category.clone(),
        })
    }

    /// Run one listing pass over a parsed page.
    pub fn extract(&self, document: &Html) -> ListingPass {
        for (candidate, rows) in self.rows.matches_in_document(document) {
            let row_count = rows.len();
            let documents: Vec<Document> = rows
                .into_iter()
                .filter_map(|row| self.parse_row(row))
                .collect();

            if !documents.is_empty() {
                log::info!(
                    "{} selector '{}' matched {} rows, {} documents",
                    self.rows.field(),
                    candidate,
                    row_count,
                    documents.len()
                );
                return ListingPass {
                    documents,
                    row_selector: Some(candidate.to_string()),
                };
            }

            log::debug!(
                "{} selector '{}' matched {} rows but none were listable",
                self.rows.field(),
                candidate,
                row_count
            );
        }

        log::debug!(
            "Exhausted {} candidates: {}",
            self.rows.field(),
            self.rows.candidates().collect::<Vec<_>>().join(", ")
        );
        ListingPass::default()
    }

    fn parse_row(&self, row: ElementRef<'_>) -> Option<Document> {
        let title_elem = self.title.first_in(row)?;
        let title = clean_text(&title_elem.text().collect::<String>());
        let url = title_elem
            .value()
            .attr(&self.link_attr)
            .and_then(|href| absolutize(&self.origin, href))
            .unwrap_or_default();

        let date = self
            .date
            .first_in(row)
            .map(|el| clean_text(&el.text().collect::<String>()))
            .unwrap_or_default();

        let hits = self
            .hits
            .first_in(row)
            .map(|el| extract_hits(&el.text().collect::<String>()))
            .unwrap_or(0);

        let document = Document {
            id: extract_id(&url),
            title,
            url,
            date,
            hits,
            category: self.category.clone(),
            content: String::new(),
        };

        document.is_listable().then_some(document)
    }
}

/// Leading body text of a page, for diagnosing listings that yield nothing.
pub fn body_preview(document: &Html, max_chars: usize) -> String {
    let Ok(body) = Selector::parse("body") else {
        return String::new();
    };
    document
        .select(&body)
        .next()
        .map(|el| truncate_chars(visible_text(el).trim(), max_chars).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraper() -> ListingScraper {
        ListingScraper::new(&SelectorChains::default(), &SourceConfig::default()).unwrap()
    }

    const CATEGORY_TABLE: &str = r#"
        <html><body>
        <table class="category">
          <thead><tr><th>Tajuk</th><th>Tarikh</th></tr></thead>
          <tbody>
            <tr>
              <td class="list-title"><a href="/ms/artikel/irsyad-hukum/umum/5123-hukum-solat-jumaat">
                Hukum solat jumaat
              </a></td>
              <td class="list-date">12 Januari 2024</td>
              <td class="list-hits"><span class="badge">Dikunjungi: 31</span></td>
            </tr>
            <tr>
              <td class="list-title"><a href="https://www.muftiwp.gov.my/ms/artikel/irsyad-hukum/umum/5124-zakat-fitrah">Zakat fitrah</a></td>
              <td class="list-date">13 Januari 2024</td>
              <td class="list-hits"><span class="badge">Dikunjungi: abc</span></td>
            </tr>
          </tbody>
        </table>
        </body></html>"#;

    #[test]
    fn test_primary_selectors() {
        let pass = scraper().extract(&Html::parse_document(CATEGORY_TABLE));
        assert_eq!(pass.row_selector.as_deref(), Some("table.category tbody tr"));
        assert_eq!(pass.documents.len(), 2);

        let first = &pass.documents[0];
        assert_eq!(first.id, 5123);
        assert_eq!(first.title, "Hukum solat jumaat");
        assert_eq!(
            first.url,
            "https://www.muftiwp.gov.my/ms/artikel/irsyad-hukum/umum/5123-hukum-solat-jumaat"
        );
        assert_eq!(first.date, "12 Januari 2024");
        assert_eq!(first.hits, 31);
        assert_eq!(first.category, "Irsyad Hukum - Umum");

        assert_eq!(pass.documents[1].hits, 0);
        assert_eq!(pass.documents[1].id, 5124);
    }

    #[test]
    fn test_falls_back_to_lowest_priority_rows() {
        let mut chains = SelectorChains::default();
        chains.rows = vec![
            "table.category tbody tr".to_string(),
            ".list-item".to_string(),
            "div.entry".to_string(),
        ];
        let scraper = ListingScraper::new(&chains, &SourceConfig::default()).unwrap();
        let html = Html::parse_document(
            r#"<div class="entry"><a href="/ms/artikel/77-puasa">Puasa sunat</a>
               <span class="date">1 Mac 2024</span><span class="hits">9</span></div>"#,
        );
        let pass = scraper.extract(&html);
        assert_eq!(pass.row_selector.as_deref(), Some("div.entry"));
        assert_eq!(pass.documents.len(), 1);
        assert_eq!(pass.documents[0].id, 77);
        assert_eq!(pass.documents[0].date, "1 Mac 2024");
        assert_eq!(pass.documents[0].hits, 9);
    }

    #[test]
    fn test_rows_without_documents_fall_through() {
        let mut chains = SelectorChains::default();
        chains.rows = vec!["div.header".to_string(), "div.entry".to_string()];
        let scraper = ListingScraper::new(&chains, &SourceConfig::default()).unwrap();
        let html = Html::parse_document(
            r#"<div class="header">Senarai</div>
               <div class="entry"><a href="/ms/artikel/8-nikah">Nikah</a></div>"#,
        );
        let pass = scraper.extract(&html);
        assert_eq!(pass.row_selector.as_deref(), Some("div.entry"));
        assert_eq!(pass.documents[0].title, "Nikah");
    }

    #[test]
    fn test_fields_resolve_independently_per_row() {
        let html = Html::parse_document(
            r#"<table><tbody>
                <tr><td class="list-title"><a href="/ms/artikel/1-a">A</a></td>
                    <td class="list-date">1 Jan</td></tr>
                <tr><td><a href="/ms/artikel/2-b">B</a></td><td>x</td>
                    <td>2 Jan</td><td><span>5</span></td></tr>
            </tbody></table>"#,
        );
        let pass = scraper().extract(&html);
        assert_eq!(pass.row_selector.as_deref(), Some("tbody tr"));
        assert_eq!(pass.documents.len(), 2);
        assert_eq!(pass.documents[0].date, "1 Jan");
        assert_eq!(pass.documents[1].date, "2 Jan");
        assert_eq!(pass.documents[1].hits, 5);
    }

    #[test]
    fn test_drops_rows_without_title_or_url() {
        let html = Html::parse_document(
            r#"<table><tbody>
                <tr><td class="list-title"><a href="/ms/artikel/1-a">  </a></td></tr>
                <tr><td class="list-title"><a>Tiada pautan</a></td></tr>
                <tr><td class="list-title"><a href="/ms/artikel/3-c">Ada</a></td></tr>
            </tbody></table>"#,
        );
        let pass = scraper().extract(&html);
        assert_eq!(pass.documents.len(), 1);
        assert_eq!(pass.documents[0].title, "Ada");
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let html = Html::parse_document("<html><body><p>Maintenance</p></body></html>");
        let pass = scraper().extract(&html);
        assert!(pass.documents.is_empty());
        assert!(pass.row_selector.is_none());
        assert_eq!(body_preview(&html, 5), "Maint");
    }
}
