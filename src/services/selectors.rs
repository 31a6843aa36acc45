//! Selector fallback chains.
//!
//! A [`SelectorChain`] holds the compiled candidates for one semantic field in
//! priority order. Resolution never fails on a single candidate; it only comes
//! back empty once every candidate has been tried.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};

/// Compiled, ordered selector candidates for one field.
#[derive(Debug, Clone)]
pub struct SelectorChain {
    field: &'static str,
    candidates: Vec<(String, Selector)>,
}

impl SelectorChain {
    /// Compile a candidate list. An invalid selector or an empty list fails.
    pub fn parse(field: &'static str, candidates: &[String]) -> Result<Self> {
        if candidates.is_empty() {
            return Err(AppError::validation(format!(
                "selector chain '{field}' has no candidates"
            )));
        }
        let candidates = candidates
            .iter()
            .map(|raw| {
                let selector = Selector::parse(raw)
                    .map_err(|e| AppError::selector(raw.as_str(), format!("{e:?}")))?;
                Ok((raw.clone(), selector))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { field, candidates })
    }

    /// Name of the field this chain resolves.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Candidate selector strings in priority order.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|(raw, _)| raw.as_str())
    }

    /// Non-empty match sets against a whole document, in priority order.
    ///
    /// Lazy: later candidates are only evaluated when the caller keeps
    /// iterating.
    pub fn matches_in_document<'a, 'b>(
        &'a self,
        document: &'b Html,
    ) -> impl Iterator<Item = (&'a str, Vec<ElementRef<'b>>)> {
        self.candidates.iter().filter_map(move |(raw, selector)| {
            let found: Vec<_> = document.select(selector).collect();
            (!found.is_empty()).then_some((raw.as_str(), found))
        })
    }

    /// All elements matched by the first candidate that matches the document.
    pub fn first_in_document<'b>(&self, document: &'b Html) -> Option<(&str, Vec<ElementRef<'b>>)> {
        self.matches_in_document(document).next()
    }

    /// First element matched by the first candidate that matches inside `scope`.
    pub fn first_in<'b>(&self, scope: ElementRef<'b>) -> Option<ElementRef<'b>> {
        self.candidates
            .iter()
            .find_map(|(_, selector)| scope.select(selector).next())
    }
}

/// Text content of an element, leaving out `script` and `style` bodies.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| matches!(el.name(), "script" | "style"))
        });
        if !hidden {
            text.push_str(fragment);
        }
    }
    text
}
