// src/bot/service.rs

//! Bot service: turns inbound text and callbacks into replies.

use std::sync::Arc;

use crate::bot::command::{Command, parse_view_payload};
use crate::bot::render::{self, OutgoingMessage};
use crate::error::AppError;
use crate::models::BotConfig;
use crate::services::{CorpusHandle, SearchMode};

/// Query front end over the serving corpus.
pub struct BotService {
    corpus: Arc<CorpusHandle>,
    config: BotConfig,
}

impl BotService {
    pub fn new(corpus: Arc<CorpusHandle>, config: BotConfig) -> Self {
        Self { corpus, config }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Replies to a chat message, in send order.
    pub fn handle_text(&self, text: &str) -> Vec<OutgoingMessage> {
        match Command::parse(text) {
            None => Vec::new(),
            Some(Command::Start) => vec![render::render_welcome()],
            Some(Command::Help) => vec![render::render_help()],
            Some(Command::Categories) => {
                let corpus = self.corpus.snapshot();
                vec![render::render_categories(&corpus.category_summary())]
            }
            Some(Command::Search { mode, query }) => self.search(&query, mode),
        }
    }

    /// Replies to a callback payload. Unknown IDs and payloads yield nothing.
    pub fn handle_callback(&self, data: &str) -> Vec<OutgoingMessage> {
        match parse_view_payload(data) {
            None => {
                log::debug!("Ignoring callback payload '{}'", data);
                Vec::new()
            }
            Some(Err(_)) => vec![OutgoingMessage::markdown(render::MSG_BAD_ID)],
            Some(Ok(id)) => {
                let corpus = self.corpus.snapshot();
                match corpus.find(id) {
                    Some(document) => render::render_detail(document, &self.config),
                    None => {
                        log::debug!("No document with id {}", id);
                        Vec::new()
                    }
                }
            }
        }
    }

    fn search(&self, query: &str, mode: SearchMode) -> Vec<OutgoingMessage> {
        let corpus = self.corpus.snapshot();
        match corpus.search(query, mode, self.config.max_results) {
            Err(AppError::EmptyQuery) => vec![OutgoingMessage::markdown(render::MSG_EMPTY_QUERY)],
            Err(error) => {
                log::error!("Search for '{}' failed: {}", query, error);
                vec![OutgoingMessage::markdown(render::MSG_SEARCH_FAILED)]
            }
            Ok(results) => {
                log::info!(
                    "{} search '{}': {} matches",
                    mode,
                    results.query,
                    results.total_matches
                );
                let reply = if results.is_empty() {
                    render::render_no_results(&results.query)
                } else {
                    render::render_results(&results, &self.config)
                };
                vec![OutgoingMessage::markdown(render::MSG_SEARCHING), reply]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;
    use crate::services::Corpus;

    fn doc(id: u64, title: &str, content: &str) -> Document {
        Document {
            id,
            title: title.to_string(),
            url: format!("https://www.muftiwp.gov.my/ms/artikel/{id}-x"),
            date: "1 Mac 2024".to_string(),
            hits: 1,
            category: "Irsyad Hukum - Umum".to_string(),
            content: content.to_string(),
        }
    }

    fn service() -> BotService {
        let corpus = Corpus::new(vec![
            doc(1, "Hukum memelihara kucing", "Haiwan peliharaan dibenarkan."),
            doc(2, "Zakat fitrah", "Kadar zakat."),
            doc(2, "Pendua", "Dokumen kedua dengan ID sama."),
        ]);
        BotService::new(Arc::new(CorpusHandle::new(corpus)), BotConfig::default())
    }

    #[test]
    fn test_start_and_help() {
        let service = service();
        assert!(service.handle_text("/start")[0].text.contains("ApaHukumBot"));
        assert!(service.handle_text("/help")[0].text.contains("Panduan"));
        assert!(service.handle_text("  ").is_empty());
    }

    #[test]
    fn test_keyword_search_replies_twice() {
        let replies = service().handle_text("haiwan");
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].text, render::MSG_SEARCHING);
        assert_eq!(replies[1].buttons[0].data, "view_1");
    }

    #[test]
    fn test_empty_query_message() {
        let replies = service().handle_text("/search   ");
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].text, render::MSG_EMPTY_QUERY);
    }

    #[test]
    fn test_no_results() {
        let replies = service().handle_text("/title riba");
        assert_eq!(replies[1].text, "❌ Tiada fatwa dijumpai untuk: *riba*");
    }

    #[test]
    fn test_categories_counts() {
        let replies = service().handle_text("/categories");
        assert!(replies[0].text.contains("• Irsyad Hukum - Umum (3)"));
    }

    #[test]
    fn test_view_callback_first_match_wins() {
        let replies = service().handle_callback("view_2");
        assert_eq!(replies.len(), 1);
        assert!(replies[0].text.contains("Zakat fitrah"));
    }

    #[test]
    fn test_view_callback_unknown_and_bad_ids() {
        let service = service();
        assert!(service.handle_callback("view_999").is_empty());
        assert!(service.handle_callback("other").is_empty());
        assert_eq!(service.handle_callback("view_x")[0].text, render::MSG_BAD_ID);
    }

    #[test]
    fn test_published_corpus_is_served() {
        let handle = Arc::new(CorpusHandle::new(Corpus::new(vec![doc(1, "Lama", "x")])));
        let service = BotService::new(Arc::clone(&handle), BotConfig::default());
        assert_eq!(service.handle_text("baru").len(), 2);
        assert!(service.handle_text("baru")[1].buttons.is_empty());

        handle.publish(Corpus::new(vec![doc(7, "Baru", "y")]));
        assert_eq!(service.handle_text("baru")[1].buttons[0].data, "view_7");
    }
}
