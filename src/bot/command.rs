//! Inbound command parsing.

use crate::services::SearchMode;

/// A parsed chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Categories,
    /// Search in the given mode; the query may be blank and is validated later.
    Search { mode: SearchMode, query: String },
}

impl Command {
    /// Parse message text. Blank text yields `None`.
    ///
    /// `/cmd@BotName` is treated as `/cmd`. Anything that is not a known
    /// command, including unknown slash commands, is a keyword search over
    /// the whole text.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let fallback = || Command::Search {
            mode: SearchMode::Keyword,
            query: text.to_string(),
        };

        if !text.starts_with('/') {
            return Some(fallback());
        }

        let (head, rest) = match text.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (text, ""),
        };
        let name = head.split('@').next().unwrap_or(head);

        let search = |mode| Command::Search {
            mode,
            query: rest.to_string(),
        };

        Some(match name {
            "/start" => Command::Start,
            "/help" => Command::Help,
            "/categories" => Command::Categories,
            "/search" => search(SearchMode::Keyword),
            "/title" => search(SearchMode::Title),
            "/category" => search(SearchMode::Category),
            _ => fallback(),
        })
    }
}

/// Parse a `view_<id>` callback payload.
///
/// Returns `None` for payloads of another kind and `Some(Err(_))` when the id
/// is not a number.
pub fn parse_view_payload(data: &str) -> Option<Result<u64, std::num::ParseIntError>> {
    data.strip_prefix("view_").map(str::parse)
}
