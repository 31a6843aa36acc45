//! Metadata parsing for listing rows.

use std::sync::LazyLock;

use regex::Regex;

/// Numeric segment right before a hyphen in the URL path, e.g. `/5123-hukum`.
static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d+)-").expect("id pattern is valid"));

/// Optional visit label followed by the first run of digits.
static HITS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:Dikunjungi:\s*)?(\d+)").expect("hits pattern is valid"));

/// Document ID from an article URL, `0` when there is none.
pub fn extract_id(url: &str) -> u64 {
    first_number(&ID_PATTERN, url)
}

/// Hit count from badge text such as `Dikunjungi: 31`, `0` when there is none.
pub fn extract_hits(text: &str) -> u64 {
    first_number(&HITS_PATTERN, text.trim())
}

fn first_number(pattern: &Regex, haystack: &str) -> u64 {
    pattern
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Collapse inner whitespace and trim.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_id() {
        assert_eq!(
            extract_id("https://www.muftiwp.gov.my/ms/artikel/irsyad-hukum/umum/5123-irsyad-al-fatwa"),
            5123
        );
        assert_eq!(extract_id("https://www.muftiwp.gov.my/ms/artikel/no-id-here"), 0);
        assert_eq!(extract_id(""), 0);
    }

    #[test]
    fn test_extract_id_overflow_defaults_to_zero() {
        assert_eq!(extract_id("https://x.my/99999999999999999999999-a"), 0);
    }

    #[test]
    fn test_extract_hits() {
        assert_eq!(extract_hits("Dikunjungi: 31"), 31);
        assert_eq!(extract_hits("  Dikunjungi:1024 "), 1024);
        assert_eq!(extract_hits("Hits 7"), 7);
        assert_eq!(extract_hits("tiada"), 0);
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Hukum \n\t solat  "), "Hukum solat");
    }
}
