//! Splits long text into transport-sized chunks.
//!
//! Lengths are counted in characters. Sentences keep their trailing
//! delimiter, so concatenating the chunks gives back the input exactly.

use unicode_segmentation::UnicodeSegmentation;

/// Sentence delimiter used for splitting.
pub const SENTENCE_DELIMITER: char = '.';

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split `text` into chunks of at most `limit` characters.
///
/// Whole sentences are packed greedily. A sentence longer than `limit` is
/// broken on word boundaries, and an unbroken run longer than `limit` on
/// character boundaries.
pub fn split_text(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if char_len(text) <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in text.split_inclusive(SENTENCE_DELIMITER) {
        let len = char_len(sentence);
        if current_len + len <= limit {
            current.push_str(sentence);
            current_len += len;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if len <= limit {
            current.push_str(sentence);
            current_len = len;
        } else {
            let mut pieces = hard_split(sentence, limit);
            // The tail stays open so the next sentence can share its chunk.
            if let Some(tail) = pieces.pop() {
                chunks.extend(pieces);
                current_len = char_len(&tail);
                current = tail;
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn hard_split(sentence: &str, limit: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in sentence.split_word_bounds() {
        let len = char_len(word);
        if current_len + len > limit && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if len <= limit {
            current.push_str(word);
            current_len += len;
            continue;
        }

        for ch in word.chars() {
            if current_len == limit {
                pieces.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push(ch);
            current_len += 1;
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
