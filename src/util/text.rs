//! Code-point-aware string truncation.
//!
//! All limits are counted in Unicode scalar values, so multi-byte text is
//! never split mid-character.

const ELLIPSIS: &str = "...";

/// Longest prefix of `text` holding at most `max` characters.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Shorten `text` to exactly `max` characters, ending in `...`, when it is longer than `max`.
pub fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    format!("{}{ELLIPSIS}", truncate_chars(text, keep))
}
