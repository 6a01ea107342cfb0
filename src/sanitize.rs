//! Log message normalization.
//!
//! Messages are truncated to their first N lines and stripped of digit
//! runs before they ever reach the search backend. The same
//! transformation runs at index time and at query time so that
//! similarity scoring sees one token stream.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DIGIT_RUNS: Regex = Regex::new(r"\d+").unwrap();
}

/// Remove every run of digits from `text`.
pub fn sanitize(text: &str) -> String {
    DIGIT_RUNS.replace_all(text, "").into_owned()
}

/// Prefix of `text` up to (not including) the `n`-th newline.
///
/// Returns the whole string when it has fewer than `n` newlines or when
/// `n` is not positive. A newline at position zero does not count as a
/// boundary.
pub fn first_lines(text: &str, n: i32) -> &str {
    if n <= 0 {
        return text;
    }
    match text.match_indices('\n').nth(n as usize - 1) {
        Some((idx, _)) if idx > 0 => &text[..idx],
        _ => text,
    }
}

/// The normalization applied to every message: truncate, then strip.
pub fn clean_message(message: &str, lines: i32) -> String {
    sanitize(first_lines(message, lines))
}
