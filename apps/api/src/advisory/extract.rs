//! Text window extraction: pulls a bounded snippet out of an advisory page.

/// Returns the text starting at the first occurrence of `start_word`.
///
/// - `start_word` absent → `""` (the field is simply not on the page).
/// - `end_word` absent or empty → `extraction_length` characters from the match.
/// - `end_word` found at or after the match → everything up to (excluding) it.
/// - `end_word` not found → falls back to the fixed-length window.
///
/// Matching is case-sensitive and literal. Lengths count characters, not bytes,
/// and the window is clipped at the end of `text`.
pub fn extract_window<'a>(
    text: &'a str,
    start_word: &str,
    end_word: Option<&str>,
    extraction_length: usize,
) -> &'a str {
    let Some(start) = text.find(start_word) else {
        return "";
    };
    let tail = &text[start..];

    let end_offset = end_word
        .filter(|w| !w.is_empty())
        .and_then(|w| tail.find(w))
        .unwrap_or_else(|| char_offset(tail, extraction_length));

    &tail[..end_offset]
}

/// Byte offset of the `n`th character of `s`, or `s.len()` when shorter.
fn char_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}
