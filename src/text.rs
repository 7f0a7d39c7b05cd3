// src/text.rs
//! Small text helpers shared by the provider clients.

use once_cell::sync::OnceCell;

/// Decode HTML entities and collapse whitespace. Punctuation is kept as is.
pub fn normalize_text(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&decoded, " ").trim().to_string()
}

/// `s` followed by a period, unless it already ends a sentence.
pub fn with_full_stop(s: &str) -> String {
    if s.ends_with(['.', '?', '!', '\u{2026}']) {
        s.to_string()
    } else {
        format!("{s}.")
    }
}

/// Cut `s` to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(s: &mut String, max_chars: usize) {
    if let Some((idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(idx);
    }
}
