use regex::Regex;
use std::sync::OnceLock;

/// Sentence-final punctuation followed by a whitespace run.
fn boundary() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(r"[.!?](\s+)").expect("boundary pattern is valid"))
}

/// Split `text` into `(fragment, separator)` pairs.
///
/// Punctuation stays with its fragment; the whitespace after it becomes the
/// separator. Concatenating every fragment and separator gives back `text`
/// exactly. The last pair's separator is empty unless `text` ends in a
/// boundary.
pub fn split_with_separators(text: &str) -> Vec<(&str, &str)> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for caps in boundary().captures_iter(text) {
        let Some(sep) = caps.get(1) else { continue };
        pieces.push((&text[start..sep.start()], sep.as_str()));
        start = sep.end();
    }

    if start < text.len() || pieces.is_empty() {
        pieces.push((&text[start..], ""));
    }
    pieces
}

/// Sentences to render as separate bubbles, trimmed, blanks dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    split_with_separators(text)
        .into_iter()
        .map(|(fragment, _)| fragment.trim())
        .filter(|fragment| !fragment.is_empty())
        .collect()
}
