//! Text-span helpers
//!
//! These run on text that the extractor has already isolated (one heading,
//! one list item). Regexes are compiled once per process.

use regex::Regex;
use std::sync::OnceLock;

// Pictographs (U+1F300..U+1F6FF) and dingbats (U+2700..U+27BF), with an
// optional emoji-presentation selector.
const EMOJI_PATTERN: &str = r"[\x{1F300}-\x{1F6FF}\x{2700}-\x{27BF}]\x{FE0F}?";

const COMPLETION_PATTERN: &str = r"✅|✔\x{FE0F}?|\[[xX]\]";

fn emoji_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMOJI_PATTERN).expect("emoji pattern is valid"))
}

fn completion_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(COMPLETION_PATTERN).expect("completion pattern is valid"))
}

/// Lift the first emoji out of `text`
///
/// Returns the remaining text (trimmed) and the emoji, if any. Only the
/// first occurrence is removed.
pub fn split_emoji(text: &str) -> (String, Option<String>) {
    match emoji_regex().find(text) {
        Some(m) => {
            let mut rest = String::with_capacity(text.len());
            rest.push_str(&text[..m.start()]);
            rest.push_str(&text[m.end()..]);
            (rest.trim().to_string(), Some(m.as_str().to_string()))
        }
        None => (text.trim().to_string(), None),
    }
}

/// Strip every completion marker from `text`
///
/// Returns the trimmed text and whether any marker was found.
pub fn strip_completion(text: &str) -> (String, bool) {
    let re = completion_regex();
    if !re.is_match(text) {
        return (text.trim().to_string(), false);
    }
    (re.replace_all(text, "").trim().to_string(), true)
}

/// Cut `text` to `keep` chars plus `...` when it is longer than `limit` chars
pub fn truncate_label(text: &str, limit: usize, keep: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut label: String = text.chars().take(keep).collect();
    label.push_str("...");
    label
}

/// Case-insensitive substring test
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
