//! Relevance check: does a post talk about server availability at all?

use once_cell::sync::Lazy;
use regex::Regex;

/// Words that mark a post as status-related.
pub const VOCABULARY: &[&str] = &["servers", "down", "maintenance", "offline", "downtime"];

static KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?i)\b(?:{})\b", VOCABULARY.join("|"));
    Regex::new(&pattern).expect("valid keyword pattern")
});

/// True when any vocabulary word appears in `text` as a whole word, in any case.
///
/// `showdown` does not count as `down`; `DOWN!` does.
pub fn is_relevant(text: &str) -> bool {
    KEYWORDS.is_match(text)
}
