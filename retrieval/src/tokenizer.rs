use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\w+").expect("valid regex");
    /// Stop words dropped by the importance filter.
    static ref IMPORTANCE_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "the", "is", "and", "in", "to", "of", "a", "with", "for", "on", "by", "are", "an", "as", "that",
        ];
        words.iter().copied().collect()
    };
    /// Stop words dropped before building binary presence sets.
    static ref PRESENCE_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &["the", "is", "at", "on", "in", "and", "a", "of", "to", "for"];
        words.iter().copied().collect()
    };
}

/// Endings that mark a word as verb-like for the importance filter.
pub const VERB_SUFFIXES: &[&str] = &["ing", "ed", "ate", "ify", "ize", "en", "fy"];

/// Lower-cased `\w+` words in document order.
pub fn words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

/// Remove ASCII punctuation, leaving everything else untouched.
pub fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

/// Terms for binary presence vectors: lower-case, strip punctuation, split on
/// whitespace and drop the presence stop words.
pub fn presence_terms(text: &str) -> Vec<String> {
    strip_punctuation(&text.to_lowercase())
        .split_whitespace()
        .filter(|w| !PRESENCE_STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// True when the importance filter would discard `word` (already lower-cased).
///
/// This is a suffix heuristic, not a stemmer: "garden" and "red" are dropped
/// along with "running" and "created".
pub fn is_unimportant(word: &str) -> bool {
    IMPORTANCE_STOPWORDS.contains(word) || VERB_SUFFIXES.iter().any(|suffix| word.ends_with(suffix))
}

/// Importance filter: whitespace split, lower-case, trim `,` and `.` from both
/// ends, then drop stop words and verb-like words.
pub fn important_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.to_lowercase().trim_matches(|c| c == ',' || c == '.').to_string())
        .filter(|w| !w.is_empty() && !is_unimportant(w))
        .collect()
}
