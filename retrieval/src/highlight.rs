use regex::{Captures, RegexBuilder};

pub const HIGHLIGHT_OPEN: &str = r#"<span class="highlight">"#;
pub const HIGHLIGHT_CLOSE: &str = "</span>";

/// Wrap whole-word, case-insensitive occurrences of `terms` in a highlight
/// span. All terms are matched in one pass so inserted markup is never
/// re-highlighted.
pub fn highlight_terms<S: AsRef<str>>(text: &str, terms: &[S]) -> String {
    let alternation = terms
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");
    if alternation.is_empty() {
        return text.to_string();
    }
    let pat = match RegexBuilder::new(&format!(r"\b(?:{alternation})\b")).case_insensitive(true).build() {
        Ok(p) => p,
        Err(e) => {
            tracing::debug!(error = %e, "highlight pattern rejected, returning text unchanged");
            return text.to_string();
        }
    };
    pat.replace_all(text, |caps: &Captures| format!("{HIGHLIGHT_OPEN}{}{HIGHLIGHT_CLOSE}", &caps[0]))
        .into_owned()
}
