use serde::Serialize;
use std::cmp::Ordering;

use crate::corpus::{Corpus, DocIdx};

/// One ranked document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    pub doc_id: String,
    /// Model score. Set-membership models report 1.0 for every member.
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl Hit {
    pub fn new(doc_id: impl Into<String>, score: f64) -> Self {
        Self { doc_id: doc_id.into(), score, snippet: None }
    }

    pub fn with_snippet(mut self, snippet: String) -> Self {
        self.snippet = Some(snippet);
        self
    }
}

/// Keep positive finite scores, sort descending with load order breaking
/// ties, and cap at `top_n`.
pub fn rank<I>(corpus: &Corpus, scores: I, top_n: usize) -> Vec<Hit>
where
    I: IntoIterator<Item = (DocIdx, f64)>,
{
    let mut scored: Vec<(DocIdx, f64)> =
        scores.into_iter().filter(|(_, s)| s.is_finite() && *s > 0.0).collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
    scored
        .into_iter()
        .take(top_n)
        .filter_map(|(idx, score)| corpus.get(idx).map(|d| Hit::new(d.id(), score)))
        .collect()
}

/// Unscored listing: keeps the given order, every hit scores 1.0.
pub fn list<I>(corpus: &Corpus, docs: I, top_n: usize) -> Vec<Hit>
where
    I: IntoIterator<Item = DocIdx>,
{
    docs.into_iter()
        .filter_map(|idx| corpus.get(idx))
        .take(top_n)
        .map(|d| Hit::new(d.id(), 1.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;

    fn corpus() -> Corpus {
        Corpus::from_documents((0..4).map(|i| Document::new(format!("d{i}"), ""))).unwrap()
    }

    #[test]
    fn ties_follow_load_order() {
        let c = corpus();
        let hits = rank(&c, vec![(3, 0.5), (1, 0.5), (2, 0.9), (0, 0.0)], 10);
        let ids: Vec<&str> = hits.iter().map(|h| h.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["d2", "d1", "d3"]);
    }

    #[test]
    fn drops_non_positive_and_nan() {
        let c = corpus();
        let hits = rank(&c, vec![(0, -1.0), (1, f64::NAN), (2, f64::INFINITY), (3, 1e-9)], 10);
        assert_eq!(hits, vec![Hit::new("d3", 1e-9)]);
    }

    #[test]
    fn caps_at_top_n() {
        let c = corpus();
        assert_eq!(rank(&c, (0..4).map(|i| (i, 1.0)), 2).len(), 2);
        assert!(rank(&c, (0..4).map(|i| (i, 1.0)), 0).is_empty());
        assert_eq!(list(&c, [2, 0], 10), vec![Hit::new("d2", 1.0), Hit::new("d0", 1.0)]);
    }
}
