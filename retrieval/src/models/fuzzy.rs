use std::collections::HashMap;
use std::sync::Arc;

use crate::corpus::{Corpus, DocIdx};
use crate::error::Result;
use crate::index::TermStats;
use crate::models::{ModelKind, RetrievalModel};
use crate::ranker::{rank, Hit};
use crate::tokenizer::words;

/// Fuzzy-set retrieval. A term's membership in a document is its frequency
/// over the document's largest term frequency; a query scores the maximum
/// membership among its terms (fuzzy OR).
pub struct FuzzyModel {
    corpus: Arc<Corpus>,
    memberships: Vec<HashMap<String, f64>>,
}

impl FuzzyModel {
    pub fn new(corpus: Arc<Corpus>, stats: &TermStats) -> Self {
        let memberships = (0..stats.num_docs())
            .map(|doc| {
                let max = stats.max_term_frequency(doc);
                if max == 0 {
                    return HashMap::new();
                }
                stats.tf[doc].iter().map(|(t, &f)| (t.clone(), f as f64 / max as f64)).collect()
            })
            .collect();
        Self { corpus, memberships }
    }

    /// Membership degree in [0, 1]; 0 for absent terms.
    pub fn membership(&self, doc: DocIdx, term: &str) -> f64 {
        self.memberships.get(doc).and_then(|m| m.get(term)).copied().unwrap_or(0.0)
    }
}

impl RetrievalModel for FuzzyModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Fuzzy
    }

    fn search(&self, query: &str, top_n: usize) -> Result<Vec<Hit>> {
        let terms = words(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let scores = (0..self.memberships.len())
            .map(|doc| (doc, terms.iter().map(|t| self.membership(doc, t)).fold(0.0, f64::max)));
        Ok(rank(&self.corpus, scores, top_n))
    }
}
