use std::collections::HashSet;
use std::sync::Arc;

use crate::corpus::{Corpus, DocIdx};
use crate::error::Result;
use crate::index::InvertedIndex;
use crate::models::{ModelKind, RetrievalModel};
use crate::ranker::{list, Hit};
use crate::tokenizer::important_words;

/// Comma-separated sub-queries looked up in an importance-filtered index and
/// merged into one list without repeats, in first-seen order.
pub struct NonOverlappedModel {
    corpus: Arc<Corpus>,
    index: InvertedIndex,
}

impl NonOverlappedModel {
    pub fn new(corpus: Arc<Corpus>) -> Self {
        let index = InvertedIndex::build_with(&corpus, |doc| {
            let mut terms = important_words(doc.stem());
            terms.extend(important_words(doc.text()));
            terms
        });
        Self { corpus, index }
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Matching documents in discovery order.
    pub fn matches(&self, query: &str) -> Vec<DocIdx> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        for sub in query.split(',') {
            let sub = sub.trim().to_lowercase();
            for word in sub.split(' ').filter(|w| !w.is_empty()) {
                for posting in self.index.postings(word) {
                    if seen.insert(posting.doc) {
                        order.push(posting.doc);
                    }
                }
            }
        }
        order
    }
}

impl RetrievalModel for NonOverlappedModel {
    fn kind(&self) -> ModelKind {
        ModelKind::NonOverlapped
    }

    fn search(&self, query: &str, top_n: usize) -> Result<Vec<Hit>> {
        Ok(list(&self.corpus, self.matches(query), top_n))
    }
}
