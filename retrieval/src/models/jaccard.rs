use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::corpus::Corpus;
use crate::error::Result;
use crate::models::{ModelKind, RetrievalModel};
use crate::ranker::{rank, Hit};
use crate::tokenizer::presence_terms;

/// Binary independence model scored with the Jaccard coefficient.
///
/// Documents are binary presence vectors over the sorted corpus vocabulary,
/// stored sparsely as ascending term indices. Query terms missing from the
/// vocabulary still count towards the union.
pub struct JaccardModel {
    corpus: Arc<Corpus>,
    term_index: HashMap<String, usize>,
    vectors: Vec<Vec<usize>>,
}

impl JaccardModel {
    pub fn new(corpus: Arc<Corpus>) -> Self {
        let term_sets: Vec<BTreeSet<String>> =
            corpus.documents().iter().map(|d| presence_terms(d.text()).into_iter().collect()).collect();
        let vocabulary: BTreeSet<&str> = term_sets.iter().flatten().map(String::as_str).collect();
        let term_index: HashMap<String, usize> =
            vocabulary.iter().enumerate().map(|(i, t)| (t.to_string(), i)).collect();
        let vectors = term_sets
            .iter()
            .map(|set| {
                let mut v: Vec<usize> = set.iter().map(|t| term_index[t.as_str()]).collect();
                v.sort_unstable();
                v
            })
            .collect();
        Self { corpus, term_index, vectors }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.term_index.len()
    }
}

/// |a ∩ b| / |a ∪ b| for ascending index lists, with `extra` query-only bits
/// added to the union. 0 when the union is empty.
fn coefficient(doc: &[usize], query: &[usize], extra: usize) -> f64 {
    let (mut i, mut j, mut both) = (0, 0, 0usize);
    while i < doc.len() && j < query.len() {
        match doc[i].cmp(&query[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                both += 1;
                i += 1;
                j += 1;
            }
        }
    }
    let union = doc.len() + query.len() + extra - both;
    if union == 0 {
        0.0
    } else {
        both as f64 / union as f64
    }
}

impl RetrievalModel for JaccardModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Jaccard
    }

    fn search(&self, query: &str, top_n: usize) -> Result<Vec<Hit>> {
        let terms: BTreeSet<String> = presence_terms(query).into_iter().collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let mut known: Vec<usize> = terms.iter().filter_map(|t| self.term_index.get(t).copied()).collect();
        known.sort_unstable();
        let unknown = terms.len() - known.len();

        let scores = self.vectors.iter().enumerate().map(|(idx, v)| (idx, coefficient(v, &known, unknown)));
        Ok(rank(&self.corpus, scores, top_n))
    }
}
