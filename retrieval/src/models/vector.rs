use std::collections::HashMap;
use std::sync::Arc;

use crate::corpus::Corpus;
use crate::error::Result;
use crate::index::TermStats;
use crate::models::{ModelKind, RetrievalModel};
use crate::ranker::{rank, Hit};
use crate::tokenizer::words;

/// TF-IDF cosine similarity.
///
/// tf is normalized by the largest frequency in the document (or query) and
/// idf is the smoothed `ln(N / (1 + df))`, so a term present in every document
/// gets a negative weight. This model is also exposed as "generalized vector";
/// it does not use term-term correlations.
pub struct VectorSpaceModel {
    corpus: Arc<Corpus>,
    stats: Arc<TermStats>,
    weights: Vec<HashMap<String, f64>>,
    magnitudes: Vec<f64>,
}

impl VectorSpaceModel {
    pub fn new(corpus: Arc<Corpus>, stats: Arc<TermStats>) -> Self {
        let mut weights = Vec::with_capacity(stats.num_docs());
        let mut magnitudes = Vec::with_capacity(stats.num_docs());
        for doc in 0..stats.num_docs() {
            let vector = weigh(stats.tf[doc].iter().map(|(t, &f)| (t.as_str(), f)), &stats);
            magnitudes.push(magnitude(&vector));
            weights.push(vector);
        }
        Self { corpus, stats, weights, magnitudes }
    }

    pub fn idf(&self, term: &str) -> f64 {
        idf(&self.stats, term)
    }

    /// tf-idf weight of `term` in document `doc`, 0 when absent.
    pub fn weight(&self, doc: usize, term: &str) -> f64 {
        self.weights.get(doc).and_then(|w| w.get(term)).copied().unwrap_or(0.0)
    }
}

fn idf(stats: &TermStats, term: &str) -> f64 {
    (stats.num_docs() as f64 / (1.0 + stats.document_frequency(term) as f64)).ln()
}

/// Max-normalized tf times idf for each (term, count).
fn weigh<'a, I>(counts: I, stats: &TermStats) -> HashMap<String, f64>
where
    I: Iterator<Item = (&'a str, u32)> + Clone,
{
    let max = counts.clone().map(|(_, f)| f).max().unwrap_or(0);
    if max == 0 {
        return HashMap::new();
    }
    counts.map(|(t, f)| (t.to_string(), f as f64 / max as f64 * idf(stats, t))).collect()
}

fn magnitude(vector: &HashMap<String, f64>) -> f64 {
    vector.values().map(|w| w * w).sum::<f64>().sqrt()
}

impl RetrievalModel for VectorSpaceModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Vector
    }

    fn search(&self, query: &str, top_n: usize) -> Result<Vec<Hit>> {
        if self.corpus.is_empty() {
            return Ok(Vec::new());
        }
        let mut counts: HashMap<String, u32> = HashMap::new();
        for term in words(query) {
            *counts.entry(term).or_insert(0) += 1;
        }
        let q = weigh(counts.iter().map(|(t, &f)| (t.as_str(), f)), &self.stats);
        let q_mag = magnitude(&q);
        if q_mag == 0.0 {
            return Ok(Vec::new());
        }

        let scores = self.weights.iter().zip(&self.magnitudes).enumerate().map(|(idx, (doc, &d_mag))| {
            let denom = d_mag * q_mag;
            if denom == 0.0 {
                return (idx, 0.0);
            }
            let dot: f64 = q.iter().map(|(t, w)| w * doc.get(t).copied().unwrap_or(0.0)).sum();
            (idx, dot / denom)
        });
        Ok(rank(&self.corpus, scores, top_n))
    }
}
