use std::sync::Arc;

use crate::corpus::{Corpus, DocIdx};
use crate::error::Result;
use crate::index::TermStats;
use crate::models::prior::RelevancePriors;
use crate::models::{ModelKind, RetrievalModel};
use crate::ranker::{rank, Hit};
use crate::tokenizer::words;

/// Belief-network style ranking by the posterior `P(R | Q) = P(Q, R, F) / P(Q)`.
///
/// The joint multiplies query-term overlap, the document's relevance prior
/// and a feature score built from word count, vocabulary size and average
/// word length, each scaled by its corpus maximum.
pub struct BeliefNetworkModel {
    corpus: Arc<Corpus>,
    stats: Arc<TermStats>,
    priors: RelevancePriors,
    feature_scores: Vec<f64>,
}

impl BeliefNetworkModel {
    pub fn new(corpus: Arc<Corpus>, stats: Arc<TermStats>, priors: RelevancePriors) -> Self {
        let max = stats.max_features;
        let feature_scores = stats
            .features
            .iter()
            .map(|f| {
                let words = f.word_count as f64 / (max.word_count as f64).max(1.0);
                let unique = f.unique_words as f64 / (max.unique_words as f64).max(1.0);
                let length = f.avg_word_len / max.avg_word_len.max(1.0);
                (words + unique + length) / 3.0
            })
            .collect();
        Self { corpus, stats, priors, feature_scores }
    }

    pub fn feature_score(&self, doc: DocIdx) -> f64 {
        self.feature_scores.get(doc).copied().unwrap_or(0.0)
    }

    /// Share of query terms (repeats included) present in `doc`.
    pub fn overlap(&self, doc: DocIdx, terms: &[String]) -> f64 {
        if terms.is_empty() {
            return 0.0;
        }
        let present = terms.iter().filter(|t| self.stats.term_frequency(doc, t) > 0).count();
        present as f64 / terms.len() as f64
    }

    pub fn joint_probability(&self, doc: DocIdx, terms: &[String]) -> f64 {
        self.overlap(doc, terms) * self.priors.get(doc) * self.feature_score(doc)
    }

    /// Posterior relevance for every document in load order; all zeros when
    /// the marginal is zero.
    pub fn posteriors(&self, terms: &[String]) -> Vec<f64> {
        let n = self.corpus.len();
        if n == 0 {
            return Vec::new();
        }
        let joints: Vec<f64> = (0..n).map(|doc| self.joint_probability(doc, terms)).collect();
        let marginal = joints.iter().sum::<f64>() / n as f64;
        if marginal == 0.0 {
            return vec![0.0; n];
        }
        joints.into_iter().map(|j| j / marginal).collect()
    }
}

impl RetrievalModel for BeliefNetworkModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Belief
    }

    fn search(&self, query: &str, top_n: usize) -> Result<Vec<Hit>> {
        let terms = words(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        Ok(rank(&self.corpus, self.posteriors(&terms).into_iter().enumerate(), top_n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;

    fn model(priors: Option<RelevancePriors>) -> BeliefNetworkModel {
        let corpus = Arc::new(
            Corpus::from_documents([
                Document::new("a.txt", "solar panels convert sunlight"),
                Document::new("b.txt", "wind turbines convert wind"),
                Document::new("c.txt", "bread"),
            ])
            .unwrap(),
        );
        let stats = Arc::new(TermStats::build(&corpus));
        let priors = priors.unwrap_or_else(|| RelevancePriors::constant(corpus.len(), 0.5));
        BeliefNetworkModel::new(corpus, stats, priors)
    }

    #[test]
    fn overlap_counts_repeated_query_terms() {
        let m = model(None);
        let terms = words("solar solar wind");
        assert!((m.overlap(0, &terms) - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.overlap(1, &terms) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(m.overlap(2, &[]), 0.0);
    }

    #[test]
    fn posteriors_average_to_one() {
        let m = model(None);
        let post = m.posteriors(&words("convert sunlight"));
        let mean = post.iter().sum::<f64>() / post.len() as f64;
        assert!((mean - 1.0).abs() < 1e-12);
        assert_eq!(post[2], 0.0);
    }

    #[test]
    fn prior_breaks_equal_overlap() {
        let m = model(Some(RelevancePriors::constant(3, 0.5)));
        let hits = m.search("convert", 10).unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.doc_id.as_str()).collect();
        // same overlap and prior: the longer-word document has the higher feature score
        assert_eq!(ids, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn zero_marginal_and_empty_query() {
        let m = model(None);
        assert!(m.search("ocean", 10).unwrap().is_empty());
        assert!(m.search("", 10).unwrap().is_empty());
    }
}
