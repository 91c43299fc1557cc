use std::collections::BTreeSet;
use std::sync::Arc;

use crate::corpus::{Corpus, DocIdx};
use crate::error::Result;
use crate::index::TermStats;
use crate::models::prior::RelevancePriors;
use crate::models::{ModelKind, RetrievalModel};
use crate::ranker::{rank, Hit};
use crate::tokenizer::words;

/// Query-term density times a relevance prior.
///
/// Density sums `freq / doc_length` over distinct query terms, so it is not
/// bounded by 1 when a term dominates a short document.
pub struct InterferenceModel {
    corpus: Arc<Corpus>,
    stats: Arc<TermStats>,
    priors: RelevancePriors,
}

impl InterferenceModel {
    pub fn new(corpus: Arc<Corpus>, stats: Arc<TermStats>, priors: RelevancePriors) -> Self {
        Self { corpus, stats, priors }
    }

    pub fn density(&self, doc: DocIdx, terms: &BTreeSet<String>) -> f64 {
        let length = self.stats.features.get(doc).map(|f| f.word_count).unwrap_or(0);
        if length == 0 {
            return 0.0;
        }
        terms.iter().map(|t| self.stats.term_frequency(doc, t) as f64 / length as f64).sum()
    }

    pub fn relevance(&self, doc: DocIdx, terms: &BTreeSet<String>) -> f64 {
        self.density(doc, terms) * self.priors.get(doc)
    }
}

impl RetrievalModel for InterferenceModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Interference
    }

    fn search(&self, query: &str, top_n: usize) -> Result<Vec<Hit>> {
        let terms: BTreeSet<String> = words(query).into_iter().collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let scores = (0..self.corpus.len()).map(|doc| (doc, self.relevance(doc, &terms)));
        Ok(rank(&self.corpus, scores, top_n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;

    fn model(priors: RelevancePriors) -> InterferenceModel {
        let corpus = Arc::new(
            Corpus::from_documents([
                Document::new("a.txt", "go go go rust"),
                Document::new("b.txt", "rust"),
                Document::new("c.txt", ""),
            ])
            .unwrap(),
        );
        let stats = Arc::new(TermStats::build(&corpus));
        InterferenceModel::new(corpus, stats, priors)
    }

    #[test]
    fn density_sums_distinct_terms_and_can_exceed_one() {
        let m = model(RelevancePriors::constant(3, 1.0));
        let terms: BTreeSet<String> = words("go rust go").into_iter().collect();
        assert!((m.density(0, &terms) - 1.0).abs() < 1e-12);
        assert_eq!(m.density(1, &terms), 1.0);
        assert_eq!(m.density(2, &terms), 0.0);
    }

    #[test]
    fn prior_scales_the_ranking() {
        let mut rng = crate::models::prior::prior_rng(Some(3));
        let priors = RelevancePriors::draw(&mut rng, 3);
        let m = model(priors.clone());
        let hits = m.search("rust", 10).unwrap();
        assert_eq!(hits.len(), 2);
        let expected_a = 0.25 * priors.get(0);
        let expected_b = 1.0 * priors.get(1);
        let a = hits.iter().find(|h| h.doc_id == "a.txt").unwrap();
        let b = hits.iter().find(|h| h.doc_id == "b.txt").unwrap();
        assert!((a.score - expected_a).abs() < 1e-12);
        assert!((b.score - expected_b).abs() < 1e-12);
    }

    #[test]
    fn empty_query() {
        assert!(model(RelevancePriors::constant(3, 0.5)).search(" ", 10).unwrap().is_empty());
    }
}
