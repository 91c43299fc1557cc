use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::index::TermStats;
use crate::models::prior::{prior_rng, RelevancePriors};
use crate::models::{
    BeliefNetworkModel, BooleanModel, ConceptGraph, FuzzyModel, InterferenceModel, JaccardModel,
    LatentSemanticModel, ModelKind, NonOverlappedModel, ProximalNodesModel, RetrievalModel, VectorSpaceModel,
};
use crate::ranker::Hit;

/// Immutable view of one corpus load: documents, statistics and every
/// prepared model. Queries only read from it.
pub struct Snapshot {
    corpus: Arc<Corpus>,
    stats: Arc<TermStats>,
    boolean: BooleanModel,
    jaccard: JaccardModel,
    fuzzy: FuzzyModel,
    vector: VectorSpaceModel,
    lsi: LatentSemanticModel,
    belief: BeliefNetworkModel,
    interference: InterferenceModel,
    non_overlapped: NonOverlappedModel,
    proximal: ProximalNodesModel,
}

impl Snapshot {
    pub fn build(corpus: Corpus, graph: ConceptGraph, config: &EngineConfig) -> Self {
        let start = Instant::now();
        let corpus = Arc::new(corpus);
        let stats = Arc::new(TermStats::build(&corpus));

        // Each probabilistic model draws its own priors from one seeded stream.
        let mut rng = prior_rng(config.prior_seed);
        let belief_priors = RelevancePriors::draw(&mut rng, corpus.len());
        let interference_priors = RelevancePriors::draw(&mut rng, corpus.len());

        let snapshot = Self {
            boolean: BooleanModel::new(corpus.clone()),
            jaccard: JaccardModel::new(corpus.clone()),
            fuzzy: FuzzyModel::new(corpus.clone(), &stats),
            vector: VectorSpaceModel::new(corpus.clone(), stats.clone()),
            lsi: LatentSemanticModel::new(corpus.clone(), &stats, config.lsi_topics, config.lsi_max_cells),
            belief: BeliefNetworkModel::new(corpus.clone(), stats.clone(), belief_priors),
            interference: InterferenceModel::new(corpus.clone(), stats.clone(), interference_priors),
            non_overlapped: NonOverlappedModel::new(corpus.clone()),
            proximal: ProximalNodesModel::new(corpus.clone(), graph),
            corpus,
            stats,
        };
        tracing::info!(
            num_docs = snapshot.corpus.len(),
            num_terms = snapshot.stats.index.len(),
            took_ms = start.elapsed().as_millis() as u64,
            "snapshot built"
        );
        snapshot
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn stats(&self) -> &TermStats {
        &self.stats
    }

    pub fn model(&self, kind: ModelKind) -> &dyn RetrievalModel {
        match kind {
            ModelKind::Boolean => &self.boolean,
            ModelKind::Jaccard => &self.jaccard,
            ModelKind::Fuzzy => &self.fuzzy,
            ModelKind::Vector => &self.vector,
            ModelKind::Lsi => &self.lsi,
            ModelKind::Belief => &self.belief,
            ModelKind::Interference => &self.interference,
            ModelKind::NonOverlapped => &self.non_overlapped,
            ModelKind::Proximal => &self.proximal,
        }
    }

    pub fn search(&self, kind: ModelKind, query: &str, top_n: usize) -> Result<Vec<Hit>> {
        let start = Instant::now();
        let hits = self.model(kind).search(query, top_n)?;
        tracing::debug!(
            model = %kind,
            query,
            hits = hits.len(),
            took_us = start.elapsed().as_micros() as u64,
            "search"
        );
        Ok(hits)
    }
}

/// Owns the current snapshot. `refresh` rebuilds from the documents
/// directory and swaps the new snapshot in; searches already holding the old
/// one finish against it.
pub struct Engine {
    config: EngineConfig,
    current: RwLock<Arc<Snapshot>>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let snapshot = Arc::new(Self::load_snapshot(&config));
        Ok(Self { config, current: RwLock::new(snapshot) })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Re-read the corpus and publish a new snapshot. Building happens
    /// outside the lock.
    pub fn refresh(&self) -> Arc<Snapshot> {
        let next = Arc::new(Self::load_snapshot(&self.config));
        let mut guard = self.current.write();
        *guard = next.clone();
        next
    }

    /// Search the current snapshot; `top_n` defaults to the configured cap.
    pub fn search(&self, kind: ModelKind, query: &str, top_n: Option<usize>) -> Result<Vec<Hit>> {
        let snapshot = self.snapshot();
        snapshot.search(kind, query, top_n.unwrap_or(self.config.top_n))
    }

    fn load_snapshot(config: &EngineConfig) -> Snapshot {
        let corpus = Corpus::load(&config.documents_dir, &config.extensions);
        let graph = match &config.concept_graph {
            Some(path) => ConceptGraph::from_file(path).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "concept graph unavailable, using empty graph");
                ConceptGraph::new()
            }),
            None => ConceptGraph::new(),
        };
        Snapshot::build(corpus, graph, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config(dir: &std::path::Path) -> EngineConfig {
        EngineConfig { documents_dir: dir.to_path_buf(), prior_seed: Some(11), ..EngineConfig::default() }
    }

    #[test]
    fn refresh_swaps_snapshot_but_keeps_old_one_alive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "red fox").unwrap();
        let engine = Engine::new(config(dir.path())).unwrap();
        let old = engine.snapshot();
        assert_eq!(old.corpus().len(), 1);

        fs::write(dir.path().join("b.txt"), "blue fox").unwrap();
        let new = engine.refresh();
        assert_eq!(new.corpus().len(), 2);
        assert_eq!(old.corpus().len(), 1);
        assert_eq!(engine.snapshot().corpus().len(), 2);
    }

    #[test]
    fn every_model_is_reachable() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Engine::new(config(dir.path())).unwrap();
        let snapshot = engine.snapshot();
        for kind in ModelKind::ALL {
            assert_eq!(snapshot.model(kind).kind(), kind);
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = EngineConfig { lsi_topics: 0, ..EngineConfig::default() };
        assert!(Engine::new(cfg).is_err());
    }
}
