use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::corpus::{Corpus, DocIdx};
use crate::error::{Error, Result};
use crate::models::{ModelKind, RetrievalModel};
use crate::ranker::{rank, Hit};

/// Keyword -> documents it points at. Stored as a JSON object of string
/// arrays, e.g. `{"oxygen": ["plants.txt"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptGraph {
    nodes: BTreeMap<String, Vec<String>>,
}

impl ConceptGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let graph: ConceptGraph =
            serde_json::from_str(&raw).map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Ok(graph.normalized())
    }

    /// Link `keyword` (case-insensitive) to `docs`.
    pub fn insert<I, S>(&mut self, keyword: &str, docs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let links = self.nodes.entry(keyword.trim().to_lowercase()).or_default();
        for doc in docs {
            let doc = doc.into();
            if !links.contains(&doc) {
                links.push(doc);
            }
        }
    }

    pub fn links(&self, keyword: &str) -> &[String] {
        self.nodes.get(keyword).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn normalized(self) -> Self {
        let mut graph = Self::new();
        for (keyword, docs) in self.nodes {
            graph.insert(&keyword, docs);
        }
        graph
    }
}

/// Scores each document by how many distinct query keywords link to it.
pub struct ProximalNodesModel {
    corpus: Arc<Corpus>,
    graph: ConceptGraph,
}

impl ProximalNodesModel {
    pub fn new(corpus: Arc<Corpus>, graph: ConceptGraph) -> Self {
        Self { corpus, graph }
    }

    pub fn graph(&self) -> &ConceptGraph {
        &self.graph
    }
}

impl RetrievalModel for ProximalNodesModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Proximal
    }

    fn search(&self, query: &str, top_n: usize) -> Result<Vec<Hit>> {
        let keywords: BTreeSet<String> = query.split_whitespace().map(str::to_lowercase).collect();
        let mut scores: HashMap<DocIdx, f64> = HashMap::new();
        for keyword in &keywords {
            for id in self.graph.links(keyword) {
                if let Some(idx) = self.corpus.position(id) {
                    *scores.entry(idx).or_insert(0.0) += 1.0;
                }
            }
        }
        Ok(rank(&self.corpus, scores, top_n))
    }
}
