use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::lsi::DEFAULT_TOPICS;

/// Engine settings. Every field has a default, so a JSON file only needs the
/// keys it wants to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding the corpus text files.
    pub documents_dir: PathBuf,
    /// File extensions (without the dot) that are ingested.
    pub extensions: Vec<String>,
    /// Result cap used when a search does not pass its own.
    pub top_n: usize,
    /// Latent topics kept after the SVD truncation.
    pub lsi_topics: usize,
    /// Upper bound on terms x documents before the SVD is skipped.
    pub lsi_max_cells: usize,
    /// Seed for the probabilistic relevance priors; entropy when unset.
    pub prior_seed: Option<u64>,
    /// JSON file with the keyword graph for proximal-node search.
    pub concept_graph: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("data/documents"),
            extensions: vec!["txt".to_string()],
            top_n: 10,
            lsi_topics: DEFAULT_TOPICS,
            lsi_max_cells: 4_000_000,
            prior_seed: None,
            concept_graph: None,
        }
    }
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: EngineConfig =
            serde_json::from_str(&raw).map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lsi_topics == 0 {
            return Err(Error::Config("lsi_topics must be at least 1".into()));
        }
        if self.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(Error::Config("at least one file extension is required".into()));
        }
        Ok(())
    }
}
