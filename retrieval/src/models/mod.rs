//! Scoring strategies. Each one is prepared once per snapshot and then answers
//! read-only queries through [`RetrievalModel::search`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::ranker::Hit;

pub mod belief;
pub mod boolean;
pub mod fuzzy;
pub mod interference;
pub mod jaccard;
pub mod lsi;
pub mod non_overlapped;
pub mod prior;
pub mod proximal;
pub mod vector;

pub use belief::BeliefNetworkModel;
pub use boolean::{BooleanModel, BooleanQuery, Operator};
pub use fuzzy::FuzzyModel;
pub use interference::InterferenceModel;
pub use jaccard::JaccardModel;
pub use lsi::LatentSemanticModel;
pub use non_overlapped::NonOverlappedModel;
pub use prior::RelevancePriors;
pub use proximal::{ConceptGraph, ProximalNodesModel};
pub use vector::VectorSpaceModel;

/// Common search contract. Results are ranked, filtered and capped at `top_n`.
pub trait RetrievalModel: Send + Sync {
    fn kind(&self) -> ModelKind;

    fn search(&self, query: &str, top_n: usize) -> Result<Vec<Hit>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    Boolean,
    Jaccard,
    Fuzzy,
    Vector,
    Lsi,
    Belief,
    Interference,
    NonOverlapped,
    Proximal,
}

impl ModelKind {
    pub const ALL: [ModelKind; 9] = [
        ModelKind::Boolean,
        ModelKind::Jaccard,
        ModelKind::Fuzzy,
        ModelKind::Vector,
        ModelKind::Lsi,
        ModelKind::Belief,
        ModelKind::Interference,
        ModelKind::NonOverlapped,
        ModelKind::Proximal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ModelKind::Boolean => "boolean",
            ModelKind::Jaccard => "jaccard",
            ModelKind::Fuzzy => "fuzzy",
            ModelKind::Vector => "vector",
            ModelKind::Lsi => "lsi",
            ModelKind::Belief => "belief",
            ModelKind::Interference => "interference",
            ModelKind::NonOverlapped => "non-overlapped",
            ModelKind::Proximal => "proximal",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ModelKind::Boolean => "set retrieval with one AND / OR / NOT operator",
            ModelKind::Jaccard => "binary independence, Jaccard coefficient over term presence",
            ModelKind::Fuzzy => "fuzzy set, max of normalized term memberships",
            ModelKind::Vector => "TF-IDF cosine similarity (also named generalized-vector)",
            ModelKind::Lsi => "latent semantic indexing over a truncated SVD",
            ModelKind::Belief => "belief network posterior from overlap, prior and document features",
            ModelKind::Interference => "query term density weighted by a relevance prior",
            ModelKind::NonOverlapped => "comma-separated sub-queries merged without overlap",
            ModelKind::Proximal => "keyword graph lookup counting linked query keywords",
        }
    }

    /// Whether results carry a graded score rather than set membership.
    pub fn is_scored(self) -> bool {
        !matches!(self, ModelKind::Boolean | ModelKind::NonOverlapped)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        let kind = match key.as_str() {
            "boolean" | "extended-boolean" => ModelKind::Boolean,
            "jaccard" | "binary-independence" => ModelKind::Jaccard,
            "fuzzy" => ModelKind::Fuzzy,
            "vector" | "tfidf" | "tf-idf" | "generalized-vector" => ModelKind::Vector,
            "lsi" | "latent-semantic" => ModelKind::Lsi,
            "belief" | "belief-network" => ModelKind::Belief,
            "interference" => ModelKind::Interference,
            "non-overlapped" | "non-overlapped-list" => ModelKind::NonOverlapped,
            "proximal" | "proximal-nodes" => ModelKind::Proximal,
            _ => return Err(Error::UnknownModel(s.to_string())),
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_and_aliases() {
        for kind in ModelKind::ALL {
            assert_eq!(kind.name().parse::<ModelKind>().unwrap(), kind);
        }
        assert_eq!("Generalized_Vector".parse::<ModelKind>().unwrap(), ModelKind::Vector);
        assert!(matches!("bm25".parse::<ModelKind>(), Err(Error::UnknownModel(_))));
    }
}
