pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod index;
pub mod models;
pub mod ranker;
pub mod tokenizer;

pub use config::EngineConfig;
pub use corpus::{Corpus, DocIdx, Document};
pub use engine::{Engine, Snapshot};
pub use error::{Error, Result};
pub use index::{DocFeatures, InvertedIndex, Posting, TermStats};
pub use models::{ModelKind, RetrievalModel};
pub use ranker::Hit;
