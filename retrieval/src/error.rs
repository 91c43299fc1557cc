use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the retrieval library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("duplicate document identifier: {0}")]
    DuplicateDocument(String),

    #[error("unknown retrieval model: {0}")]
    UnknownModel(String),

    /// The truncated singular-value matrix would not be invertible.
    #[error("{requested} latent topics requested but the term-document matrix has rank {rank}")]
    RankDeficient { requested: usize, rank: usize },

    #[error("term-document matrix has {cells} cells, above the limit of {limit}")]
    MatrixTooLarge { cells: usize, limit: usize },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
