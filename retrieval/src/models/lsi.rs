use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;
use std::sync::Arc;

use crate::corpus::{Corpus, DocIdx};
use crate::error::{Error, Result};
use crate::index::TermStats;
use crate::models::{ModelKind, RetrievalModel};
use crate::ranker::{rank, Hit};
use crate::tokenizer::words;

pub const DEFAULT_TOPICS: usize = 2;

/// Cosines at or below this magnitude are rounding noise from the SVD and
/// count as zero.
const COSINE_TOLERANCE: f64 = 1e-10;

/// Truncated SVD of the raw term-document matrix.
#[derive(Debug, Clone)]
pub struct ReducedSpace {
    term_index: HashMap<String, usize>,
    /// Matrix column -> corpus document (columns are sorted by identifier).
    columns: Vec<DocIdx>,
    /// terms x k
    u: DMatrix<f64>,
    /// k singular values, descending.
    singular_values: DVector<f64>,
    /// k x documents
    v_t: DMatrix<f64>,
    /// Numerical rank of the full matrix.
    rank: usize,
}

impl ReducedSpace {
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn singular_values(&self) -> &DVector<f64> {
        &self.singular_values
    }

    /// Project raw query counts with `q · U · S⁻¹`.
    fn project(&self, query: &DVector<f64>) -> DVector<f64> {
        let mut projected = self.u.transpose() * query;
        for (p, s) in projected.iter_mut().zip(self.singular_values.iter()) {
            *p /= *s;
        }
        projected
    }
}

#[derive(Debug, Clone)]
enum LsiState {
    Empty,
    TooLarge { cells: usize, limit: usize },
    Ready(ReducedSpace),
}

/// Latent semantic indexing: documents and queries compared by cosine in a
/// `topics`-dimensional latent space.
///
/// The space keeps `min(topics, terms, documents)` dimensions, so a
/// one-document corpus is searched in one dimension. Searching fails with
/// [`Error::RankDeficient`] only when the kept dimensions exceed the matrix
/// rank.
pub struct LatentSemanticModel {
    corpus: Arc<Corpus>,
    topics: usize,
    state: LsiState,
}

impl LatentSemanticModel {
    /// Decompose now; `max_cells` bounds terms x documents so the SVD cost is
    /// capped. Failures are reported by [`RetrievalModel::search`].
    pub fn new(corpus: Arc<Corpus>, stats: &TermStats, topics: usize, max_cells: usize) -> Self {
        let state = Self::decompose(&corpus, stats, topics, max_cells);
        Self { corpus, topics, state }
    }

    pub fn topics(&self) -> usize {
        self.topics
    }

    pub fn space(&self) -> Option<&ReducedSpace> {
        match &self.state {
            LsiState::Ready(space) => Some(space),
            _ => None,
        }
    }

    /// Rows are sorted terms, columns sorted document identifiers.
    pub fn term_document_matrix(corpus: &Corpus, stats: &TermStats) -> (Vec<String>, Vec<DocIdx>, DMatrix<f64>) {
        let terms: Vec<String> = stats.vocabulary().into_iter().map(str::to_string).collect();
        let mut columns: Vec<DocIdx> = (0..corpus.len()).collect();
        columns.sort_by(|&a, &b| corpus[a].id().cmp(corpus[b].id()));

        let row_of: HashMap<&str, usize> = terms.iter().enumerate().map(|(i, t)| (t.as_str(), i)).collect();
        let mut matrix = DMatrix::zeros(terms.len(), columns.len());
        for (col, &doc) in columns.iter().enumerate() {
            for (term, &freq) in &stats.tf[doc] {
                if let Some(&row) = row_of.get(term.as_str()) {
                    matrix[(row, col)] = freq as f64;
                }
            }
        }
        (terms, columns, matrix)
    }

    fn decompose(corpus: &Corpus, stats: &TermStats, topics: usize, max_cells: usize) -> LsiState {
        let num_terms = stats.index.len();
        if corpus.is_empty() || num_terms == 0 {
            return LsiState::Empty;
        }
        let cells = num_terms.saturating_mul(corpus.len());
        if cells > max_cells {
            tracing::warn!(cells, limit = max_cells, "term-document matrix too large, skipping SVD");
            return LsiState::TooLarge { cells, limit: max_cells };
        }

        let (terms, columns, matrix) = Self::term_document_matrix(corpus, stats);
        let (rows, cols) = matrix.shape();
        let svd = matrix.svd(true, true);
        let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
            return LsiState::Empty;
        };
        let s = svd.singular_values;

        let mut order: Vec<usize> = (0..s.len()).collect();
        order.sort_by(|&a, &b| s[b].partial_cmp(&s[a]).unwrap_or(std::cmp::Ordering::Equal));
        let largest = order.first().map(|&i| s[i]).unwrap_or(0.0);
        let tolerance = largest * rows.max(cols) as f64 * f64::EPSILON;
        let rank = s.iter().filter(|&&v| v > tolerance).count();

        let k = topics.min(order.len());
        let u_k = DMatrix::from_fn(rows, k, |r, c| u[(r, order[c])]);
        let s_k = DVector::from_fn(k, |i, _| s[order[i]]);
        let v_t_k = DMatrix::from_fn(k, cols, |r, c| v_t[(order[r], c)]);

        let term_index = terms.into_iter().enumerate().map(|(i, t)| (t, i)).collect();
        tracing::debug!(terms = rows, docs = cols, rank, topics, "latent semantic space ready");
        LsiState::Ready(ReducedSpace { term_index, columns, u: u_k, singular_values: s_k, v_t: v_t_k, rank })
    }
}

impl RetrievalModel for LatentSemanticModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Lsi
    }

    fn search(&self, query: &str, top_n: usize) -> Result<Vec<Hit>> {
        let terms = words(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let space = match &self.state {
            LsiState::Empty => return Ok(Vec::new()),
            LsiState::TooLarge { cells, limit } => {
                return Err(Error::MatrixTooLarge { cells: *cells, limit: *limit });
            }
            LsiState::Ready(space) => space,
        };
        let k = space.singular_values.len();
        if k > space.rank {
            return Err(Error::RankDeficient { requested: k, rank: space.rank });
        }

        let mut q = DVector::zeros(space.u.nrows());
        for term in &terms {
            if let Some(&row) = space.term_index.get(term) {
                q[row] += 1.0;
            }
        }
        let projected = space.project(&q);
        let q_norm = projected.norm();
        if q_norm == 0.0 {
            return Ok(Vec::new());
        }

        let scores = space.columns.iter().enumerate().map(|(col, &doc)| {
            let d = space.v_t.column(col);
            let denom = q_norm * d.norm();
            let score = if denom == 0.0 { 0.0 } else { projected.dot(&d) / denom };
            (doc, if score.abs() <= COSINE_TOLERANCE { 0.0 } else { score })
        });
        Ok(rank(&self.corpus, scores, top_n))
    }
}
