use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

use crate::corpus::DocIdx;

/// Range the placeholder relevance priors are drawn from.
pub const PRIOR_RANGE: Range<f64> = 0.1..0.9;

/// Per-document prior probability of relevance.
///
/// These are not learned: each probabilistic model draws one uniform value per
/// document when its snapshot is built. Seed the source to make rankings
/// reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct RelevancePriors(Vec<f64>);

impl RelevancePriors {
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, num_docs: usize) -> Self {
        Self((0..num_docs).map(|_| rng.gen_range(PRIOR_RANGE)).collect())
    }

    /// Same prior for every document.
    pub fn constant(num_docs: usize, value: f64) -> Self {
        Self(vec![value; num_docs])
    }

    pub fn get(&self, doc: DocIdx) -> f64 {
        self.0.get(doc).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Random source for priors: seeded when a seed is given, otherwise from OS
/// entropy.
pub fn prior_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}
