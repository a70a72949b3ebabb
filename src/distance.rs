//! Distance metrics for dense vectors.
//!
//! The graph is metric-agnostic: search correctness (symmetric edges, bounded
//! top-k, visited bookkeeping) only needs a distance that is symmetric and
//! non-negative. Recall characteristics do depend on the metric.
//!
//! ## Important nuance
//!
//! [`DistanceMetric::distance`] is the hot-loop entry point and assumes the
//! caller already checked dimensions. Use [`DistanceMetric::try_distance`] at
//! API boundaries.

use crate::{Result, RetrieveError};
use serde::{Deserialize, Serialize};

const NORM_EPSILON: f32 = 1e-9;

/// Distance metric for dense vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Euclidean (L2) distance.
    #[default]
    L2,
    /// Cosine distance $1 - \cos(a,b)$, in `[0, 2]`.
    Cosine,
}

impl DistanceMetric {
    /// Compute distance between two vectors of equal length.
    ///
    /// Lengths are not checked; extra components of the longer input are ignored.
    #[inline]
    #[must_use]
    pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::L2 => l2_distance(a, b),
            DistanceMetric::Cosine => cosine_distance(a, b),
        }
    }

    /// Compute distance, rejecting empty or unequal-length inputs.
    pub fn try_distance(self, a: &[f32], b: &[f32]) -> Result<f32> {
        if a.len() != b.len() {
            return Err(RetrieveError::DimensionMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }
        if a.is_empty() {
            return Err(RetrieveError::InvalidParameter(
                "vectors must have at least one component".to_string(),
            ));
        }
        Ok(self.distance(a, b))
    }
}

/// Dot product.
#[inline]
#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// L2 norm of a vector.
#[inline]
#[must_use]
pub fn norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

/// L2 distance squared (cheaper when only ranking).
#[inline]
#[must_use]
pub fn l2_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// L2 (Euclidean) distance.
#[inline]
#[must_use]
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    l2_distance_squared(a, b).sqrt()
}

/// Cosine distance $1 - \cos(a,b)$.
///
/// Computes norms, so inputs need not be normalized. A zero vector is treated
/// as orthogonal to everything (distance 1).
#[inline]
#[must_use]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let na = norm(a);
    let nb = norm(b);
    if na <= NORM_EPSILON || nb <= NORM_EPSILON {
        return 1.0;
    }
    1.0 - (dot(a, b) / (na * nb)).clamp(-1.0, 1.0)
}
