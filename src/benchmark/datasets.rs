//! Datasets and exact ground truth for recall measurement.

use crate::distance::l2_distance_squared;
use crate::{vecs, Result, RetrieveError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

/// Base vectors to index plus query vectors.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub base: Vec<Vec<f32>>,
    pub queries: Vec<Vec<f32>>,
    pub dimension: usize,
}

impl Dataset {
    /// Load base and query vectors from two `.fvecs` files.
    pub fn from_fvecs(base: impl AsRef<Path>, queries: impl AsRef<Path>) -> Result<Self> {
        let base = vecs::read_fvecs(base)?;
        let queries = vecs::read_fvecs(queries)?;
        let dimension = base.first().ok_or(RetrieveError::EmptyDataset)?.len();
        if let Some(q) = queries.first() {
            if q.len() != dimension {
                return Err(RetrieveError::DimensionMismatch {
                    expected: dimension,
                    actual: q.len(),
                });
            }
        }
        Ok(Self {
            base,
            queries,
            dimension,
        })
    }

    pub fn n_base(&self) -> usize {
        self.base.len()
    }

    pub fn n_queries(&self) -> usize {
        self.queries.len()
    }
}

/// Uniform vectors in `[0, 1]^d`.
pub fn create_benchmark_dataset(
    n_base: usize,
    n_queries: usize,
    dimension: usize,
    seed: u64,
) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sample = |n: usize| -> Vec<Vec<f32>> {
        (0..n)
            .map(|_| (0..dimension).map(|_| rng.random::<f32>()).collect())
            .collect()
    };
    let base = sample(n_base);
    let queries = sample(n_queries);
    Dataset {
        base,
        queries,
        dimension,
    }
}

/// Gaussian clusters around `n_clusters` uniform centers, clamped to `[0, 1]`.
///
/// Closer to real embedding data than uniform noise: greedy search has local
/// structure to follow.
pub fn create_clustered_dataset(
    n_base: usize,
    n_queries: usize,
    dimension: usize,
    n_clusters: usize,
    cluster_std: f32,
    seed: u64,
) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let n_clusters = n_clusters.max(1);

    let centers: Vec<Vec<f32>> = (0..n_clusters)
        .map(|_| (0..dimension).map(|_| rng.random::<f32>()).collect())
        .collect();

    let mut sample = |n: usize| -> Vec<Vec<f32>> {
        (0..n)
            .map(|_| {
                let center = &centers[rng.random_range(0..n_clusters)];
                center
                    .iter()
                    .map(|&c| {
                        // Box-Muller
                        let u1: f32 = rng.random::<f32>().max(f32::MIN_POSITIVE);
                        let u2: f32 = rng.random();
                        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
                        (c + z * cluster_std).clamp(0.0, 1.0)
                    })
                    .collect()
            })
            .collect()
    };

    let base = sample(n_base);
    let queries = sample(n_queries);
    Dataset {
        base,
        queries,
        dimension,
    }
}

/// Exact k nearest neighbors of `query` in `database` by L2, ties by index.
pub fn compute_ground_truth(query: &[f32], database: &[Vec<f32>], k: usize) -> Vec<u32> {
    let mut distances: Vec<(u32, f32)> = database
        .iter()
        .enumerate()
        .map(|(i, v)| (i as u32, l2_distance_squared(query, v)))
        .collect();

    distances.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    distances.truncate(k);
    distances.into_iter().map(|(id, _)| id).collect()
}

/// Ground truth for every query of `dataset`.
pub fn compute_all_ground_truth(dataset: &Dataset, k: usize) -> Vec<Vec<u32>> {
    dataset
        .queries
        .iter()
        .map(|q| compute_ground_truth(q, &dataset.base, k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benchmark_dataset_shape() {
        let dataset = create_benchmark_dataset(100, 10, 16, 42);
        assert_eq!(dataset.n_base(), 100);
        assert_eq!(dataset.n_queries(), 10);
        assert!(dataset.base.iter().all(|v| v.len() == 16));
    }

    #[test]
    fn clustered_dataset_is_clamped_and_seeded() {
        let a = create_clustered_dataset(200, 5, 8, 4, 0.1, 7);
        let b = create_clustered_dataset(200, 5, 8, 4, 0.1, 7);
        assert_eq!(a.base, b.base);
        assert!(a.base.iter().flatten().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn ground_truth_orders_by_distance_then_index() {
        let database = vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
        ];
        assert_eq!(compute_ground_truth(&[0.1, 0.1], &database, 2)[0], 0);
        // All four points are equidistant from the center.
        assert_eq!(compute_ground_truth(&[0.5, 0.5], &database, 3), vec![0, 1, 2]);
    }

    #[test]
    fn from_fvecs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let base_path = dir.path().join("base.fvecs");
        let query_path = dir.path().join("query.fvecs");
        vecs::write_fvecs(&base_path, &[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        vecs::write_fvecs(&query_path, &[vec![0.0, 0.0]]).unwrap();

        let dataset = Dataset::from_fvecs(&base_path, &query_path).unwrap();
        assert_eq!(dataset.dimension, 2);
        assert_eq!(dataset.n_base(), 2);
        assert_eq!(dataset.n_queries(), 1);
    }
}
