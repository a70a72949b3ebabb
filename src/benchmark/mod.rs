//! Recall evaluation support.
//!
//! Synthetic datasets, exact brute-force ground truth and recall@k, used by
//! the integration tests and benches to measure how search quality moves with
//! the number of restarts.
//!
//! Reference: <https://ann-benchmarks.com/>

pub mod datasets;
pub mod metrics;

pub use datasets::{
    compute_all_ground_truth, compute_ground_truth, create_benchmark_dataset,
    create_clustered_dataset, Dataset,
};
pub use metrics::{mean_recall, recall_at_k};
