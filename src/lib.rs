//! smallworld: approximate nearest neighbor search over a Navigable Small
//! World (NSW) graph.
//!
//! - [`nsw`]: graph storage, incremental construction, multi-restart search
//! - [`distance`]: pluggable distance metric (L2 by default)
//! - [`ann`]: the [`ANNIndex`] trait implemented by [`nsw::NswIndex`]
//! - [`vecs`]: `.fvecs` / `.ivecs` vector file I/O
//! - [`benchmark`]: synthetic datasets, exact ground truth, recall@k
//!
//! # Critical Nuances
//!
//! ## Degree is unbounded
//!
//! Every insertion adds `k_build` edges in both directions and nothing is
//! ever pruned, so the earliest nodes accumulate the most edges. These hubs
//! are what make greedy routing short, and also why memory grows faster than
//! `n * k_build`.
//!
//! ## Search is randomized
//!
//! Entry points are drawn uniformly at random. Results for the same query can
//! differ between calls unless the generator is seeded
//! ([`nsw::NswParams::seed`] or an explicit `rng` to [`nsw::knn_search`]).
//!
//! ## `total_visited` can exceed the node count
//!
//! The visited set is shared across the restarts of one search, but every
//! restart re-evaluates its entry point even when it was seen before.

pub mod ann;
pub mod benchmark;
pub mod distance;
pub mod error;
pub mod nsw;
pub mod vecs;

pub use ann::{ANNIndex, ANNStats};
pub use distance::DistanceMetric;
pub use error::{Result, RetrieveError};
