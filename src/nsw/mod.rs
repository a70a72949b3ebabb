//! Flat Navigable Small World (NSW) graph.
//!
//! A single-layer proximity graph built incrementally: every new vector is
//! linked, in both directions, to the approximate nearest neighbors that a
//! search over the existing graph returns. Node degree is not bounded, so
//! early nodes turn into hubs that shorten greedy routes.
//!
//! # Quick Start
//!
//! ```rust
//! use smallworld::nsw::{build, knn_search, NswParams};
//! use rand::SeedableRng;
//!
//! # fn main() -> Result<(), smallworld::RetrieveError> {
//! let vectors = vec![
//!     vec![0.0, 0.0],
//!     vec![1.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![5.0, 5.0],
//!     vec![5.0, 6.0],
//! ];
//! let params = NswParams { k_build: 2, m_build: 3, seed: Some(7), ..Default::default() };
//! let graph = build(&vectors, params)?;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let result = knn_search(&graph, &[5.0, 5.5], 1, 5, &mut rng)?;
//! assert!(matches!(result.neighbors[0].0, 3 | 4));
//! # Ok(())
//! # }
//! ```
//!
//! # Search
//!
//! `m` restarts from random entry points share one visited set. A restart
//! stops once the closest unexpanded candidate is farther than the k-th best
//! result collected by earlier restarts:
//!
//! ```text
//! restart 1: no bound yet    -> explores its whole reachable region
//! restart r: bound = kth(r-1) -> stops at the first candidate beyond it
//! ```
//!
//! More restarts trade distance evaluations for recall.
//!
//! # References
//!
//! - Malkov et al. (2014): "Approximate nearest neighbor algorithm based on
//!   navigable small world graphs"
//! - Malkov & Yashunin (2016): <https://arxiv.org/abs/1603.09320>, the layered
//!   bounded-degree variant

pub mod construction;
pub mod graph;
pub mod index;
pub mod search;

pub use construction::{build, NswBuilder};
pub use graph::{GraphStats, Node, NodeId, NswGraph};
pub use index::{NswIndex, NswParams};
pub use search::{knn_search, SearchResult, TopK};
