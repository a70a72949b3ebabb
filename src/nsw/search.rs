//! Multi-restart greedy k-NN search.
//!
//! Each restart starts at a uniformly random node and expands the closest
//! unexpanded candidate until the candidate is farther than the current k-th
//! best result. The visited set is shared by all restarts of one call, so a
//! node's distance is computed at most once per call (entry points excepted).

use crate::nsw::graph::{NodeId, NswGraph};
use crate::{Result, RetrieveError};
use rand::Rng;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};
use tracing::trace;

/// Candidate during search. Ordered by distance, then id.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    id: NodeId,
    distance: f32,
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // total_cmp keeps NaN from poisoning the heap
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Bounded top-k accumulator.
///
/// A max-heap of at most `k` entries: the root is the current k-th best, so
/// insert-and-trim is `O(log k)` and input order does not matter.
#[derive(Debug, Clone)]
pub struct TopK {
    k: usize,
    heap: BinaryHeap<Candidate>,
}

impl TopK {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k.saturating_add(1).min(1024)),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.k
    }

    /// Distance of the k-th best entry, once `k` entries are held.
    pub fn worst_distance(&self) -> Option<f32> {
        if self.is_full() {
            self.heap.peek().map(|c| c.distance)
        } else {
            None
        }
    }

    /// Offer an entry; keeps it only if it ranks among the best `k`.
    pub fn push(&mut self, id: NodeId, distance: f32) {
        if self.k == 0 {
            return;
        }
        let candidate = Candidate { id, distance };
        if self.heap.len() < self.k {
            self.heap.push(candidate);
        } else if self.heap.peek().is_some_and(|worst| candidate < *worst) {
            self.heap.pop();
            self.heap.push(candidate);
        }
    }

    /// `(id, distance)` pairs ascending by distance, ties by id.
    pub fn into_sorted_vec(self) -> Vec<(NodeId, f32)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| (c.id, c.distance))
            .collect()
    }
}

/// Output of [`knn_search`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// `(id, distance)` ascending by distance, ties by id.
    pub neighbors: Vec<(NodeId, f32)>,
    /// Neighbor distance evaluations summed over all restarts.
    pub hops: usize,
    /// `hops / m`.
    pub avg_hops: f32,
    /// Largest hop count of a single restart.
    pub max_restart_hops: usize,
    /// Every distance evaluation, entry points included.
    pub total_visited: usize,
}

impl SearchResult {
    pub fn ids(&self) -> Vec<NodeId> {
        self.neighbors.iter().map(|&(id, _)| id).collect()
    }
}

/// What one restart discovered.
struct Restart {
    found: Vec<Candidate>,
    hops: usize,
}

/// Check the preconditions shared by every search entry point.
fn validate_search(graph: &NswGraph, query: &[f32], k: usize, m: usize) -> Result<()> {
    if graph.is_empty() {
        return Err(RetrieveError::EmptyGraph);
    }
    if k == 0 {
        return Err(RetrieveError::InvalidParameter("k must be >= 1".to_string()));
    }
    if m == 0 {
        return Err(RetrieveError::InvalidParameter("m must be >= 1".to_string()));
    }
    if query.len() != graph.dimension() {
        return Err(RetrieveError::DimensionMismatch {
            expected: graph.dimension(),
            actual: query.len(),
        });
    }
    Ok(())
}

/// Find approximate `k` nearest neighbors of `query` using `m` random restarts.
///
/// Entry points are drawn with replacement from `rng`; pass a seeded
/// generator for reproducible results.
///
/// # Errors
///
/// - [`RetrieveError::EmptyGraph`] if the graph has no nodes
/// - [`RetrieveError::InvalidParameter`] if `k` or `m` is zero
/// - [`RetrieveError::DimensionMismatch`] if `query` has the wrong length
pub fn knn_search<R: Rng>(
    graph: &NswGraph,
    query: &[f32],
    k: usize,
    m: usize,
    rng: &mut R,
) -> Result<SearchResult> {
    validate_search(graph, query, k, m)?;

    let mut visited: HashSet<NodeId> = HashSet::with_capacity(k.saturating_mul(m).min(graph.len()));
    let mut top = TopK::new(k);
    let mut hops = 0usize;
    let mut max_restart_hops = 0usize;
    let mut total_visited = 0usize;

    for restart in 0..m {
        let entry = rng.random_range(0..graph.len()) as NodeId;
        let outcome = explore(graph, query, entry, &top, &mut visited);

        trace!(restart, entry, hops = outcome.hops, "restart finished");

        total_visited += 1 + outcome.hops;
        hops += outcome.hops;
        max_restart_hops = max_restart_hops.max(outcome.hops);

        for c in outcome.found {
            top.push(c.id, c.distance);
        }
    }

    Ok(SearchResult {
        neighbors: top.into_sorted_vec(),
        hops,
        avg_hops: hops as f32 / m as f32,
        max_restart_hops,
        total_visited,
    })
}

/// One greedy exploration from `entry`.
///
/// `top` holds the results of earlier restarts only; it is the stopping bound
/// and is not updated until the caller merges `found`.
fn explore(
    graph: &NswGraph,
    query: &[f32],
    entry: NodeId,
    top: &TopK,
    visited: &mut HashSet<NodeId>,
) -> Restart {
    let metric = graph.metric();
    let bound = top.worst_distance();

    let start = Candidate {
        id: entry,
        distance: metric.distance(query, graph.vector(entry)),
    };

    let mut candidates = BinaryHeap::new();
    candidates.push(Reverse(start));

    let mut found = Vec::new();
    if visited.insert(entry) {
        found.push(start);
    }

    let mut hops = 0usize;
    while let Some(Reverse(current)) = candidates.pop() {
        if bound.is_some_and(|kth| current.distance > kth) {
            break;
        }

        for &neighbor in graph.neighbors(current.id) {
            if !visited.insert(neighbor) {
                continue;
            }
            let candidate = Candidate {
                id: neighbor,
                distance: metric.distance(query, graph.vector(neighbor)),
            };
            candidates.push(Reverse(candidate));
            found.push(candidate);
            hops += 1;
        }
    }

    Restart { found, hops }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMetric;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn line_graph(n: usize) -> NswGraph {
        let mut g = NswGraph::new(1, DistanceMetric::L2);
        for i in 0..n {
            let prev: Vec<NodeId> = if i == 0 { vec![] } else { vec![i as NodeId - 1] };
            g.push_node(vec![i as f32], &prev).unwrap();
        }
        g
    }

    #[test]
    fn topk_keeps_best_regardless_of_input_order() {
        let mut top = TopK::new(3);
        for (id, d) in [(0, 5.0), (1, 1.0), (2, 4.0), (3, 0.5), (4, 3.0), (5, 2.0)] {
            top.push(id, d);
        }
        assert_eq!(top.into_sorted_vec(), vec![(3, 0.5), (1, 1.0), (5, 2.0)]);
    }

    #[test]
    fn topk_breaks_ties_by_id() {
        let mut top = TopK::new(2);
        top.push(7, 1.0);
        top.push(2, 1.0);
        top.push(5, 1.0);
        assert_eq!(top.into_sorted_vec(), vec![(2, 1.0), (5, 1.0)]);
    }

    #[test]
    fn topk_worst_distance_only_when_full() {
        let mut top = TopK::new(2);
        top.push(0, 3.0);
        assert_eq!(top.worst_distance(), None);
        top.push(1, 1.0);
        assert_eq!(top.worst_distance(), Some(3.0));
        top.push(2, 2.0);
        assert_eq!(top.worst_distance(), Some(2.0));
    }

    #[test]
    fn single_node_graph_returns_that_node() {
        let mut g = NswGraph::new(2, DistanceMetric::L2);
        g.push_node(vec![1.0, 1.0], &[]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let res = knn_search(&g, &[1.0, 1.0], 3, 4, &mut rng).unwrap();
        assert_eq!(res.neighbors, vec![(0, 0.0)]);
        assert_eq!(res.hops, 0);
        assert_eq!(res.total_visited, 4);
    }

    #[test]
    fn line_graph_walks_to_target() {
        let g = line_graph(50);
        let mut rng = StdRng::seed_from_u64(7);
        let res = knn_search(&g, &[42.2], 2, 1, &mut rng).unwrap();
        assert_eq!(res.ids(), vec![42, 43]);
        assert!(res.hops <= res.total_visited);
    }

    #[test]
    fn seeded_search_is_deterministic() {
        let g = line_graph(30);
        let a = knn_search(&g, &[3.3], 4, 3, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = knn_search(&g, &[3.3], 4, 3, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn validation_errors() {
        let g = line_graph(3);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            knn_search(&g, &[0.0], 0, 1, &mut rng),
            Err(RetrieveError::InvalidParameter(_))
        ));
        assert!(matches!(
            knn_search(&g, &[0.0], 1, 0, &mut rng),
            Err(RetrieveError::InvalidParameter(_))
        ));
        assert!(matches!(
            knn_search(&g, &[0.0, 1.0], 1, 1, &mut rng),
            Err(RetrieveError::DimensionMismatch {
                expected: 1,
                actual: 2
            })
        ));
        let empty = NswGraph::new(1, DistanceMetric::L2);
        assert!(matches!(
            knn_search(&empty, &[0.0], 1, 1, &mut rng),
            Err(RetrieveError::EmptyGraph)
        ));
    }
}
