//! Arena storage for the NSW graph.
//!
//! Nodes live in an append-only `Vec`; a node's id is its position. Neighbor
//! sets refer to other nodes only by id, so the graph has no cyclic ownership
//! and search can borrow it immutably while the builder is the sole writer.

use crate::distance::DistanceMetric;
use crate::{Result, RetrieveError};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Dense, zero-based node id assigned at insertion time.
///
/// A graph holds at most `u32::MAX as usize + 1` nodes.
pub type NodeId = u32;

/// Id for the node stored at `index`, if it fits in a [`NodeId`].
pub(crate) fn node_id_for(index: usize) -> Result<NodeId> {
    NodeId::try_from(index).map_err(|_| {
        RetrieveError::InvalidParameter(format!("graph is full: node index {index} exceeds u32 ids"))
    })
}

/// Neighbor ids in insertion order. No duplicates, no self-loops.
pub type NeighborList = SmallVec<[NodeId; 16]>;

/// A graph vertex.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    vector: Vec<f32>,
    neighbors: NeighborList,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn vector(&self) -> &[f32] {
        &self.vector
    }

    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns true if the edge was new.
    fn connect(&mut self, other: NodeId) -> bool {
        if other == self.id || self.neighbors.contains(&other) {
            return false;
        }
        self.neighbors.push(other);
        true
    }
}

/// Degree statistics for a built graph.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphStats {
    pub num_nodes: usize,
    /// Undirected edge count.
    pub num_edges: usize,
    pub min_degree: usize,
    pub max_degree: usize,
    pub avg_degree: f32,
}

/// Flat navigable small world graph.
///
/// Degree is unbounded: early nodes keep gaining edges as later nodes attach
/// to them. Edges are only ever added.
#[derive(Debug, Clone)]
pub struct NswGraph {
    nodes: Vec<Node>,
    dimension: usize,
    metric: DistanceMetric,
}

impl NswGraph {
    /// Create an empty graph. `dimension` is validated by the builder.
    pub fn new(dimension: usize, metric: DistanceMetric) -> Self {
        Self {
            nodes: Vec::new(),
            dimension,
            metric,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Vector of node `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[inline]
    pub fn vector(&self, id: NodeId) -> &[f32] {
        &self.nodes[id as usize].vector
    }

    /// Neighbors of node `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    #[inline]
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id as usize].neighbors
    }

    /// Append a node and wire bidirectional edges to `neighbor_ids`.
    ///
    /// Callers guarantee that `vector` has the graph's dimension and every
    /// neighbor id refers to an existing node. Fails only when the graph
    /// already holds the maximum number of nodes, before anything changes.
    pub(crate) fn push_node(&mut self, vector: Vec<f32>, neighbor_ids: &[NodeId]) -> Result<NodeId> {
        debug_assert_eq!(vector.len(), self.dimension);
        let id = node_id_for(self.nodes.len())?;
        let mut node = Node {
            id,
            vector,
            neighbors: NeighborList::with_capacity(neighbor_ids.len()),
        };

        for &neighbor in neighbor_ids {
            debug_assert!((neighbor as usize) < self.nodes.len());
            if node.connect(neighbor) {
                self.nodes[neighbor as usize].connect(id);
            }
        }

        self.nodes.push(node);
        Ok(id)
    }

    /// Degree statistics. All zeros for an empty graph.
    pub fn stats(&self) -> GraphStats {
        if self.nodes.is_empty() {
            return GraphStats::default();
        }

        let mut total = 0usize;
        let mut min_degree = usize::MAX;
        let mut max_degree = 0usize;
        for node in &self.nodes {
            let degree = node.degree();
            total += degree;
            min_degree = min_degree.min(degree);
            max_degree = max_degree.max(degree);
        }

        GraphStats {
            num_nodes: self.nodes.len(),
            num_edges: total / 2,
            min_degree,
            max_degree,
            avg_degree: total as f32 / self.nodes.len() as f32,
        }
    }

    /// True if every edge has its reverse edge.
    pub fn is_symmetric(&self) -> bool {
        self.nodes.iter().all(|node| {
            node.neighbors.iter().all(|&other| {
                self.node(other)
                    .is_some_and(|peer| peer.neighbors.contains(&node.id))
            })
        })
    }

    /// Approximate heap footprint in bytes.
    pub fn size_bytes(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| {
                n.vector.len() * std::mem::size_of::<f32>()
                    + n.neighbors.len() * std::mem::size_of::<NodeId>()
            })
            .sum()
    }
}
