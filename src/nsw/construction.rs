//! Incremental NSW construction.
//!
//! Insertion `i` attaches the new node to the `k_build` approximate nearest
//! neighbors found by searching the graph of nodes `0..i`. While the graph
//! holds at most `k_build` nodes, the new node is connected to all of them,
//! so the first `k_build + 1` nodes form a clique.
//!
//! Insertions are strictly sequential: each one reads the neighbor sets
//! written by every earlier one.

use crate::nsw::graph::{node_id_for, NodeId, NswGraph};
use crate::nsw::index::NswParams;
use crate::nsw::search::knn_search;
use crate::{Result, RetrieveError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

const PROGRESS_INTERVAL: usize = 1000;

/// Owns a graph under construction. The only writer of [`NswGraph`].
#[derive(Debug)]
pub struct NswBuilder {
    graph: NswGraph,
    params: NswParams,
    rng: StdRng,
}

impl NswBuilder {
    /// Create a builder for vectors of `dimension` components.
    pub fn new(dimension: usize, params: NswParams) -> Result<Self> {
        if dimension == 0 {
            return Err(RetrieveError::InvalidParameter(
                "dimension must be >= 1".to_string(),
            ));
        }
        params.validate()?;
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            graph: NswGraph::new(dimension, params.metric),
            params,
            rng,
        })
    }

    pub fn params(&self) -> &NswParams {
        &self.params
    }

    pub fn graph(&self) -> &NswGraph {
        &self.graph
    }

    pub fn into_graph(self) -> NswGraph {
        self.graph
    }

    /// Insert one vector and return its node id.
    ///
    /// The vector and the id space are checked before anything is mutated,
    /// so on error the graph is unchanged.
    pub fn insert(&mut self, vector: Vec<f32>) -> Result<NodeId> {
        if vector.len() != self.graph.dimension() {
            return Err(RetrieveError::DimensionMismatch {
                expected: self.graph.dimension(),
                actual: vector.len(),
            });
        }
        node_id_for(self.graph.len())?;

        let neighbor_ids: Vec<NodeId> = if self.graph.len() <= self.params.k_build {
            (0..self.graph.len() as NodeId).collect()
        } else {
            knn_search(
                &self.graph,
                &vector,
                self.params.k_build,
                self.params.m_build,
                &mut self.rng,
            )?
            .ids()
        };

        let id = self.graph.push_node(vector, &neighbor_ids)?;

        let inserted = id as usize + 1;
        if inserted % PROGRESS_INTERVAL == 0 {
            debug!(inserted, "nsw construction progress");
        }
        Ok(id)
    }

    /// Insert vectors in order, stopping at the first failure.
    ///
    /// Nodes inserted before the failure stay in the graph, which remains
    /// valid and searchable.
    pub fn extend<I>(&mut self, vectors: I) -> Result<()>
    where
        I: IntoIterator<Item = Vec<f32>>,
    {
        for vector in vectors {
            self.insert(vector)?;
        }
        Ok(())
    }
}

/// Build a graph from `vectors`, in order. Node `i` is `vectors[i]`.
///
/// # Errors
///
/// - [`RetrieveError::EmptyDataset`] if `vectors` is empty
/// - [`RetrieveError::DimensionMismatch`] if any vector's length differs from the first
/// - [`RetrieveError::InvalidParameter`] if `k_build` or `m_build` is zero
pub fn build(vectors: &[Vec<f32>], params: NswParams) -> Result<NswGraph> {
    let first = vectors.first().ok_or(RetrieveError::EmptyDataset)?;
    let mut builder = NswBuilder::new(first.len(), params)?;
    builder.extend(vectors.iter().cloned())?;

    let graph = builder.into_graph();
    let stats = graph.stats();
    debug!(
        nodes = stats.num_nodes,
        edges = stats.num_edges,
        min_degree = stats.min_degree,
        max_degree = stats.max_degree,
        avg_degree = stats.avg_degree,
        "nsw graph built"
    );
    Ok(graph)
}
