//! Add/build/search facade over the NSW graph.

use crate::distance::DistanceMetric;
use crate::nsw::construction::NswBuilder;
use crate::nsw::graph::{NodeId, NswGraph};
use crate::nsw::search::{knn_search, SearchResult};
use crate::{Result, RetrieveError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// NSW construction and search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NswParams {
    /// Neighbors attached to each new node.
    pub k_build: usize,
    /// Random restarts of the attachment search.
    pub m_build: usize,
    /// Default restarts for [`NswIndex::search`].
    pub m_search: usize,
    pub metric: DistanceMetric,
    /// Seed for entry-point selection. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for NswParams {
    fn default() -> Self {
        Self {
            k_build: 10,
            m_build: 20,
            m_search: 10,
            metric: DistanceMetric::L2,
            seed: None,
        }
    }
}

impl NswParams {
    /// Reject zero `k` or `m`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("k_build", self.k_build),
            ("m_build", self.m_build),
            ("m_search", self.m_search),
        ] {
            if value == 0 {
                return Err(RetrieveError::InvalidParameter(format!(
                    "{name} must be >= 1"
                )));
            }
        }
        Ok(())
    }
}

/// NSW index with caller-chosen document ids.
///
/// Vectors are staged by [`add`](Self::add) and inserted into the graph, in
/// staging order, by [`build`](Self::build).
#[derive(Debug)]
pub struct NswIndex {
    dimension: usize,
    params: NswParams,
    pending: Vec<Vec<f32>>,
    /// Internal node id -> external doc id.
    doc_ids: Vec<u32>,
    graph: Option<NswGraph>,
    rng: Mutex<StdRng>,
}

impl NswIndex {
    pub fn new(dimension: usize, params: NswParams) -> Result<Self> {
        if dimension == 0 {
            return Err(RetrieveError::InvalidParameter(
                "dimension must be >= 1".to_string(),
            ));
        }
        params.validate()?;
        // Offset so search draws differ from the builder's draws under one seed.
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            dimension,
            params,
            pending: Vec::new(),
            doc_ids: Vec::new(),
            graph: None,
            rng: Mutex::new(rng),
        })
    }

    pub fn params(&self) -> &NswParams {
        &self.params
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Vectors added so far, built or not.
    pub fn num_vectors(&self) -> usize {
        self.doc_ids.len()
    }

    /// The built graph, if [`build`](Self::build) has run.
    pub fn graph(&self) -> Option<&NswGraph> {
        self.graph.as_ref()
    }

    pub fn add(&mut self, doc_id: u32, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(RetrieveError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        if self.graph.is_some() {
            return Err(RetrieveError::InvalidParameter(
                "cannot add vectors after build".to_string(),
            ));
        }
        self.pending.push(vector);
        self.doc_ids.push(doc_id);
        Ok(())
    }

    pub fn add_slice(&mut self, doc_id: u32, vector: &[f32]) -> Result<()> {
        self.add(doc_id, vector.to_vec())
    }

    /// Insert all staged vectors into a new graph.
    ///
    /// Staged vectors are released only once the graph is complete; a failed
    /// build leaves the index as it was, so `build` can be retried.
    pub fn build(&mut self) -> Result<()> {
        if self.graph.is_some() {
            return Ok(());
        }
        if self.pending.is_empty() {
            return Err(RetrieveError::EmptyDataset);
        }
        let mut builder = NswBuilder::new(self.dimension, self.params.clone())?;
        builder.extend(self.pending.iter().cloned())?;
        self.graph = Some(builder.into_graph());
        self.pending = Vec::new();
        Ok(())
    }

    /// Search with the configured `m_search`. Returns `(doc_id, distance)`.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(u32, f32)>> {
        let result = self.search_with_stats(query, k, self.params.m_search)?;
        Ok(result.neighbors)
    }

    /// Search with explicit `k` and `m`, keeping hop/visit statistics.
    ///
    /// Neighbor ids in the result are external doc ids.
    pub fn search_with_stats(&self, query: &[f32], k: usize, m: usize) -> Result<SearchResult> {
        let graph = self.graph.as_ref().ok_or(RetrieveError::EmptyGraph)?;
        let mut result = {
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            knn_search(graph, query, k, m, &mut *rng)?
        };
        for (id, _) in &mut result.neighbors {
            *id = self.doc_id(*id);
        }
        Ok(result)
    }

    fn doc_id(&self, node: NodeId) -> u32 {
        self.doc_ids[node as usize]
    }

    pub fn size_bytes(&self) -> usize {
        let staged: usize = self.pending.iter().map(|v| v.len()).sum::<usize>()
            * std::mem::size_of::<f32>();
        staged
            + self.doc_ids.len() * std::mem::size_of::<u32>()
            + self.graph.as_ref().map_or(0, NswGraph::size_bytes)
    }
}
