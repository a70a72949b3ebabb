//! Unified traits for ANN indexes.

use crate::RetrieveError;

/// Unified trait for ANN index implementations.
pub trait ANNIndex {
    /// Add a vector to the index.
    fn add(&mut self, doc_id: u32, vector: Vec<f32>) -> Result<(), RetrieveError>;

    /// Add a vector to the index from a borrowed slice.
    ///
    /// Default implementation allocates a `Vec<f32>` and calls [`ANNIndex::add`].
    fn add_slice(&mut self, doc_id: u32, vector: &[f32]) -> Result<(), RetrieveError> {
        self.add(doc_id, vector.to_vec())
    }

    /// Build the index (required before search).
    fn build(&mut self) -> Result<(), RetrieveError>;

    /// Search for k nearest neighbors. Returns `(doc_id, distance)` ascending.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(u32, f32)>, RetrieveError>;

    /// Get index size in bytes (approximate).
    fn size_bytes(&self) -> usize;

    /// Get index statistics.
    fn stats(&self) -> ANNStats;

    /// Get vector dimension.
    fn dimension(&self) -> usize;

    /// Get number of vectors.
    fn num_vectors(&self) -> usize;
}

/// Statistics about an ANN index.
#[derive(Debug, Clone)]
pub struct ANNStats {
    pub num_vectors: usize,
    pub dimension: usize,
    pub size_bytes: usize,
    pub algorithm: String,
}

impl ANNIndex for crate::nsw::NswIndex {
    fn add(&mut self, doc_id: u32, vector: Vec<f32>) -> Result<(), RetrieveError> {
        self.add(doc_id, vector)
    }

    fn add_slice(&mut self, doc_id: u32, vector: &[f32]) -> Result<(), RetrieveError> {
        self.add_slice(doc_id, vector)
    }

    fn build(&mut self) -> Result<(), RetrieveError> {
        self.build()
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(u32, f32)>, RetrieveError> {
        self.search(query, k)
    }

    fn size_bytes(&self) -> usize {
        self.size_bytes()
    }

    fn stats(&self) -> ANNStats {
        ANNStats {
            num_vectors: self.num_vectors(),
            dimension: self.dimension(),
            size_bytes: self.size_bytes(),
            algorithm: "NSW".to_string(),
        }
    }

    fn dimension(&self) -> usize {
        self.dimension()
    }

    fn num_vectors(&self) -> usize {
        self.num_vectors()
    }
}
