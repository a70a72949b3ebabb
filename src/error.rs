//! Error types for smallworld.

use thiserror::Error;

/// Errors that can occur during construction, search, or dataset loading.
#[derive(Debug, Error)]
pub enum RetrieveError {
    /// Two vectors of different length were compared or inserted.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Construction was asked to index zero vectors.
    #[error("dataset is empty")]
    EmptyDataset,

    /// Search was run against a graph with no nodes.
    #[error("graph is empty")]
    EmptyGraph,

    /// Invalid parameter value (zero `k` or `m`, zero dimension).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A vector file did not follow the `.fvecs` / `.ivecs` layout.
    #[error("malformed vector file: {0}")]
    MalformedFile(String),

    /// I/O error while reading or writing a vector file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RetrieveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_both_dimensions() {
        let err = RetrieveError::DimensionMismatch {
            expected: 2,
            actual: 3,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 2, got 3");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: RetrieveError = io.into();
        assert!(matches!(err, RetrieveError::Io(_)));
    }
}
