use thiserror::Error;

/// A convenience `Result` alias using [`ChunkvaultError`].
pub type ChunkvaultResult<T> = Result<T, ChunkvaultError>;

/// Top-level error type for chunkvault.
///
/// I/O failures are fatal for the call in progress. Serialization and vector
/// errors on a single stored record are isolated by the stores and reported
/// as skipped records instead of being returned.
#[derive(Error, Debug)]
pub enum ChunkvaultError {
    /// The backing file could not be opened, read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Two embeddings of different lengths were compared.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Length of the reference (query) embedding.
        expected: usize,
        /// Length of the embedding it was compared against.
        actual: usize,
    },

    /// An embedding has no direction: empty, all zeros, or non-finite.
    #[error("Degenerate vector: {0}")]
    DegenerateVector(String),

    /// Invalid store or CLI configuration.
    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ChunkvaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ChunkvaultError = io.into();
        assert!(matches!(err, ChunkvaultError::Io(_)));
    }

    #[test]
    fn test_json_error_becomes_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ChunkvaultError = json_err.into();
        assert!(matches!(err, ChunkvaultError::Serialization(_)));
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = ChunkvaultError::DimensionMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3, got 2");
    }
}
