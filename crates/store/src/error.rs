//! Store error types

use thiserror::Error;

/// Errors surfaced by the ingestion store
///
/// `EmptyListenAddr` and schema-creation failures can only occur inside
/// [`crate::MetricStore::new`] and are fatal at startup; everything else is
/// recoverable and aborts the current batch only. No partial metadata or
/// metrics from a failed batch are persisted or forwarded.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No listen address to derive the import URL from
    #[error("empty listen address")]
    EmptyListenAddr,

    /// Embedded store preparation or execution error
    #[error("database error: {0}")]
    Database(#[from] turso::Error),

    /// A storage-node record carried an undecodable resource group tag
    #[error("resource group tag decode failed: {0}")]
    TagDecode(#[from] prost::DecodeError),

    /// Metric batch serialization error
    #[error("metric encode failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// Transport failure or non-2xx response from the ingestion endpoint
    #[error("metric export failed: {0}")]
    Export(#[from] reqwest::Error),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::EmptyListenAddr;
        assert!(err.to_string().contains("empty listen address"));

        let err = StoreError::TagDecode(prost::DecodeError::new("truncated"));
        assert!(err.to_string().contains("resource group tag"));
    }
}
