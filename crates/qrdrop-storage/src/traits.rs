//! Blob store abstraction trait
//!
//! This module defines the BlobStore trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

/// Blob store operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The remote service answered, but not with success.
    #[error("Upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The remote service could not be reached or the exchange was cut short.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote service answered with success but an unusable body.
    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// Whether the failure came from the remote side of the store rather than
    /// from local configuration.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            StorageError::UpstreamStatus { .. }
                | StorageError::Transport(_)
                | StorageError::InvalidResponse(_)
                | StorageError::UploadFailed(_)
        )
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Blob store abstraction trait
///
/// The hand-off service only needs one capability: persist the bytes of an
/// uploaded file and learn where they can be fetched from. Implementations must
/// surface a non-success remote answer as an error, never as a URL.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `data` and return its durable URL.
    ///
    /// `data` is reference counted; backends hand it to their transport without
    /// copying it into a second buffer.
    async fn store(
        &self,
        owner_user_id: Uuid,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_classification() {
        assert!(StorageError::UpstreamStatus {
            status: 503,
            body: String::new()
        }
        .is_upstream());
        assert!(StorageError::Transport("reset".to_string()).is_upstream());
        assert!(!StorageError::ConfigError("missing key".to_string()).is_upstream());
        assert!(!StorageError::InvalidKey("..".to_string()).is_upstream());
    }
}
