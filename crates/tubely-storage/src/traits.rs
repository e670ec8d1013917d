//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;
use tubely_core::AppError;

/// Reader handed to [`Storage::put_stream`].
pub type StagedReader = Pin<Box<dyn AsyncRead + Send>>;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Stored reference is malformed: {0}")]
    DataIntegrity(String),

    #[error("Random source unavailable: {0}")]
    RandomSource(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::DataIntegrity(msg) => AppError::DataIntegrity(msg),
            StorageError::RandomSource(msg) => {
                AppError::Internal(format!("Failed to generate storage key: {}", msg))
            }
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// Objects are addressed by a generated key. What gets persisted on a record is the
/// backend's *reference* for that key ([`Storage::locator_for`]): a stable public URL for
/// local storage, or a `bucket,key` locator for bucket backends. Access URLs are always
/// recomputed from the reference ([`Storage::access_url`]).
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stream `reader` to `key` until EOF, returning the number of bytes written.
    ///
    /// Atomic from the caller's view: on error no object exists under `key`.
    async fn put_stream(
        &self,
        key: &str,
        content_type: &str,
        reader: StagedReader,
    ) -> StorageResult<u64>;

    /// URL under which `key` can be fetched right now.
    ///
    /// Private backends sign a fresh URL on every call.
    async fn url_for(&self, key: &str) -> StorageResult<String>;

    /// Reference to persist on a record for `key`.
    fn locator_for(&self, key: &str) -> StorageResult<String>;

    /// Resolve a persisted reference back to its key.
    fn key_for_reference(&self, reference: &str) -> StorageResult<String>;

    /// Materialize an access URL from a persisted reference.
    async fn access_url(&self, reference: &str) -> StorageResult<String> {
        let key = self.key_for_reference(reference)?;
        self.url_for(&key).await
    }

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Delete an object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// List stored keys, optionally restricted to those starting with `prefix`.
    async fn list_keys(&self, prefix: Option<&str>) -> StorageResult<Vec<String>>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
