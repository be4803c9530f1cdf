//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Upload timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Where a blob ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    /// Publicly addressable URL (or path-like location) of the object.
    pub location: String,
}

/// Storage abstraction trait
///
/// The bucket (or base directory) is bound when the backend is constructed,
/// so callers only name the object.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist `data` under `key` with the given content type.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<StoredObject>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
