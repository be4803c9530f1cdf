//! Mediagate Storage Library
//!
//! This crate provides the storage abstraction the upload orchestrator writes
//! accepted content through, with implementations for S3 (and S3-compatible
//! providers) and the local filesystem.
//!
//! # Object key format
//!
//! Keys are flat: `{prefix}-{millis}.{extension}`, e.g. `valid-image-1718000000000.jpg`.
//! The millisecond stamp is strictly increasing within a process. Keys must not
//! contain `..`, backslashes or a leading `/`; see the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_storage, LazyStorage};
pub use keys::{object_key, validate_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use mediagate_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
