use std::sync::Arc;

use mediagate_core::GateConfig;
use mediagate_storage::{LazyStorage, Storage};

/// Storage backend for the configured target, built on first upload.
pub fn setup_storage(config: &GateConfig) -> Arc<dyn Storage> {
    if config.storage_backend == mediagate_core::StorageBackend::S3 && config.s3_bucket.is_none() {
        tracing::warn!("S3_BUCKET is not set; uploads will fail until it is configured");
    }
    Arc::new(LazyStorage::new(config.clone()))
}
