#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use mediagate_core::GateConfig;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &GateConfig) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;

            let storage = S3Storage::new(bucket, region, config.s3_endpoint.clone())?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

/// Storage that builds its backend on first use.
///
/// Missing bucket or credentials surface as a `ConfigError` from the first
/// `put`, not at startup. A failed build is retried on the next call.
pub struct LazyStorage {
    config: GateConfig,
    inner: OnceCell<Arc<dyn Storage>>,
}

impl LazyStorage {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            inner: OnceCell::new(),
        }
    }

    async fn backend(&self) -> StorageResult<&Arc<dyn Storage>> {
        self.inner
            .get_or_try_init(|| async {
                tracing::debug!(
                    backend = %self.config.storage_backend,
                    "Initializing storage backend"
                );
                create_storage(&self.config).await
            })
            .await
    }
}

#[async_trait]
impl Storage for LazyStorage {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<StoredObject> {
        self.backend().await?.put(key, data, content_type).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.config.storage_backend
    }
}
