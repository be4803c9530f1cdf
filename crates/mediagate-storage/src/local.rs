use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for stored objects (e.g., "/var/lib/mediagate")
    /// * `base_url` - Base URL the directory is served under (e.g., "http://localhost:3000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<StoredObject> {
        let target = self.key_to_path(key)?;
        // Written next to the target and renamed, so a key never names a partial file.
        let staging = target.with_extension("part");
        let started = std::time::Instant::now();

        let write = async {
            let mut out = fs::File::create(&staging).await?;
            out.write_all(&data).await?;
            out.sync_all().await?;
            fs::rename(&staging, &target).await
        };
        if let Err(e) = write.await {
            let _ = fs::remove_file(&staging).await;
            return Err(StorageError::UploadFailed(format!(
                "Failed to store {} under {}: {}",
                key,
                self.base_path.display(),
                e
            )));
        }

        tracing::info!(
            path = %target.display(),
            key = %key,
            content_type = %content_type,
            size_bytes = data.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(StoredObject {
            key: key.to_string(),
            location: self.generate_url(key),
        })
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
