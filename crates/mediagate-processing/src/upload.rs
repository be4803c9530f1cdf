//! Upload orchestrator
//!
//! Sequences confirmation, blob construction and persistence for content that
//! already passed the policy. A declined prompt and a failed storage call are
//! both outcomes, not errors.

use std::sync::Arc;
use std::time::{Duration, Instant};

use mediagate_core::{Clearance, DecodedContent, GateError, GateResult, MediaFamily, UploadOutcome};
use mediagate_storage::{object_key, Storage, StorageError, StoredObject};

use crate::collaborators::{ConfirmationPrompt, Notice, Notifier, PromptRequest, Severity};

pub const STORAGE_FAILURE_TITLE: &str = "Upload failed";
pub const STORAGE_FAILURE_MESSAGE: &str = "The file could not be stored. Please try again.";

pub struct UploadOrchestrator {
    prompt: Arc<dyn ConfirmationPrompt>,
    storage: Arc<dyn Storage>,
    notifier: Arc<dyn Notifier>,
    storage_timeout: Option<Duration>,
    notify_on_failure: bool,
}

impl UploadOrchestrator {
    pub fn new(
        prompt: Arc<dyn ConfirmationPrompt>,
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            prompt,
            storage,
            notifier,
            storage_timeout: None,
            notify_on_failure: true,
        }
    }

    pub fn with_storage_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.storage_timeout = timeout;
        self
    }

    /// Whether a storage failure is also surfaced to the user.
    pub fn notify_on_failure(mut self, enabled: bool) -> Self {
        self.notify_on_failure = enabled;
        self
    }

    /// Ask the user to confirm, then persist the content.
    ///
    /// The `Clearance` can only come from an `Allow` decision.
    pub async fn submit(
        &self,
        content: &DecodedContent,
        clearance: Clearance,
    ) -> GateResult<UploadOutcome> {
        let family = content.family();
        let (prefix, extension, content_type) = family.upload_target().ok_or_else(|| {
            GateError::InvalidInput(format!(
                "no upload target for {} content",
                content.source().mime_type
            ))
        })?;

        tracing::debug!(
            file_name = %content.source().name,
            family = %family,
            reason = %clearance.decision().reason,
            "Requesting upload confirmation"
        );

        let response = self.prompt.prompt(&confirmation_request(family)).await;
        if !response.confirmed {
            tracing::info!(file_name = %content.source().name, "Upload declined by user");
            return Ok(UploadOutcome::Cancelled);
        }

        let data = content.materialize()?;
        let key = object_key(prefix, extension);
        let size = data.len();
        let start = Instant::now();

        match self.put(&key, data, content_type).await {
            Ok(stored) => {
                tracing::info!(
                    key = %stored.key,
                    location = %stored.location,
                    size_bytes = size,
                    content_type = %content_type,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Content stored"
                );
                Ok(UploadOutcome::Stored {
                    key: stored.key,
                    location: stored.location,
                })
            }
            Err(e) => {
                tracing::error!(
                    key = %key,
                    size_bytes = size,
                    backend = %self.storage.backend_type(),
                    error = %e,
                    "Storage upload failed"
                );
                if self.notify_on_failure {
                    self.notifier
                        .notify(Notice::error(STORAGE_FAILURE_TITLE, STORAGE_FAILURE_MESSAGE));
                }
                Ok(UploadOutcome::Failed {
                    key,
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn put(
        &self,
        key: &str,
        data: bytes::Bytes,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let put = self.storage.put(key, data, content_type);
        match self.storage_timeout {
            Some(limit) => tokio::time::timeout(limit, put)
                .await
                .unwrap_or(Err(StorageError::Timeout(limit))),
            None => put.await,
        }
    }
}

/// Prompt texts per media family.
pub fn confirmation_request(family: MediaFamily) -> PromptRequest {
    let (title, message, confirm) = match family {
        MediaFamily::Document => ("Valid PDF", "Do you want to upload this PDF?", "Yes, upload"),
        _ => ("Valid image", "Do you want to store this image?", "Yes, upload!"),
    };
    PromptRequest {
        title: title.to_string(),
        message: message.to_string(),
        kind: Severity::Success,
        confirm_label: confirm.to_string(),
        cancel_label: "No, cancel".to_string(),
    }
}
