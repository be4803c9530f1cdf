//! Pipeline controller
//!
//! Owns the state of one upload gate and drives a selected file through
//! read → inspect → decide → confirm → persist. Steps run strictly in sequence;
//! `&mut self` keeps a controller to one run at a time. State changes are
//! published on a `watch` channel for the presentation layer.

use std::sync::Arc;
use std::time::Instant;

use mediagate_core::constants::BYTES_PER_MB;
use mediagate_core::{
    GateConfig, GateError, GateResult, LogLevel, MediaFamily, PipelineState, PolicyDecision,
    RejectReason, SelectedFile,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::classifier::ContentClassifier;
use crate::collaborators::{Notice, Notifier};
use crate::decode::decode_image;
use crate::policy::{decide, decide_document, validate_document};
use crate::reader::read;
use crate::upload::UploadOrchestrator;

const INTERRUPTED_MESSAGE: &str = "Pipeline interrupted";
/// Notice titles for runs that end in `Failed`. No upload was attempted.
pub const PROCESSING_FAILURE_TITLE: &str = "Processing failed";
pub const CANCELLED_TITLE: &str = "Processing cancelled";

/// Per-family size limits, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineLimits {
    pub max_image_bytes: u64,
    pub max_document_bytes: u64,
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self::from(&GateConfig::default())
    }
}

impl From<&GateConfig> for PipelineLimits {
    fn from(config: &GateConfig) -> Self {
        Self {
            max_image_bytes: config.max_image_size_bytes as u64,
            max_document_bytes: config.max_document_size_bytes as u64,
        }
    }
}

impl PipelineLimits {
    fn max_for(&self, family: MediaFamily) -> u64 {
        match family {
            MediaFamily::Image => self.max_image_bytes,
            MediaFamily::Document => self.max_document_bytes,
            MediaFamily::Invalid => 0,
        }
    }
}

pub struct PipelineController {
    classifier: Arc<ContentClassifier>,
    uploader: UploadOrchestrator,
    notifier: Arc<dyn Notifier>,
    limits: PipelineLimits,
    state: watch::Sender<PipelineState>,
}

/// Moves a still-busy state to `Failed` when a run is dropped mid-flight.
struct BusyGuard<'a> {
    state: &'a watch::Sender<PipelineState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if self.state.borrow().is_busy() {
            tracing::warn!("Pipeline run dropped before completion");
            self.state
                .send_replace(PipelineState::Failed(INTERRUPTED_MESSAGE.to_string()));
        }
    }
}

impl PipelineController {
    pub fn new(
        classifier: Arc<ContentClassifier>,
        uploader: UploadOrchestrator,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(PipelineState::Idle);
        Self {
            classifier,
            uploader,
            notifier,
            limits: PipelineLimits::default(),
            state,
        }
    }

    pub fn with_limits(mut self, limits: PipelineLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().is_busy()
    }

    /// Observe state transitions, starting from the current state.
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    pub fn classifier(&self) -> &Arc<ContentClassifier> {
        &self.classifier
    }

    /// Run the gate for one selected file and return the terminal state.
    pub async fn on_file_selected(&mut self, file: SelectedFile) -> PipelineState {
        self.on_file_selected_with_cancel(file, CancellationToken::new()).await
    }

    /// Like [`on_file_selected`](Self::on_file_selected), abandoning the run
    /// with `Failed` as soon as `cancel` fires.
    pub async fn on_file_selected_with_cancel(
        &mut self,
        file: SelectedFile,
        cancel: CancellationToken,
    ) -> PipelineState {
        let this = &*self;
        let start = Instant::now();

        tracing::info!(
            file_name = %file.name(),
            mime_type = %file.mime_type(),
            size_bytes = file.size_bytes(),
            "File selected"
        );
        this.state.send_replace(PipelineState::Loading);
        let _guard = BusyGuard { state: &this.state };

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GateError::Cancelled),
            result = this.run(&file) => result,
        };

        let terminal = match result {
            Ok(state) => state,
            Err(e) => this.fail(&file, e),
        };

        tracing::debug!(
            file_name = %file.name(),
            state = ?terminal,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Pipeline run finished"
        );
        this.state.send_replace(terminal.clone());
        terminal
    }

    async fn run(&self, file: &SelectedFile) -> GateResult<PipelineState> {
        let family = file.family();
        if family == MediaFamily::Invalid {
            tracing::debug!(mime_type = %file.mime_type(), "Unsupported file type");
            self.notifier.notify(Notice::error(
                "Invalid file type",
                "Please select an image or PDF file.",
            ));
            return Ok(PipelineState::Rejected(RejectReason::UnsupportedType {
                mime_type: file.mime_type().to_string(),
            }));
        }

        if let Some(rejected) = self.check_size(family, file.size_bytes()) {
            return Ok(rejected);
        }

        let content = read(file).await?;
        // The picker's size may be stale; re-check what was actually read.
        if let Some(rejected) = self.check_size(family, content.source().size_bytes) {
            return Ok(rejected);
        }

        let decision = match family {
            MediaFamily::Document => {
                let bytes = content.materialize()?;
                decide_document(validate_document(&bytes))
            }
            _ => {
                let image = decode_image(&content).await?;
                let detections = self.classifier.classify(&image).await?;
                tracing::debug!(
                    file_name = %file.name(),
                    detections = ?detections,
                    "Image classified"
                );
                decide(&detections)
            }
        };

        match decision.into_clearance() {
            Ok(clearance) => {
                let outcome = self.uploader.submit(&content, clearance).await?;
                Ok(PipelineState::Completed(outcome))
            }
            Err(blocked) => Ok(self.reject(family, file, blocked)),
        }
    }

    fn check_size(&self, family: MediaFamily, size_bytes: u64) -> Option<PipelineState> {
        let max_bytes = self.limits.max_for(family);
        if size_bytes <= max_bytes {
            return None;
        }

        tracing::debug!(size_bytes, max_bytes, family = %family, "File too large");
        self.notifier.notify(Notice::error(
            "File too large",
            format!(
                "The file exceeds the {} MB limit.",
                max_bytes / BYTES_PER_MB as u64
            ),
        ));
        Some(PipelineState::Rejected(RejectReason::TooLarge {
            size_bytes,
            max_bytes,
        }))
    }

    fn reject(
        &self,
        family: MediaFamily,
        file: &SelectedFile,
        decision: PolicyDecision,
    ) -> PipelineState {
        tracing::info!(
            file_name = %file.name(),
            matched = ?decision.matched,
            reason = %decision.reason,
            "Content rejected by policy"
        );

        if family == MediaFamily::Document {
            self.notifier.notify(Notice::error("Invalid PDF", decision.reason));
            PipelineState::Rejected(RejectReason::InvalidDocument)
        } else {
            self.notifier.notify(Notice::error("Invalid image", decision.reason));
            PipelineState::Rejected(RejectReason::Blocked {
                categories: decision.matched,
            })
        }
    }

    fn fail(&self, file: &SelectedFile, error: GateError) -> PipelineState {
        match error.log_level() {
            LogLevel::Debug => {
                tracing::debug!(file_name = %file.name(), error = %error, "Pipeline run failed")
            }
            LogLevel::Warn => {
                tracing::warn!(file_name = %file.name(), error = %error, "Pipeline run failed")
            }
            LogLevel::Error => {
                tracing::error!(
                    file_name = %file.name(),
                    error = %error,
                    error_debug = ?error,
                    "Pipeline run failed"
                )
            }
        }

        let title = match &error {
            GateError::Cancelled => CANCELLED_TITLE,
            _ => PROCESSING_FAILURE_TITLE,
        };
        self.notifier.notify(Notice::error(title, error.user_message()));
        PipelineState::Failed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_follow_config() {
        let config = GateConfig {
            max_image_size_bytes: 3 * BYTES_PER_MB,
            ..GateConfig::default()
        };
        let limits = PipelineLimits::from(&config);
        assert_eq!(limits.max_image_bytes, 3 * BYTES_PER_MB as u64);
        assert_eq!(limits.max_for(MediaFamily::Document), 50 * BYTES_PER_MB as u64);
        assert_eq!(limits.max_for(MediaFamily::Invalid), 0);
    }
}
