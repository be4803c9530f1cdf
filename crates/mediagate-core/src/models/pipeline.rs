use serde::Serialize;

use super::upload::UploadOutcome;

/// Why a run ended in `Rejected`. Rejections are normal outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    UnsupportedType { mime_type: String },
    TooLarge { size_bytes: u64, max_bytes: u64 },
    Blocked { categories: Vec<String> },
    InvalidDocument,
}

/// State of the pipeline owned by one controller.
///
/// `Idle -> Loading -> {Completed, Rejected, Failed}`; a new selection starts
/// over from `Loading`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum PipelineState {
    #[default]
    Idle,
    Loading,
    Completed(UploadOutcome),
    Rejected(RejectReason),
    Failed(String),
}

impl PipelineState {
    /// Busy flag exposed to the presentation layer.
    pub fn is_busy(&self) -> bool {
        matches!(self, PipelineState::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineState::Completed(_) | PipelineState::Rejected(_) | PipelineState::Failed(_)
        )
    }
}
