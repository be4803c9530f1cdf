//! Error types module
//!
//! `GateError` covers the genuinely unexpected faults of a pipeline run: a bad
//! handle, a failed read, an undecodable image, a classifier fault. Policy
//! rejections, user cancellations and storage failures are outcomes, not
//! errors, and never show up here.

use std::io;
use std::time::Duration;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like caller misuse
    Debug,
    /// Warning level - for recoverable issues like timeouts or cancellation
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Read failed for {file_name}: {source}")]
    Read {
        file_name: String,
        #[source]
        source: io::Error,
    },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Image decode failed: {0}")]
    ImageDecode(String),

    #[error("Classification failed: {0}")]
    Classification(String),

    #[error("Classification failed: {message}")]
    ClassificationWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Timed out after {after:?} waiting for {operation}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Pipeline cancelled")]
    Cancelled,
}

pub type GateResult<T> = Result<T, GateError>;

impl GateError {
    pub fn classification(message: impl Into<String>, source: anyhow::Error) -> Self {
        GateError::ClassificationWithSource {
            message: message.into(),
            source,
        }
    }

    /// True for faults raised by the detection collaborator.
    pub fn is_classification(&self) -> bool {
        matches!(
            self,
            GateError::Classification(_)
                | GateError::ClassificationWithSource { .. }
                | GateError::Timeout {
                    operation: "classification",
                    ..
                }
        )
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            GateError::InvalidInput(_) => LogLevel::Debug,
            GateError::Timeout { .. } | GateError::Cancelled => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }

    /// Message shown to the user in the failure notice.
    ///
    /// Internal details (paths, SDK messages) stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            GateError::InvalidInput(_) => "Invalid file type. Please select a valid file.".into(),
            GateError::Read { .. } | GateError::MalformedPayload(_) => {
                "The selected file could not be read.".into()
            }
            GateError::ImageDecode(_) => "The selected image could not be decoded.".into(),
            GateError::Classification(_)
            | GateError::ClassificationWithSource { .. }
            | GateError::Timeout { .. } => {
                "The image could not be inspected. Please try again.".into()
            }
            GateError::Cancelled => "The upload was cancelled.".into(),
        }
    }
}
