//! Interfaces of the user-facing collaborators: the confirmation prompt and
//! the notice channel.

use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// A yes/no question put to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptRequest {
    pub title: String,
    pub message: String,
    pub kind: Severity,
    pub confirm_label: String,
    pub cancel_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PromptResponse {
    pub confirmed: bool,
}

impl PromptResponse {
    pub fn confirmed() -> Self {
        Self { confirmed: true }
    }

    /// Declined or dismissed.
    pub fn declined() -> Self {
        Self { confirmed: false }
    }
}

/// Presents a yes/no decision and suspends until the user answers.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    async fn prompt(&self, request: &PromptRequest) -> PromptResponse;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// Fire-and-forget user notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Error => {
                tracing::error!(title = %notice.title, "{}", notice.message)
            }
            Severity::Warning => {
                tracing::warn!(title = %notice.title, "{}", notice.message)
            }
            Severity::Success | Severity::Info => {
                tracing::info!(title = %notice.title, "{}", notice.message)
            }
        }
    }
}
