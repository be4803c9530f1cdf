//! Prompt and notice adapters for the terminal front end.

use std::path::Path;

use async_trait::async_trait;
use mediagate_processing::{
    ConfirmationPrompt, Notice, Notifier, PromptRequest, PromptResponse, Severity,
    TracingNotifier,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Asks on stderr and reads a `y`/`n` answer from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt {
    auto_confirm: bool,
}

impl StdinPrompt {
    pub fn new(auto_confirm: bool) -> Self {
        Self { auto_confirm }
    }
}

#[async_trait]
impl ConfirmationPrompt for StdinPrompt {
    async fn prompt(&self, request: &PromptRequest) -> PromptResponse {
        if self.auto_confirm {
            tracing::debug!(title = %request.title, "Confirmation auto-accepted");
            return PromptResponse::confirmed();
        }

        let question = format!(
            "{}: {} [y = {}, n = {}] ",
            request.title, request.message, request.confirm_label, request.cancel_label
        );
        let mut stderr = tokio::io::stderr();
        if stderr.write_all(question.as_bytes()).await.is_err() || stderr.flush().await.is_err() {
            return PromptResponse::declined();
        }

        let mut line = String::new();
        match BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
            Ok(_) => PromptResponse {
                confirmed: parse_answer(&line),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read confirmation answer");
                PromptResponse::declined()
            }
        }
    }
}

/// Anything but an explicit yes declines, including EOF.
pub fn parse_answer(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Prints notices to stderr and logs them.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: Notice) {
        let marker = match notice.severity {
            Severity::Success => "ok",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        eprintln!("[{}] {}: {}", marker, notice.title, notice.message);
        TracingNotifier.notify(notice);
    }
}

/// MIME type for a path, from its extension.
pub fn guess_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
