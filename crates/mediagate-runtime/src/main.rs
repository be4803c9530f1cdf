//! Mediagate CLI: run one file through the upload gate from a terminal.
//!
//! Storage and detection settings come from the environment (see `.env`).

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mediagate_core::{GateConfig, PipelineState, SelectedFile, UploadOutcome};
use mediagate_runtime::terminal::{guess_mime, StderrNotifier, StdinPrompt};
use mediagate_runtime::{init_telemetry, initialize_gate};

#[derive(Parser)]
#[command(name = "mediagate", about = "Client-side content moderation upload gate")]
struct Cli {
    /// Emit logs and the final state as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a file and upload it if it passes moderation
    Check {
        /// Path to the image or PDF
        file: PathBuf,
        /// MIME type; guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,
        /// Confirm the upload without asking
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_telemetry(cli.json) {
        eprintln!("Failed to initialize tracing: {}", e);
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "mediagate failed");
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = GateConfig::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Check { file, mime, yes } => {
            let mime = mime.unwrap_or_else(|| guess_mime(&file).to_string());
            let selected = SelectedFile::from_path(&file, mime)
                .await
                .with_context(|| format!("Failed to open {}", file.display()))?;

            let mut controller = initialize_gate(
                &config,
                Arc::new(StdinPrompt::new(yes)),
                Arc::new(StderrNotifier),
            );
            let state = controller.on_file_selected(selected).await;

            if cli.json {
                println!("{}", serde_json::to_string(&state)?);
            } else {
                println!("{}", describe(&state));
            }
            Ok(exit_code(&state))
        }
    }
}

fn describe(state: &PipelineState) -> String {
    match state {
        PipelineState::Completed(UploadOutcome::Stored { location, .. }) => {
            format!("Stored at {}", location)
        }
        PipelineState::Completed(UploadOutcome::Cancelled) => "Upload cancelled".to_string(),
        PipelineState::Completed(UploadOutcome::Failed { reason, .. }) => {
            format!("Upload failed: {}", reason)
        }
        PipelineState::Rejected(reason) => format!("Rejected: {:?}", reason),
        PipelineState::Failed(message) => format!("Failed: {}", message),
        PipelineState::Idle | PipelineState::Loading => format!("{:?}", state),
    }
}

fn exit_code(state: &PipelineState) -> ExitCode {
    match state {
        PipelineState::Completed(UploadOutcome::Stored { .. })
        | PipelineState::Completed(UploadOutcome::Cancelled) => ExitCode::SUCCESS,
        PipelineState::Rejected(_) => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}
