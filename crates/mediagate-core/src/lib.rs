//! Mediagate Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration and
//! constants shared by every Mediagate component: the file reader, the
//! content classifier, the policy engine, the upload orchestrator and the
//! pipeline controller.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::GateConfig;
pub use error::{GateError, GateResult, LogLevel};
pub use models::{
    Clearance, DecodedContent, Detection, FileHandle, MediaFamily, PipelineState,
    PolicyDecision, RejectReason, SelectedFile, SourceInfo, UploadOutcome, Verdict,
};
pub use storage_types::StorageBackend;
