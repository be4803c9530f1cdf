//! Domain models of a pipeline run.

pub mod content;
pub mod detection;
pub mod file;
pub mod pipeline;
pub mod policy;
pub mod upload;

pub use content::{DecodedContent, SourceInfo};
pub use detection::Detection;
pub use file::{FileHandle, MediaFamily, SelectedFile};
pub use pipeline::{PipelineState, RejectReason};
pub use policy::{Clearance, PolicyDecision, Verdict};
pub use upload::UploadOutcome;
