//! Mediagate Processing Library
//!
//! The validation-and-decision pipeline: read the selected file, decode and
//! classify images, apply the moderation policy, ask the user for
//! confirmation and persist accepted content.

pub mod classifier;
pub mod collaborators;
pub mod decode;
pub mod pipeline;
pub mod policy;
pub mod reader;
pub mod upload;

// Re-export commonly used types
pub use classifier::{ContentClassifier, DetectionModel, ModelLoader, RawDetection};
pub use collaborators::{
    ConfirmationPrompt, Notice, Notifier, PromptRequest, PromptResponse, Severity,
    TracingNotifier,
};
pub use decode::{decode_image, DecodedImage};
pub use pipeline::{PipelineController, PipelineLimits};
pub use policy::{decide, decide_document, validate_document};
pub use reader::read;
pub use upload::UploadOrchestrator;
