//! Mediagate Plugins
//!
//! Detection backends that plug into the content classifier through the
//! `ModelLoader` / `DetectionModel` seam.

#[cfg(feature = "detector-aws-rekognition")]
pub mod aws_rekognition;

#[cfg(feature = "detector-aws-rekognition")]
pub use aws_rekognition::{RekognitionConfig, RekognitionDetector, RekognitionLoader};
