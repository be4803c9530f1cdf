use serde::{Deserialize, Serialize};

/// One (category, confidence) pair emitted for an inspected image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub category: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
}

impl Detection {
    pub fn new(category: impl Into<String>, confidence: f32) -> Self {
        Self {
            category: category.into(),
            confidence,
        }
    }
}
