//! Fixed values of the upload gate.

/// Categories whose presence in an image forces rejection.
///
/// Matching is exact and case-sensitive; the classifier lowercases labels
/// before they reach the policy engine.
pub const DISALLOWED_CATEGORIES: [&str; 4] = ["person", "bird", "cat", "dog"];

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Content type stored for every accepted image, whatever its source encoding.
pub const IMAGE_UPLOAD_CONTENT_TYPE: &str = "image/jpeg";

pub const IMAGE_KEY_PREFIX: &str = "valid-image";
pub const IMAGE_KEY_EXTENSION: &str = "jpg";

pub const DOCUMENT_KEY_PREFIX: &str = "valid-pdf";
pub const DOCUMENT_KEY_EXTENSION: &str = "pdf";

/// MIME type used in data URLs when the picker reported none.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

pub const BYTES_PER_MB: usize = 1024 * 1024;
