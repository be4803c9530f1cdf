use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::Serialize;

use super::file::{MediaFamily, SelectedFile};
use crate::constants::FALLBACK_MIME_TYPE;
use crate::error::{GateError, GateResult};

/// Description of the file a payload was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub name: String,
    pub mime_type: String,
    pub family: MediaFamily,
    pub size_bytes: u64,
}

impl From<&SelectedFile> for SourceInfo {
    fn from(file: &SelectedFile) -> Self {
        Self {
            name: file.name().to_string(),
            mime_type: file.mime_type().to_string(),
            family: file.family(),
            size_bytes: file.size_bytes(),
        }
    }
}

/// Fully buffered file content, encoded as an RFC 2397 data URL.
///
/// Owned by a single pipeline run and never cached across runs.
#[derive(Debug, Clone)]
pub struct DecodedContent {
    data_url: String,
    source: SourceInfo,
}

impl DecodedContent {
    pub fn encode(source: SourceInfo, data: &[u8]) -> Self {
        let mime = if source.mime_type.trim().is_empty() {
            FALLBACK_MIME_TYPE
        } else {
            source.mime_type.trim()
        };
        let data_url = format!("data:{};base64,{}", mime, STANDARD.encode(data));
        Self { data_url, source }
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    pub fn family(&self) -> MediaFamily {
        self.source.family
    }

    /// Decode the data URL back into the raw file bytes.
    pub fn materialize(&self) -> GateResult<Bytes> {
        let rest = self
            .data_url
            .strip_prefix("data:")
            .ok_or_else(|| GateError::MalformedPayload("missing 'data:' scheme".to_string()))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| GateError::MalformedPayload("missing ',' separator".to_string()))?;
        if !meta.ends_with(";base64") {
            return Err(GateError::MalformedPayload(format!(
                "unsupported data URL encoding '{}'",
                meta
            )));
        }

        STANDARD
            .decode(payload)
            .map(Bytes::from)
            .map_err(|e| GateError::MalformedPayload(e.to_string()))
    }
}
