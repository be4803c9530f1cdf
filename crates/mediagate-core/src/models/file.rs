use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DOCUMENT_KEY_EXTENSION, DOCUMENT_KEY_PREFIX, IMAGE_KEY_EXTENSION, IMAGE_KEY_PREFIX,
    IMAGE_UPLOAD_CONTENT_TYPE, PDF_CONTENT_TYPE,
};

/// Media family derived from the MIME type reported by the file picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFamily {
    Image,
    Document,
    Invalid,
}

impl MediaFamily {
    /// `image/*` is an image, `application/pdf` a document, anything else invalid.
    ///
    /// MIME types compare case-insensitively and parameters (`;charset=...`)
    /// are ignored.
    pub fn from_mime(mime_type: &str) -> Self {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        if essence.starts_with("image/") && essence.len() > "image/".len() {
            MediaFamily::Image
        } else if essence == PDF_CONTENT_TYPE {
            MediaFamily::Document
        } else {
            MediaFamily::Invalid
        }
    }

    /// (key prefix, key extension, stored content type) for accepted content.
    pub fn upload_target(&self) -> Option<(&'static str, &'static str, &'static str)> {
        match self {
            MediaFamily::Image => Some((
                IMAGE_KEY_PREFIX,
                IMAGE_KEY_EXTENSION,
                IMAGE_UPLOAD_CONTENT_TYPE,
            )),
            MediaFamily::Document => {
                Some((DOCUMENT_KEY_PREFIX, DOCUMENT_KEY_EXTENSION, PDF_CONTENT_TYPE))
            }
            MediaFamily::Invalid => None,
        }
    }
}

impl Display for MediaFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaFamily::Image => write!(f, "image"),
            MediaFamily::Document => write!(f, "document"),
            MediaFamily::Invalid => write!(f, "invalid"),
        }
    }
}

/// Raw handle handed over by the file picker.
#[derive(Debug, Clone)]
pub enum FileHandle {
    /// A file on the local filesystem, read on demand.
    Path(PathBuf),
    /// Bytes already held in memory.
    Blob(Bytes),
}

/// A single user-selected file. Read-only for the duration of a run.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    mime_type: String,
    size_bytes: u64,
    handle: FileHandle,
}

impl SelectedFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
        handle: FileHandle,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            handle,
        }
    }

    /// Selection backed by in-memory bytes.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        let size = data.len() as u64;
        Self::new(name, mime_type, size, FileHandle::Blob(data))
    }

    /// Selection backed by a path; size is taken from the filesystem.
    pub async fn from_path(
        path: impl AsRef<Path>,
        mime_type: impl Into<String>,
    ) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        Ok(Self::new(
            name,
            mime_type,
            metadata.len(),
            FileHandle::Path(path.to_path_buf()),
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn family(&self) -> MediaFamily {
        MediaFamily::from_mime(&self.mime_type)
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn handle(&self) -> &FileHandle {
        &self.handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_from_mime() {
        assert_eq!(MediaFamily::from_mime("image/png"), MediaFamily::Image);
        assert_eq!(MediaFamily::from_mime("IMAGE/JPEG"), MediaFamily::Image);
        assert_eq!(MediaFamily::from_mime("application/pdf"), MediaFamily::Document);
        assert_eq!(
            MediaFamily::from_mime("application/pdf; charset=binary"),
            MediaFamily::Document
        );
        assert_eq!(MediaFamily::from_mime("text/plain"), MediaFamily::Invalid);
        assert_eq!(MediaFamily::from_mime("image/"), MediaFamily::Invalid);
        assert_eq!(MediaFamily::from_mime(""), MediaFamily::Invalid);
        assert_eq!(MediaFamily::from_mime("application/pdfx"), MediaFamily::Invalid);
    }

    #[test]
    fn upload_targets() {
        assert_eq!(
            MediaFamily::Image.upload_target(),
            Some(("valid-image", "jpg", "image/jpeg"))
        );
        assert_eq!(
            MediaFamily::Document.upload_target(),
            Some(("valid-pdf", "pdf", "application/pdf"))
        );
        assert_eq!(MediaFamily::Invalid.upload_target(), None);
    }

    #[test]
    fn from_bytes_sets_size() {
        let file = SelectedFile::from_bytes("a.png", "image/png", vec![1u8, 2, 3]);
        assert_eq!(file.size_bytes(), 3);
        assert_eq!(file.family(), MediaFamily::Image);
        assert!(matches!(file.handle(), FileHandle::Blob(b) if b.len() == 3));
    }
}
