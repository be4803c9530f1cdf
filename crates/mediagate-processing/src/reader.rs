//! FileReader adapter: raw handle in, fully buffered data URL out.

use mediagate_core::{DecodedContent, FileHandle, GateError, GateResult, SelectedFile, SourceInfo};

/// Read the whole selected file into memory.
///
/// A handle that cannot be a file (empty path, directory) is rejected before
/// any I/O is awaited. Read faults are returned as `GateError::Read` with the
/// underlying `io::Error` attached. Nothing is retried.
pub async fn read(file: &SelectedFile) -> GateResult<DecodedContent> {
    let mut source = SourceInfo::from(file);

    let data = match file.handle() {
        FileHandle::Blob(bytes) => bytes.to_vec(),
        FileHandle::Path(path) => {
            if path.as_os_str().is_empty() {
                return Err(GateError::InvalidInput(
                    "Invalid file type. Please select a valid file.".to_string(),
                ));
            }
            if path.is_dir() {
                return Err(GateError::InvalidInput(format!(
                    "{} is a directory, not a file",
                    path.display()
                )));
            }

            tokio::fs::read(path).await.map_err(|source| GateError::Read {
                file_name: file.name().to_string(),
                source,
            })?
        }
    };

    if data.len() as u64 != source.size_bytes {
        tracing::debug!(
            file_name = %source.name,
            reported = source.size_bytes,
            actual = data.len(),
            "File size changed since selection"
        );
        source.size_bytes = data.len() as u64;
    }

    Ok(DecodedContent::encode(source, &data))
}
