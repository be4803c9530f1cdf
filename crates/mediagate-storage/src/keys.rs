//! Object key generation shared by every backend.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::traits::{StorageError, StorageResult};

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Milliseconds since the epoch, bumped so that no two calls in this process
/// return the same value.
fn next_stamp() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_STAMP.compare_exchange_weak(last, candidate, Ordering::SeqCst, Ordering::Relaxed)
        {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}

/// Generate a unique object key: `{prefix}-{millis}.{extension}`.
pub fn object_key(prefix: &str, extension: &str) -> String {
    format!("{}-{}.{}", prefix, next_stamp(), extension)
}

/// Reject keys that could escape a bucket prefix or base directory.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.trim().is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            key
        )));
    }
    Ok(())
}
