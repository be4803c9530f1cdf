use serde::Serialize;

/// Terminal result of one confirmed-or-declined upload attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// The user confirmed and the storage call succeeded.
    Stored { key: String, location: String },
    /// The user declined or dismissed the confirmation prompt.
    Cancelled,
    /// The storage call failed; the failure was absorbed, not raised.
    Failed { key: String, reason: String },
}

impl UploadOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, UploadOutcome::Stored { .. })
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            UploadOutcome::Stored { location, .. } => Some(location),
            _ => None,
        }
    }

    /// Why nothing was stored, if nothing was.
    pub fn reason(&self) -> Option<&str> {
        match self {
            UploadOutcome::Stored { .. } => None,
            UploadOutcome::Cancelled => Some("UserCancelled"),
            UploadOutcome::Failed { reason, .. } => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let stored = UploadOutcome::Stored {
            key: "valid-pdf-1.pdf".into(),
            location: "https://bucket/valid-pdf-1.pdf".into(),
        };
        assert!(stored.succeeded());
        assert_eq!(stored.reason(), None);
        assert_eq!(stored.location(), Some("https://bucket/valid-pdf-1.pdf"));

        assert!(!UploadOutcome::Cancelled.succeeded());
        assert_eq!(UploadOutcome::Cancelled.reason(), Some("UserCancelled"));

        let failed = UploadOutcome::Failed {
            key: "k".into(),
            reason: "Upload failed: 503".into(),
        };
        assert!(!failed.succeeded());
        assert_eq!(failed.reason(), Some("Upload failed: 503"));
        assert_eq!(failed.location(), None);
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(UploadOutcome::Cancelled).unwrap();
        assert_eq!(json["status"], "cancelled");
    }
}
