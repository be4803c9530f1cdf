//! Moderation policy: pure, synchronous and deterministic.

use mediagate_core::constants::DISALLOWED_CATEGORIES;
use mediagate_core::{Detection, PolicyDecision};

pub const BLOCKED_IMAGE_REASON: &str = "This image contains a human or animal.";
pub const INVALID_DOCUMENT_REASON: &str = "The PDF file is not valid.";

const PDF_HEADER: &[u8] = b"%PDF-";
const PDF_EOF_MARKER: &[u8] = b"%%EOF";
/// Readers tolerate junk after the EOF marker; look for it this far back.
const PDF_TRAILER_WINDOW: usize = 1024;

/// Exact, case-sensitive membership in the disallow-set.
pub fn is_disallowed(category: &str) -> bool {
    DISALLOWED_CATEGORIES.contains(&category)
}

/// Block if any detection falls in the disallow-set, allow otherwise.
pub fn decide(detections: &[Detection]) -> PolicyDecision {
    let mut matched: Vec<String> = detections
        .iter()
        .filter(|d| is_disallowed(&d.category))
        .map(|d| d.category.clone())
        .collect();
    matched.sort();
    matched.dedup();

    if matched.is_empty() {
        PolicyDecision::allow("No disallowed categories detected")
    } else {
        PolicyDecision::block(BLOCKED_IMAGE_REASON, matched)
    }
}

/// Structural PDF check: `%PDF-<digit>` header and an `%%EOF` marker near the end.
pub fn validate_document(bytes: &[u8]) -> bool {
    let has_header = bytes.starts_with(PDF_HEADER)
        && bytes
            .get(PDF_HEADER.len())
            .is_some_and(|b| b.is_ascii_digit());
    if !has_header {
        return false;
    }

    let tail_start = bytes.len().saturating_sub(PDF_TRAILER_WINDOW);
    bytes[tail_start..]
        .windows(PDF_EOF_MARKER.len())
        .any(|w| w == PDF_EOF_MARKER)
}

pub fn decide_document(valid: bool) -> PolicyDecision {
    if valid {
        PolicyDecision::allow("Valid PDF document")
    } else {
        PolicyDecision::block(INVALID_DOCUMENT_REASON, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediagate_core::Verdict;

    #[test]
    fn disallowed_category_blocks() {
        let decision = decide(&[Detection::new("car", 0.8), Detection::new("dog", 0.9)]);
        assert_eq!(decision.verdict, Verdict::Block);
        assert_eq!(decision.matched, vec!["dog".to_string()]);
        assert_eq!(decision.reason, BLOCKED_IMAGE_REASON);
    }

    #[test]
    fn empty_set_allows() {
        assert_eq!(decide(&[]).verdict, Verdict::Allow);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(decide(&[Detection::new("Dog", 0.9)]).verdict, Verdict::Allow);
        assert_eq!(decide(&[Detection::new("dogs", 0.9)]).verdict, Verdict::Allow);
    }

    #[test]
    fn matches_are_deduplicated() {
        let decision = decide(&[
            Detection::new("person", 0.9),
            Detection::new("cat", 0.3),
            Detection::new("person", 0.6),
        ]);
        assert_eq!(decision.matched, vec!["cat".to_string(), "person".to_string()]);
    }

    #[test]
    fn pdf_structure() {
        assert!(validate_document(b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n%%EOF\n"));
        assert!(!validate_document(b"%PDF-1.7\nno trailer"));
        assert!(!validate_document(b"%PDF-x\n%%EOF"));
        assert!(!validate_document(b"GIF89a%%EOF"));
        assert!(!validate_document(b""));

        let mut long = b"%PDF-1.4\n%%EOF".to_vec();
        long.extend(std::iter::repeat(b' ').take(4096));
        assert!(!validate_document(&long));
    }

    #[test]
    fn document_decision() {
        assert!(decide_document(true).is_allowed());
        let blocked = decide_document(false);
        assert_eq!(blocked.verdict, Verdict::Block);
        assert_eq!(blocked.reason, INVALID_DOCUMENT_REASON);
    }
}
