use std::collections::BTreeMap;

use mediagate_core::Detection;

use super::RawDetection;

/// Turn raw collaborator output into a normalized detection set.
///
/// Labels are trimmed and lowercased; blank labels and non-finite scores are
/// dropped; scores are clamped to `[0, 1]`; repeated labels collapse to their
/// highest score. Output is ordered by descending confidence, then label.
pub fn normalize(raw: Vec<RawDetection>) -> Vec<Detection> {
    let mut best: BTreeMap<String, f32> = BTreeMap::new();

    for detection in raw {
        let label = detection.class.trim().to_lowercase();
        if label.is_empty() || !detection.score.is_finite() {
            continue;
        }
        let score = detection.score.clamp(0.0, 1.0);
        best.entry(label)
            .and_modify(|s| *s = s.max(score))
            .or_insert(score);
    }

    let mut detections: Vec<Detection> = best
        .into_iter()
        .map(|(category, confidence)| Detection::new(category, confidence))
        .collect();
    detections.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.category.cmp(&b.category))
    });
    detections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_dedupes_and_orders() {
        let out = normalize(vec![
            RawDetection::new(" Person ", 0.55),
            RawDetection::new("car", 0.8),
            RawDetection::new("person", 0.7),
            RawDetection::new("", 0.99),
            RawDetection::new("kite", f32::NAN),
            RawDetection::new("truck", 1.7),
        ]);

        assert_eq!(
            out,
            vec![
                Detection::new("truck", 1.0),
                Detection::new("car", 0.8),
                Detection::new("person", 0.7),
            ]
        );
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(normalize(Vec::new()).is_empty());
    }
}
