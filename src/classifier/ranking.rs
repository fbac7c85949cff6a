use crate::classifier::ClassifyError;
use crate::models::breed::{Breed, ClassificationResult};
use crate::models::labels::LabelTables;

/// Convert a confidence vector into an ordered classification result.
///
/// Fails fast with `LabelMismatch` before constructing any breed when the
/// vector length disagrees with the label tables. The sort is stable and
/// descending by confidence, so ties keep their label-table order; the
/// result is never re-sorted afterwards.
pub fn rank(
    confidences: &[f32],
    labels: &LabelTables,
) -> Result<ClassificationResult, ClassifyError> {
    if confidences.len() != labels.len() {
        return Err(ClassifyError::LabelMismatch {
            labels: labels.len(),
            confidences: confidences.len(),
        });
    }

    let mut breeds = Vec::with_capacity(confidences.len());
    for (i, confidence) in confidences.iter().enumerate() {
        // The length check above guarantees the index is in range.
        if let Some((display, api)) = labels.get(i) {
            breeds.push(Breed::new(display, api, f64::from(*confidence)));
        }
    }

    breeds.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    Ok(ClassificationResult::new(breeds))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(display: &str, api: &str) -> LabelTables {
        LabelTables::from_csv_lines(display, api).unwrap()
    }

    #[test]
    fn test_ranked_descending_with_split_names() {
        let labels = tables("Beagle,Hound Afghan", "beagle,hound afghan");
        let result = rank(&[0.3, 0.7], &labels).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.breeds[0].label, "Hound");
        assert_eq!(result.breeds[0].sub_label, "Afghan");
        assert!((result.breeds[0].confidence - 0.7).abs() < 1e-9);
        assert_eq!(result.breeds[1].label, "Beagle");
        assert_eq!(result.breeds[1].sub_label, "");
        assert!((result.breeds[1].confidence - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_output_length_matches_and_is_sorted() {
        let labels = tables("A,B,C,D,E", "a,b,c,d,e");
        let result = rank(&[0.1, 0.4, 0.05, 0.25, 0.2], &labels).unwrap();
        assert_eq!(result.len(), 5);
        for pair in result.breeds.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn test_ties_keep_table_order() {
        let labels = tables("A,B,C", "a,b,c");
        let result = rank(&[0.2, 0.2, 0.6], &labels).unwrap();
        assert_eq!(result.breeds[0].label, "C");
        assert_eq!(result.breeds[1].label, "A");
        assert_eq!(result.breeds[2].label, "B");
    }

    #[test]
    fn test_length_mismatch_builds_no_breeds() {
        let labels = tables("A,B,C,D,E", "a,b,c,d,e");
        let err = rank(&[0.1, 0.2, 0.3, 0.4], &labels).unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::LabelMismatch {
                labels: 5,
                confidences: 4
            }
        ));
    }

    #[test]
    fn test_empty_tables_give_empty_result() {
        let labels = tables("", "");
        let result = rank(&[], &labels).unwrap();
        assert!(result.is_empty());
    }
}
