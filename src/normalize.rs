//! Conversion of ground-truth documents into canonical labeled boxes.

use crate::error::{LayoutEvalError, Result};
use crate::types::{normalize_label, GroundTruthDocument, LabeledBox};
use std::collections::HashMap;

/// Convert a ground-truth document into corner-format [`LabeledBox`]es.
///
/// Each annotation's `[x, y, w, h]` becomes `[x, y, x + w, y + h]` and its
/// category id is resolved to the lowercased category name. Output order
/// follows the annotation order. When the category table repeats an id, the
/// last entry wins.
///
/// Width and height are not sign-checked; a negative size produces an
/// inverted box, which overlaps nothing during matching.
///
/// # Errors
///
/// Returns [`LayoutEvalError::InvalidData`] if an annotation references a
/// category id missing from the table or has a bbox without four values.
///
/// # Example
///
/// ```
/// use layout_eval::loader::load_ground_truth_from_str;
/// use layout_eval::normalize::normalize_ground_truth;
///
/// let document = load_ground_truth_from_str(r#"{
///     "categories": [{"id": 7, "name": "Figure"}],
///     "annotations": [{"category_id": 7, "bbox": [10, 20, 30, 40]}]
/// }"#).unwrap();
///
/// let boxes = normalize_ground_truth(&document).unwrap();
/// assert_eq!(boxes[0].label, "figure");
/// assert_eq!(boxes[0].bbox.to_array(), [10.0, 20.0, 40.0, 60.0]);
/// ```
pub fn normalize_ground_truth(document: &GroundTruthDocument) -> Result<Vec<LabeledBox>> {
    let category_names: HashMap<i64, String> = document
        .categories
        .iter()
        .map(|category| (category.id, normalize_label(&category.name)))
        .collect();

    document
        .annotations
        .iter()
        .enumerate()
        .map(|(idx, annotation)| {
            let label = category_names.get(&annotation.category_id).ok_or_else(|| {
                LayoutEvalError::InvalidData(format!(
                    "Annotation {} references unknown category id {}",
                    idx, annotation.category_id
                ))
            })?;
            Ok(LabeledBox {
                bbox: annotation.to_bbox()?,
                label: label.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Annotation, Category};

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            supercategory: None,
        }
    }

    fn annotation(category_id: i64, bbox: Vec<f64>) -> Annotation {
        Annotation {
            id: None,
            image_id: None,
            category_id,
            bbox,
        }
    }

    #[test]
    fn test_normalize_basic() {
        let document = GroundTruthDocument {
            categories: vec![category(1, "Text"), category(2, "TITLE")],
            annotations: vec![
                annotation(2, vec![0.0, 0.0, 100.0, 20.0]),
                annotation(1, vec![0.0, 30.0, 100.0, 200.0]),
            ],
        };

        let boxes = normalize_ground_truth(&document).unwrap();
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].label, "title");
        assert_eq!(boxes[0].bbox.to_array(), [0.0, 0.0, 100.0, 20.0]);
        assert_eq!(boxes[1].label, "text");
        assert_eq!(boxes[1].bbox.to_array(), [0.0, 30.0, 100.0, 230.0]);
    }

    #[test]
    fn test_unknown_category() {
        let document = GroundTruthDocument {
            categories: vec![category(1, "text")],
            annotations: vec![annotation(9, vec![0.0, 0.0, 1.0, 1.0])],
        };

        match normalize_ground_truth(&document) {
            Err(LayoutEvalError::InvalidData(msg)) => assert!(msg.contains("9")),
            other => panic!("Expected InvalidData error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_category_last_wins() {
        let document = GroundTruthDocument {
            categories: vec![category(1, "text"), category(1, "list")],
            annotations: vec![annotation(1, vec![0.0, 0.0, 1.0, 1.0])],
        };

        let boxes = normalize_ground_truth(&document).unwrap();
        assert_eq!(boxes[0].label, "list");
    }

    #[test]
    fn test_negative_size_passes_through() {
        let document = GroundTruthDocument {
            categories: vec![category(1, "text")],
            annotations: vec![annotation(1, vec![10.0, 10.0, -5.0, 5.0])],
        };

        let boxes = normalize_ground_truth(&document).unwrap();
        assert_eq!(boxes[0].bbox.to_array(), [10.0, 10.0, 5.0, 15.0]);
        assert!(!boxes[0].bbox.is_well_formed());
    }

    #[test]
    fn test_empty_document() {
        let document = GroundTruthDocument {
            categories: vec![],
            annotations: vec![],
        };
        assert!(normalize_ground_truth(&document).unwrap().is_empty());
    }
}
