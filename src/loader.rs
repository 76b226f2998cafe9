//! JSON loading utilities for ground-truth documents and detector output.

use crate::detection::{classify_boxes, normalize_detections, RawDetection};
use crate::error::{LayoutEvalError, Result};
use crate::types::{GroundTruthDocument, LabeledBox};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a ground-truth document from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if an
/// annotation's bbox does not have four values.
///
/// # Example
///
/// ```no_run
/// use layout_eval::loader::load_ground_truth_from_file;
///
/// let document = load_ground_truth_from_file("page_01.json").unwrap();
/// println!("Loaded {} annotations", document.annotations.len());
/// ```
pub fn load_ground_truth_from_file<P: AsRef<Path>>(path: P) -> Result<GroundTruthDocument> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let document: GroundTruthDocument = serde_json::from_reader(reader)?;

    validate_document(&document)?;

    Ok(document)
}

/// Load a ground-truth document from a JSON string.
///
/// # Example
///
/// ```
/// use layout_eval::loader::load_ground_truth_from_str;
///
/// let json = r#"{
///     "categories": [{"id": 1, "name": "Text"}],
///     "annotations": [{"category_id": 1, "bbox": [0, 0, 10, 10]}]
/// }"#;
/// let document = load_ground_truth_from_str(json).unwrap();
/// assert_eq!(document.annotations.len(), 1);
/// ```
pub fn load_ground_truth_from_str(json_str: &str) -> Result<GroundTruthDocument> {
    let document: GroundTruthDocument = serde_json::from_str(json_str)?;
    validate_document(&document)?;
    Ok(document)
}

/// Load a ground-truth document from raw uploaded bytes.
pub fn load_ground_truth_from_slice(bytes: &[u8]) -> Result<GroundTruthDocument> {
    if bytes.is_empty() {
        return Err(LayoutEvalError::InvalidData(
            "Ground truth document is empty".to_string(),
        ));
    }
    let document: GroundTruthDocument = serde_json::from_slice(bytes)?;
    validate_document(&document)?;
    Ok(document)
}

/// Load detector output (`[{"bbox": [x1, y1, x2, y2], "label": ...}]`) from a
/// JSON string. Labels are lowercased; `"type"` is accepted for `"label"`.
pub fn load_predictions_from_str(json_str: &str) -> Result<Vec<LabeledBox>> {
    let raw: Vec<RawDetection> = serde_json::from_str(json_str)?;
    Ok(normalize_detections(&raw))
}

/// Load detector output from a JSON file.
pub fn load_predictions_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledBox>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let raw: Vec<RawDetection> = serde_json::from_reader(reader)?;
    log::debug!("loaded {} predictions", raw.len());
    Ok(normalize_detections(&raw))
}

/// Load text-line polygons (`[[[x, y], ...], ...]`) from a JSON string and
/// label them `title` or `text` by height.
///
/// See [`classify_boxes`] for the labeling rule.
pub fn load_text_lines_from_str(json_str: &str, title_min_height: f64) -> Result<Vec<LabeledBox>> {
    let polygons: Vec<Vec<[f64; 2]>> = serde_json::from_str(json_str)?;
    Ok(classify_boxes(&polygons, title_min_height))
}

/// Load text-line polygons from a JSON file and label them by height.
pub fn load_text_lines_from_file<P: AsRef<Path>>(
    path: P,
    title_min_height: f64,
) -> Result<Vec<LabeledBox>> {
    let file = File::open(path)?;
    let polygons: Vec<Vec<[f64; 2]>> = serde_json::from_reader(BufReader::new(file))?;
    log::debug!("loaded {} text lines", polygons.len());
    Ok(classify_boxes(&polygons, title_min_height))
}

/// Validate the structural parts serde cannot check.
///
/// Negative widths and heights are accepted and only logged.
fn validate_document(document: &GroundTruthDocument) -> Result<()> {
    for (idx, annotation) in document.annotations.iter().enumerate() {
        if annotation.bbox.len() != 4 {
            return Err(LayoutEvalError::InvalidData(format!(
                "Annotation {} has invalid bbox length: {}",
                annotation.id.unwrap_or(idx as u64),
                annotation.bbox.len()
            )));
        }

        if annotation.bbox[2] < 0.0 || annotation.bbox[3] < 0.0 {
            log::warn!(
                "annotation {} has negative dimensions {:?}; keeping inverted box",
                idx,
                &annotation.bbox[2..]
            );
        }
    }

    log::debug!(
        "loaded ground truth: {} categories, {} annotations",
        document.categories.len(),
        document.annotations.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_string() {
        let json = r#"{
            "annotations": [
                {
                    "id": 1,
                    "image_id": 1,
                    "category_id": 1,
                    "bbox": [10.0, 20.0, 30.0, 40.0]
                }
            ],
            "categories": [
                {
                    "id": 1,
                    "name": "Title"
                }
            ]
        }"#;

        let document = load_ground_truth_from_str(json).unwrap();
        assert_eq!(document.annotations.len(), 1);
        assert_eq!(document.categories.len(), 1);
    }

    #[test]
    fn test_invalid_bbox() {
        let json = r#"{
            "annotations": [{"category_id": 1, "bbox": [10.0, 20.0, 30.0]}],
            "categories": [{"id": 1, "name": "text"}]
        }"#;

        let result = load_ground_truth_from_str(json);
        assert!(matches!(result, Err(LayoutEvalError::InvalidData(_))));
    }

    #[test]
    fn test_negative_size_is_accepted() {
        let json = r#"{
            "annotations": [{"category_id": 1, "bbox": [10.0, 20.0, -30.0, 40.0]}],
            "categories": [{"id": 1, "name": "text"}]
        }"#;

        assert!(load_ground_truth_from_str(json).is_ok());
    }

    #[test]
    fn test_missing_categories_field() {
        let json = r#"{"annotations": []}"#;
        assert!(matches!(
            load_ground_truth_from_str(json),
            Err(LayoutEvalError::JsonError(_))
        ));
    }

    #[test]
    fn test_empty_slice() {
        assert!(matches!(
            load_ground_truth_from_slice(b""),
            Err(LayoutEvalError::InvalidData(_))
        ));
    }

    #[test]
    fn test_load_predictions() {
        let json = r#"[
            {"bbox": [0, 0, 10, 10], "label": "Text"},
            {"bbox": [0, 20, 10, 30], "type": "FIGURE"}
        ]"#;
        let predictions = load_predictions_from_str(json).unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].label, "text");
        assert_eq!(predictions[1].label, "figure");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"categories": [{{"id": 3, "name": "table"}}], "annotations": [{{"category_id": 3, "bbox": [1, 2, 3, 4]}}]}}"#
        )
        .unwrap();

        let document = load_ground_truth_from_file(file.path()).unwrap();
        assert_eq!(document.categories[0].id, 3);
    }

    #[test]
    fn test_load_text_lines_uses_title_height() {
        let json = r#"[
            [[0, 0], [300, 0], [300, 40], [0, 40]],
            [[0, 50], [300, 50], [300, 70], [0, 70]],
            []
        ]"#;

        let default_height = load_text_lines_from_str(json, 30.0).unwrap();
        let labels: Vec<&str> = default_height.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["title", "text"]);
        assert_eq!(default_height[1].bbox.to_array(), [0.0, 50.0, 300.0, 70.0]);

        let low = load_text_lines_from_str(json, 10.0).unwrap();
        assert!(low.iter().all(|b| b.label == "title"));
    }

    #[test]
    fn test_load_text_lines_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[[[5, 5], [50, 5], [50, 45], [5, 45]]]").unwrap();

        let lines = load_text_lines_from_file(file.path(), 50.0).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].label, "text");
    }
}
