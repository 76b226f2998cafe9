//! The seam between the evaluator and a layout detection model.
//!
//! No model ships with this crate; anything that turns an RGB page image
//! into labeled boxes can implement [`LayoutDetector`].

use crate::error::Result;
use crate::types::{BoundingBox, LabeledBox};
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// A layout detection model.
///
/// Implementations must be shareable across threads so a single loaded model
/// can serve concurrent evaluations.
pub trait LayoutDetector: Send + Sync {
    /// Detect layout regions in `image`, in the model's output order.
    fn detect(&self, image: &RgbImage) -> Result<Vec<LabeledBox>>;
}

/// Detector that returns a fixed list of boxes, such as output recorded from
/// a model run.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedDetector {
    boxes: Vec<LabeledBox>,
}

impl PrecomputedDetector {
    pub fn new(boxes: Vec<LabeledBox>) -> Self {
        Self { boxes }
    }
}

impl LayoutDetector for PrecomputedDetector {
    fn detect(&self, _image: &RgbImage) -> Result<Vec<LabeledBox>> {
        Ok(self.boxes.clone())
    }
}

/// One region as emitted by a detector, before label normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    /// Box in [x1, y1, x2, y2] format
    pub bbox: [f64; 4],
    #[serde(alias = "type")]
    pub label: String,
}

/// Lowercase labels and convert raw detector regions to [`LabeledBox`]es.
pub fn normalize_detections(raw: &[RawDetection]) -> Vec<LabeledBox> {
    raw.iter()
        .map(|detection| LabeledBox::new(BoundingBox::from(detection.bbox), &detection.label))
        .collect()
}

/// Label text-line polygons as `title` or `text` by height.
///
/// Each polygon is reduced to its axis-aligned bounding box. Boxes taller
/// than `title_min_height` become `title`, the rest `text`. Empty polygons
/// are skipped.
///
/// # Example
///
/// ```
/// use layout_eval::detection::classify_boxes;
///
/// let polygons = vec![
///     vec![[0.0, 0.0], [200.0, 0.0], [200.0, 40.0], [0.0, 40.0]],
///     vec![[0.0, 50.0], [200.0, 50.0], [200.0, 62.0], [0.0, 62.0]],
/// ];
/// let boxes = classify_boxes(&polygons, 30.0);
/// assert_eq!(boxes[0].label, "title");
/// assert_eq!(boxes[1].label, "text");
/// ```
pub fn classify_boxes(polygons: &[Vec<[f64; 2]>], title_min_height: f64) -> Vec<LabeledBox> {
    polygons
        .iter()
        .filter_map(|points| polygon_bounds(points))
        .map(|bbox| {
            let label = if bbox.height() > title_min_height {
                "title"
            } else {
                "text"
            };
            LabeledBox::new(bbox, label)
        })
        .collect()
}

fn polygon_bounds(points: &[[f64; 2]]) -> Option<BoundingBox> {
    let (first, rest) = points.split_first()?;
    let init = BoundingBox::new(first[0], first[1], first[0], first[1]);
    Some(rest.iter().fold(init, |acc, p| {
        BoundingBox::new(
            acc.x1.min(p[0]),
            acc.y1.min(p[1]),
            acc.x2.max(p[0]),
            acc.y2.max(p[1]),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precomputed_detector() {
        let boxes = vec![LabeledBox::new(BoundingBox::new(0.0, 0.0, 5.0, 5.0), "list")];
        let detector = PrecomputedDetector::new(boxes.clone());
        let image = RgbImage::new(8, 8);
        assert_eq!(detector.detect(&image).unwrap(), boxes);
    }

    #[test]
    fn test_normalize_detections() {
        let raw: Vec<RawDetection> = serde_json::from_str(
            r#"[{"bbox": [1, 2, 3, 4], "type": "Table"}, {"bbox": [5, 6, 7, 8], "label": "text"}]"#,
        )
        .unwrap();

        let boxes = normalize_detections(&raw);
        assert_eq!(boxes[0].label, "table");
        assert_eq!(boxes[0].bbox.to_array(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(boxes[1].label, "text");
    }

    #[test]
    fn test_classify_rotated_polygon() {
        let polygons = vec![vec![[10.0, 5.0], [50.0, 0.0], [55.0, 45.0], [12.0, 50.0]]];
        let boxes = classify_boxes(&polygons, 30.0);
        assert_eq!(boxes[0].bbox.to_array(), [10.0, 0.0, 55.0, 50.0]);
        assert_eq!(boxes[0].label, "title");
    }

    #[test]
    fn test_classify_height_boundary() {
        // Exactly at the limit stays text
        let polygons = vec![vec![[0.0, 0.0], [10.0, 30.0]]];
        assert_eq!(classify_boxes(&polygons, 30.0)[0].label, "text");
    }

    #[test]
    fn test_classify_skips_empty_polygons() {
        let polygons = vec![vec![], vec![[1.0, 1.0]]];
        let boxes = classify_boxes(&polygons, 30.0);
        assert_eq!(boxes.len(), 1);
        assert!(boxes[0].bbox.is_degenerate());
    }
}
