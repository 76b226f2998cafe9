//! Intersection over Union (IoU) calculation.

use crate::types::BoundingBox;

/// Calculate the Intersection over Union (IoU) between two bounding boxes.
///
/// IoU is defined as the area of intersection divided by the area of union.
/// Disjoint boxes, coincident degenerate boxes and boxes with non-finite
/// coordinates all yield 0.0.
///
/// # Arguments
///
/// * `bbox1` - First bounding box
/// * `bbox2` - Second bounding box
///
/// # Returns
///
/// Returns a value between 0.0 (no overlap) and 1.0 (perfect overlap).
///
/// # Example
///
/// ```
/// use layout_eval::metrics::iou::calculate_iou;
/// use layout_eval::types::BoundingBox;
///
/// let bbox1 = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
/// let bbox2 = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
/// let iou = calculate_iou(&bbox1, &bbox2);
/// assert!(iou > 0.0 && iou < 1.0);
/// ```
pub fn calculate_iou(bbox1: &BoundingBox, bbox2: &BoundingBox) -> f64 {
    // Calculate intersection coordinates
    let x_left = bbox1.x1.max(bbox2.x1);
    let y_top = bbox1.y1.max(bbox2.y1);
    let x_right = bbox1.x2.min(bbox2.x2);
    let y_bottom = bbox1.y2.min(bbox2.y2);

    // If there's no intersection
    if x_right < x_left || y_bottom < y_top {
        return 0.0;
    }

    let intersection_area = (x_right - x_left) * (y_bottom - y_top);
    let union_area = bbox1.area() + bbox2.area() - intersection_area;

    // Avoid division by zero
    if union_area == 0.0 {
        return 0.0;
    }

    let iou = intersection_area / union_area;

    // Inverted boxes can push the ratio outside [0, 1]
    if iou.is_nan() {
        0.0
    } else {
        iou.clamp(0.0, 1.0)
    }
}

/// Calculate IoU matrix between two sets of bounding boxes.
///
/// Returns a 2D vector where `result[i][j]` is the IoU between `bboxes1[i]`
/// and `bboxes2[j]`.
///
/// # Example
///
/// ```
/// use layout_eval::metrics::iou::calculate_iou_matrix;
/// use layout_eval::types::BoundingBox;
///
/// let bboxes1 = vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)];
/// let bboxes2 = vec![BoundingBox::new(5.0, 5.0, 15.0, 15.0)];
/// let iou_matrix = calculate_iou_matrix(&bboxes1, &bboxes2);
/// assert_eq!(iou_matrix.len(), 1);
/// assert_eq!(iou_matrix[0].len(), 1);
/// ```
pub fn calculate_iou_matrix(bboxes1: &[BoundingBox], bboxes2: &[BoundingBox]) -> Vec<Vec<f64>> {
    bboxes1
        .iter()
        .map(|bbox1| {
            bboxes2
                .iter()
                .map(|bbox2| calculate_iou(bbox1, bbox2))
                .collect()
        })
        .collect()
}
