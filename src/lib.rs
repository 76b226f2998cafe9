//! # layout-eval
//!
//! Evaluation of document-layout detections against ground-truth annotations,
//! with overlay rendering of the comparison.
//!
//! The core is a greedy matcher: each predicted box, in order, is paired with
//! the best-overlapping unmatched ground-truth box of the same category, and
//! the resulting true positives, false positives and false negatives are
//! reduced to:
//! - **Precision** and **Recall**
//! - **F1 Score**
//! - **Mean IoU** over true positives
//!
//! ## Features
//!
//! - Load ground-truth documents (category table plus `[x, y, w, h]` boxes)
//! - Calculate IoU (Intersection over Union) between bounding boxes
//! - Match predictions to ground truth under an IoU threshold
//! - Draw TP/FP/FN or per-category outlines onto a copy of the page image
//! - Plug in any layout model through the [`detection::LayoutDetector`] trait
//!
//! ## Quick Start
//!
//! ```rust
//! use layout_eval::loader::load_ground_truth_from_str;
//! use layout_eval::normalize::normalize_ground_truth;
//! use layout_eval::evaluator::evaluate;
//! use layout_eval::{BoundingBox, LabeledBox};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let document = load_ground_truth_from_str(r#"{
//!     "categories": [{"id": 1, "name": "Text"}],
//!     "annotations": [{"category_id": 1, "bbox": [0, 0, 10, 10]}]
//! }"#)?;
//! let ground_truth = normalize_ground_truth(&document)?;
//!
//! let predictions = vec![LabeledBox::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), "text")];
//! let evaluation = evaluate(&predictions, &ground_truth, 0.5);
//!
//! let report = evaluation.metrics.report();
//! assert_eq!(report.precision, 1.0);
//! assert_eq!(report.tp, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Ground-truth format
//!
//! ```json
//! {
//!   "categories": [{"id": 1, "name": "Title"}, {"id": 2, "name": "Text"}],
//!   "annotations": [
//!     {"category_id": 1, "bbox": [x, y, width, height]}
//!   ]
//! }
//! ```

pub mod config;
pub mod detection;
pub mod error;
pub mod evaluator;
pub mod image_io;
pub mod loader;
pub mod matching;
pub mod metrics;
pub mod normalize;
pub mod render;
pub mod types;

// Re-export commonly used types and functions
pub use config::EvaluationOptions;
pub use detection::{LayoutDetector, PrecomputedDetector};
pub use error::{ErrorKind, LayoutEvalError, Result};
pub use evaluator::{detect_layout, evaluate, evaluate_layout, Evaluation, LayoutEvaluation};
pub use loader::{load_ground_truth_from_file, load_ground_truth_from_str, load_predictions_from_file};
pub use matching::{match_detections, MatchOutcome, MatchResult, MatchStatus, DEFAULT_IOU_THRESHOLD};
pub use metrics::{Metrics, MetricsReport};
pub use normalize::normalize_ground_truth;
pub use types::{BoundingBox, GroundTruthDocument, LabeledBox};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_compiles() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(bbox.is_well_formed());
    }
}
