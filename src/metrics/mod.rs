//! Metric calculations for layout evaluation.

pub mod aggregate;
pub mod f1_score;
pub mod iou;
pub mod precision_recall;

pub use aggregate::{aggregate, Metrics, MetricsReport};
pub use f1_score::calculate_f1_score;
pub use iou::{calculate_iou, calculate_iou_matrix};
pub use precision_recall::{
    calculate_precision, calculate_precision_recall, calculate_recall, PrecisionRecall,
};
