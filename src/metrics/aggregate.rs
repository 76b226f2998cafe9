//! Reduction of match counts to the per-evaluation metrics snapshot.

use crate::matching::MatchResult;
use crate::metrics::f1_score::calculate_f1_score;
use crate::metrics::precision_recall::{calculate_precision, calculate_recall};
use serde::{Deserialize, Serialize};

/// Number of decimal places kept in [`MetricsReport`].
pub const REPORT_DECIMALS: i32 = 3;

/// Immutable metrics snapshot for one evaluation, at full precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    precision: f64,
    recall: f64,
    f1: f64,
    iou_mean: f64,
    tp_count: usize,
    fp_count: usize,
    fn_count: usize,
}

impl Metrics {
    /// Aggregate the outcome of a matching pass.
    pub fn from_matches(matches: &MatchResult) -> Self {
        let counts = matches.counts();
        aggregate(
            counts.true_positives,
            counts.false_positives,
            counts.false_negatives,
            counts.iou_sum,
        )
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    pub fn recall(&self) -> f64 {
        self.recall
    }

    pub fn f1(&self) -> f64 {
        self.f1
    }

    /// Mean IoU over true positives.
    pub fn iou_mean(&self) -> f64 {
        self.iou_mean
    }

    pub fn tp_count(&self) -> usize {
        self.tp_count
    }

    pub fn fp_count(&self) -> usize {
        self.fp_count
    }

    pub fn fn_count(&self) -> usize {
        self.fn_count
    }

    /// Presentation form with floats rounded to [`REPORT_DECIMALS`] places.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            precision: round_to(self.precision, REPORT_DECIMALS),
            recall: round_to(self.recall, REPORT_DECIMALS),
            f1_score: round_to(self.f1, REPORT_DECIMALS),
            iou_mean: round_to(self.iou_mean, REPORT_DECIMALS),
            tp: self.tp_count,
            fp: self.fp_count,
            fn_: self.fn_count,
        }
    }
}

/// Flat, serializable metrics mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub iou_mean: f64,
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
}

/// Reduce TP/FP/FN counts and the summed TP IoU to a [`Metrics`] snapshot.
///
/// Every ratio falls back to 0.0 when its denominator is zero, so the
/// function is total.
///
/// # Example
///
/// ```
/// use layout_eval::metrics::aggregate::aggregate;
///
/// let metrics = aggregate(1, 0, 0, 1.0);
/// assert_eq!(metrics.precision(), 1.0);
/// assert_eq!(metrics.iou_mean(), 1.0);
/// ```
pub fn aggregate(tp: usize, fp: usize, fn_: usize, iou_sum_over_tp: f64) -> Metrics {
    let precision = calculate_precision(tp, fp);
    let recall = calculate_recall(tp, fn_);
    let f1 = calculate_f1_score(precision, recall);

    #[allow(clippy::cast_precision_loss)]
    let iou_mean = if tp > 0 {
        iou_sum_over_tp / tp as f64
    } else {
        0.0
    };

    Metrics {
        precision,
        recall,
        f1,
        iou_mean,
        tp_count: tp,
        fp_count: fp,
        fn_count: fn_,
    }
}

/// Round to `decimals` places by the exact stored value, exact halves to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if (scaled - scaled.trunc()).abs() != 0.5 {
        return scaled.round() / factor;
    }

    // The product landed on a half; its rounding error says which side the
    // exact value is on, and exact halves go to even.
    let error = value.mul_add(factor, -scaled);
    let rounded = if error > 0.0 {
        scaled.ceil()
    } else if error < 0.0 {
        scaled.floor()
    } else {
        scaled.round_ties_even()
    };
    rounded / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_metrics() {
        let metrics = aggregate(3, 0, 0, 3.0);
        assert_eq!(metrics.precision(), 1.0);
        assert_eq!(metrics.recall(), 1.0);
        assert_eq!(metrics.f1(), 1.0);
        assert_eq!(metrics.iou_mean(), 1.0);
    }

    #[test]
    fn test_all_zero_counts() {
        let metrics = aggregate(0, 0, 0, 0.0);
        assert_eq!(metrics.precision(), 0.0);
        assert_eq!(metrics.recall(), 0.0);
        assert_eq!(metrics.f1(), 0.0);
        assert_eq!(metrics.iou_mean(), 0.0);
    }

    #[test]
    fn test_mixed_counts() {
        let metrics = aggregate(2, 1, 2, 1.5);
        assert!((metrics.precision() - 2.0 / 3.0).abs() < 1e-12);
        assert!((metrics.recall() - 0.5).abs() < 1e-12);
        assert!((metrics.f1() - 4.0 / 7.0).abs() < 1e-12);
        assert!((metrics.iou_mean() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_report_rounds_but_snapshot_does_not() {
        let metrics = aggregate(2, 1, 0, 1.6);
        assert!((metrics.precision() - 2.0 / 3.0).abs() < 1e-12);

        let report = metrics.report();
        assert_eq!(report.precision, 0.667);
        assert_eq!(report.recall, 1.0);
        assert_eq!(report.f1_score, 0.8);
        assert_eq!(report.iou_mean, 0.8);
        assert_eq!((report.tp, report.fp, report.fn_), (2, 1, 0));
    }

    #[test]
    fn test_report_field_names() {
        let json = serde_json::to_value(aggregate(1, 1, 1, 0.9).report()).unwrap();
        let mut keys: Vec<&str> = json
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["f1_score", "fn", "fp", "iou_mean", "precision", "recall", "tp"]
        );
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(0.9996, 3), 1.0);
        assert_eq!(round_to(0.0, 3), 0.0);
    }

    #[test]
    fn test_round_to_exact_halves_go_to_even() {
        assert_eq!(round_to(0.0625, 3), 0.062);
        assert_eq!(round_to(0.3125, 3), 0.312);
        assert_eq!(round_to(0.1875, 3), 0.188);
        // 0.0005 is stored slightly above the half
        assert_eq!(round_to(0.0005, 3), 0.001);
    }

    #[test]
    fn test_report_rounds_sixteenths_to_even() {
        assert_eq!(aggregate(1, 15, 0, 1.0).report().precision, 0.062);
        assert_eq!(aggregate(5, 11, 0, 5.0).report().precision, 0.312);
        assert_eq!(aggregate(1, 15, 0, 1.0).precision(), 0.0625);
    }
}
