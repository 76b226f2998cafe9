//! Matching predicted layout boxes against ground truth.

use crate::metrics::iou::calculate_iou;
use crate::types::{BoundingBox, LabeledBox};
use std::collections::HashSet;
use std::fmt;

/// IoU a prediction must reach to count as a true positive.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Field-less classification of a [`MatchOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    TruePositive,
    FalsePositive,
    FalseNegative,
}

impl MatchStatus {
    /// Short code (`TP`, `FP`, `FN`), also used as a colour key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TruePositive => "TP",
            Self::FalsePositive => "FP",
            Self::FalseNegative => "FN",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a single box after matching.
///
/// True and false positives carry the prediction box; false negatives carry
/// the ground-truth box left unmatched.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    TruePositive {
        prediction: LabeledBox,
        ground_truth_index: usize,
        iou: f64,
    },
    FalsePositive {
        prediction: LabeledBox,
        /// Best IoU among same-label candidates, 0.0 if there were none.
        best_iou: f64,
    },
    FalseNegative {
        ground_truth: LabeledBox,
        ground_truth_index: usize,
    },
}

impl MatchOutcome {
    pub fn status(&self) -> MatchStatus {
        match self {
            Self::TruePositive { .. } => MatchStatus::TruePositive,
            Self::FalsePositive { .. } => MatchStatus::FalsePositive,
            Self::FalseNegative { .. } => MatchStatus::FalseNegative,
        }
    }

    /// The box this outcome is attached to.
    pub fn labeled_box(&self) -> &LabeledBox {
        match self {
            Self::TruePositive { prediction, .. } | Self::FalsePositive { prediction, .. } => {
                prediction
            }
            Self::FalseNegative { ground_truth, .. } => ground_truth,
        }
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.labeled_box().bbox
    }

    /// Achieved IoU, only for true positives.
    pub fn iou(&self) -> Option<f64> {
        match self {
            Self::TruePositive { iou, .. } => Some(*iou),
            _ => None,
        }
    }

    pub fn is_true_positive(&self) -> bool {
        matches!(self, Self::TruePositive { .. })
    }
}

/// Confusion counts and the summed IoU of true positives.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub iou_sum: f64,
}

/// Result of a matching pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    /// One outcome per prediction in input order, followed by one false
    /// negative per unmatched ground-truth box in ground-truth order.
    pub outcomes: Vec<MatchOutcome>,
    /// Indices of ground-truth boxes no prediction consumed, ascending.
    pub unmatched_ground_truth: Vec<usize>,
}

impl MatchResult {
    pub fn counts(&self) -> MatchCounts {
        self.outcomes
            .iter()
            .fold(MatchCounts::default(), |mut counts, outcome| {
                match outcome {
                    MatchOutcome::TruePositive { iou, .. } => {
                        counts.true_positives += 1;
                        counts.iou_sum += iou;
                    }
                    MatchOutcome::FalsePositive { .. } => counts.false_positives += 1,
                    MatchOutcome::FalseNegative { .. } => counts.false_negatives += 1,
                }
                counts
            })
    }

    /// Boxes paired with their status code, in outcome order.
    pub fn status_boxes(&self) -> Vec<(BoundingBox, MatchStatus)> {
        self.outcomes
            .iter()
            .map(|outcome| (*outcome.bbox(), outcome.status()))
            .collect()
    }
}

/// Match predictions to ground-truth boxes.
///
/// Greedy and order-dependent: each prediction, in input order, takes the
/// unconsumed ground-truth box of the same label (case-insensitive) with the
/// highest IoU. Ties keep the lowest ground-truth index. The pair is a true
/// positive when that IoU is at least `iou_threshold`; a prediction with no
/// overlapping candidate is always a false positive.
///
/// This is not an optimal assignment. An early prediction can consume a box
/// a later prediction needed, so the number of true positives may be lower
/// than a global matching would find.
///
/// # Example
///
/// ```
/// use layout_eval::matching::{match_detections, DEFAULT_IOU_THRESHOLD};
/// use layout_eval::types::{BoundingBox, LabeledBox};
///
/// let predictions = vec![LabeledBox::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), "text")];
/// let ground_truth = vec![LabeledBox::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), "Text")];
///
/// let result = match_detections(&predictions, &ground_truth, DEFAULT_IOU_THRESHOLD);
/// assert_eq!(result.counts().true_positives, 1);
/// assert!(result.unmatched_ground_truth.is_empty());
/// ```
pub fn match_detections(
    predictions: &[LabeledBox],
    ground_truth: &[LabeledBox],
    iou_threshold: f64,
) -> MatchResult {
    // Track which ground truths have been consumed
    let mut matched_gt: HashSet<usize> = HashSet::with_capacity(ground_truth.len());
    let mut outcomes = Vec::with_capacity(predictions.len() + ground_truth.len());

    for prediction in predictions {
        let mut best_iou = 0.0;
        let mut best_gt_idx: Option<usize> = None;

        for (gt_idx, gt) in ground_truth.iter().enumerate() {
            if matched_gt.contains(&gt_idx) || !prediction.same_label(gt) {
                continue;
            }

            let iou = calculate_iou(&prediction.bbox, &gt.bbox);
            if iou > best_iou {
                best_iou = iou;
                best_gt_idx = Some(gt_idx);
            }
        }

        let outcome = match best_gt_idx {
            Some(gt_idx) if best_iou >= iou_threshold => {
                matched_gt.insert(gt_idx);
                MatchOutcome::TruePositive {
                    prediction: prediction.clone(),
                    ground_truth_index: gt_idx,
                    iou: best_iou,
                }
            }
            _ => MatchOutcome::FalsePositive {
                prediction: prediction.clone(),
                best_iou,
            },
        };
        outcomes.push(outcome);
    }

    let unmatched_ground_truth: Vec<usize> = (0..ground_truth.len())
        .filter(|idx| !matched_gt.contains(idx))
        .collect();

    outcomes.extend(
        unmatched_ground_truth
            .iter()
            .map(|&idx| MatchOutcome::FalseNegative {
                ground_truth: ground_truth[idx].clone(),
                ground_truth_index: idx,
            }),
    );

    log::debug!(
        "matched {} predictions against {} ground-truth boxes: {} unmatched",
        predictions.len(),
        ground_truth.len(),
        unmatched_ground_truth.len()
    );

    MatchResult {
        outcomes,
        unmatched_ground_truth,
    }
}
