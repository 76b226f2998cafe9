//! Evaluation orchestrator: ground truth and detections in, metrics and an
//! annotated page image out.

use crate::config::EvaluationOptions;
use crate::detection::LayoutDetector;
use crate::error::Result;
use crate::image_io::{decode_image, png_data_uri};
use crate::loader::load_ground_truth_from_slice;
use crate::matching::{match_detections, MatchResult};
use crate::metrics::aggregate::{Metrics, MetricsReport};
use crate::normalize::normalize_ground_truth;
use crate::render::{render_layout, render_outcomes};
use crate::types::LabeledBox;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Outcome of matching one page's predictions against its ground truth.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub matches: MatchResult,
    pub metrics: Metrics,
}

/// Match predictions to ground truth and aggregate the counts.
///
/// Pure and infallible; inputs are expected to be normalized already.
///
/// # Example
///
/// ```
/// use layout_eval::evaluator::evaluate;
/// use layout_eval::types::{BoundingBox, LabeledBox};
///
/// let predictions = vec![LabeledBox::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), "text")];
/// let ground_truth = predictions.clone();
///
/// let evaluation = evaluate(&predictions, &ground_truth, 0.5);
/// assert_eq!(evaluation.metrics.f1(), 1.0);
/// ```
pub fn evaluate(
    predictions: &[LabeledBox],
    ground_truth: &[LabeledBox],
    iou_threshold: f64,
) -> Evaluation {
    let matches = match_detections(predictions, ground_truth, iou_threshold);
    let metrics = Metrics::from_matches(&matches);

    log::info!(
        "evaluated {} predictions against {} ground-truth boxes: tp={} fp={} fn={} f1={:.3}",
        predictions.len(),
        ground_truth.len(),
        metrics.tp_count(),
        metrics.fp_count(),
        metrics.fn_count(),
        metrics.f1()
    );

    Evaluation { matches, metrics }
}

/// Evaluation of a page image together with its outcome overlay.
#[derive(Debug, Clone)]
pub struct LayoutEvaluation {
    pub evaluation: Evaluation,
    /// Page image with TP/FP/FN boxes drawn on it.
    pub overlay: RgbImage,
}

impl LayoutEvaluation {
    pub fn metrics(&self) -> &Metrics {
        &self.evaluation.metrics
    }

    /// Flat metrics plus the overlay as a PNG data URI.
    pub fn to_report(&self) -> Result<EvaluationReport> {
        Ok(EvaluationReport {
            metrics: self.evaluation.metrics.report(),
            image: png_data_uri(&self.overlay)?,
        })
    }
}

/// Serialized response of a page evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    #[serde(flatten)]
    pub metrics: MetricsReport,
    /// `data:image/png;base64,...`
    pub image: String,
}

/// Run the detector on a page image and evaluate it against ground truth.
///
/// All inputs are validated before the detector runs: the image must decode,
/// the ground-truth JSON must parse and every annotation's category must
/// resolve, and the options must be in range.
///
/// # Errors
///
/// Returns an input error for an empty or undecodable image, a data error for
/// a malformed ground-truth document, a configuration error for invalid
/// options, and whatever the detector reports.
pub fn evaluate_layout<D: LayoutDetector + ?Sized>(
    image_bytes: &[u8],
    ground_truth_json: &[u8],
    detector: &D,
    options: &EvaluationOptions,
) -> Result<LayoutEvaluation> {
    options.validate()?;
    let image = decode_image(image_bytes)?;
    let document = load_ground_truth_from_slice(ground_truth_json)?;
    let ground_truth = normalize_ground_truth(&document)?;

    let predictions = detector.detect(&image)?;
    log::debug!("detector returned {} boxes", predictions.len());

    let evaluation = evaluate(&predictions, &ground_truth, options.iou_threshold);
    let overlay = render_outcomes(&image, &evaluation.matches, options.line_width);

    Ok(LayoutEvaluation {
        evaluation,
        overlay,
    })
}

/// Run the detector on a page image and draw its boxes coloured by category.
pub fn detect_layout<D: LayoutDetector + ?Sized>(
    image_bytes: &[u8],
    detector: &D,
    options: &EvaluationOptions,
) -> Result<RgbImage> {
    options.validate()?;
    let image = decode_image(image_bytes)?;
    let boxes = detector.detect(&image)?;
    log::info!("detected {} layout regions", boxes.len());
    Ok(render_layout(&image, &boxes, options.line_width))
}
