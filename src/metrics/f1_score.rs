//! F1 Score calculation.

/// Calculate F1 score from precision and recall.
///
/// F1 score is the harmonic mean of precision and recall:
/// F1 = 2 × (Precision × Recall) / (Precision + Recall)
///
/// Returns 0.0 if both precision and recall are 0.
///
/// # Example
///
/// ```
/// use layout_eval::metrics::f1_score::calculate_f1_score;
///
/// let f1 = calculate_f1_score(0.8, 0.6);
/// assert!((f1 - 0.6857).abs() < 0.001);
/// ```
pub fn calculate_f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall <= 0.0 {
        return 0.0;
    }

    2.0 * (precision * recall) / (precision + recall)
}
