//! Tunable options for an evaluation run.

use crate::error::{LayoutEvalError, Result};
use crate::matching::DEFAULT_IOU_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Outline width used by the overlay renderer.
pub const DEFAULT_LINE_WIDTH: u32 = 2;

/// Height above which the polygon classifier labels a box `title`.
pub const DEFAULT_TITLE_MIN_HEIGHT: f64 = 30.0;

/// Options shared by the evaluate and detect paths.
///
/// Missing fields in a JSON options file fall back to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationOptions {
    /// Minimum IoU for a true positive.
    pub iou_threshold: f64,
    /// Outline width in pixels.
    pub line_width: u32,
    /// Used by [`crate::detection::classify_boxes`].
    pub title_min_height: f64,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            line_width: DEFAULT_LINE_WIDTH,
            title_min_height: DEFAULT_TITLE_MIN_HEIGHT,
        }
    }
}

impl EvaluationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read options from a JSON file and validate them.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let options: Self = serde_json::from_reader(BufReader::new(file))?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_iou_threshold(mut self, iou_threshold: f64) -> Self {
        self.iou_threshold = iou_threshold;
        self
    }

    pub fn with_line_width(mut self, line_width: u32) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_title_min_height(mut self, title_min_height: f64) -> Self {
        self.title_min_height = title_min_height;
        self
    }

    /// Check that every option is in range.
    pub fn validate(&self) -> Result<()> {
        validate_iou_threshold(self.iou_threshold)?;

        if self.line_width == 0 {
            return Err(LayoutEvalError::InvalidThreshold(
                "line width must be at least 1 pixel".to_string(),
            ));
        }

        if !self.title_min_height.is_finite() || self.title_min_height < 0.0 {
            return Err(LayoutEvalError::InvalidThreshold(format!(
                "title height must be a non-negative number, got {}",
                self.title_min_height
            )));
        }

        Ok(())
    }
}

/// Check that an IoU threshold lies in `[0, 1]`.
pub fn validate_iou_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(LayoutEvalError::InvalidThreshold(format!(
            "IoU threshold must be between 0.0 and 1.0, got {threshold}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = EvaluationOptions::default();
        assert_eq!(options.iou_threshold, 0.5);
        assert_eq!(options.line_width, 2);
        assert_eq!(options.title_min_height, 30.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let options = EvaluationOptions::new()
            .with_iou_threshold(0.75)
            .with_line_width(4)
            .with_title_min_height(12.0);
        assert_eq!(options.iou_threshold, 0.75);
        assert_eq!(options.line_width, 4);
        assert_eq!(options.title_min_height, 12.0);
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(validate_iou_threshold(1.5).is_err());
        assert!(validate_iou_threshold(-0.1).is_err());
        assert!(validate_iou_threshold(f64::NAN).is_err());
        assert!(validate_iou_threshold(0.0).is_ok());
        assert!(validate_iou_threshold(1.0).is_ok());
    }

    #[test]
    fn test_zero_line_width() {
        let options = EvaluationOptions::new().with_line_width(0);
        assert!(matches!(
            options.validate(),
            Err(LayoutEvalError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_partial_options_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"iou_threshold": 0.7}}"#).unwrap();

        let options = EvaluationOptions::from_file(file.path()).unwrap();
        assert_eq!(options.iou_threshold, 0.7);
        assert_eq!(options.line_width, DEFAULT_LINE_WIDTH);
    }
}
