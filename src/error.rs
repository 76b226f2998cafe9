//! Error types for the layout-eval library.

use thiserror::Error;

/// Result type for layout-eval operations.
pub type Result<T> = std::result::Result<T, LayoutEvalError>;

/// Error types that can occur while preparing or running an evaluation.
///
/// The matching and scoring core never fails; every variant here comes from
/// validating inputs at the boundary (image payloads, ground-truth documents,
/// options) or from the collaborators around the core.
#[derive(Error, Debug)]
pub enum LayoutEvalError {
    /// Empty or undecodable image payload.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Ground-truth document that parses but cannot be normalized.
    #[error("Invalid ground truth: {0}")]
    InvalidData(String),

    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while encoding an image.
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    /// Invalid IoU threshold or rendering option.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Failure reported by a layout detector.
    #[error("Detection failed: {0}")]
    DetectionFailed(String),
}

/// Coarse classification of a [`LayoutEvalError`] for callers that need to
/// decide between rejecting a request and reporting an internal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The image payload was empty or undecodable.
    Input,
    /// The ground-truth or predictions document was malformed.
    Data,
    /// Options were out of range.
    Configuration,
    /// Failures outside the caller's control, including file access.
    Internal,
}

impl LayoutEvalError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::Input,
            Self::InvalidData(_) | Self::JsonError(_) => ErrorKind::Data,
            Self::InvalidThreshold(_) => ErrorKind::Configuration,
            Self::IoError(_) | Self::ImageError(_) | Self::DetectionFailed(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Whether the error should be surfaced as a client-side rejection
    /// rather than retried.
    pub fn is_client_error(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            LayoutEvalError::InvalidInput("empty".into()).kind(),
            ErrorKind::Input
        );
        assert_eq!(
            LayoutEvalError::InvalidData("unknown category".into()).kind(),
            ErrorKind::Data
        );
        assert_eq!(
            LayoutEvalError::InvalidThreshold("1.5".into()).kind(),
            ErrorKind::Configuration
        );
        assert!(!LayoutEvalError::DetectionFailed("model".into()).is_client_error());
    }

    #[test]
    fn test_io_error_is_internal() {
        let err: LayoutEvalError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "options.json").into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_json_error_is_data_error() {
        let err: LayoutEvalError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Data);
        assert!(err.is_client_error());
    }
}
