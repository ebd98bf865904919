//! Error types for the detection pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the detection pipeline.
///
/// A degenerate (all-zero) spectrum is deliberately *not* an error: it is
/// handled inside the spectral stage by substituting an all-zero normalized
/// spectrum, so the verdict degrades to `false` instead of aborting.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The input image could not be resolved or decoded.
    #[error("cannot load image '{}': {source}", path.display())]
    ImageNotFound {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// A degenerate grid (zero area, undersized, mismatched shapes) reached
    /// an analysis stage.
    #[error("invalid input in {stage}: {reason}")]
    InvalidInput { stage: &'static str, reason: String },
}

impl DetectError {
    /// Convenience constructor for stage precondition failures.
    pub fn invalid_input(stage: &'static str, reason: impl Into<String>) -> Self {
        DetectError::InvalidInput { stage, reason: reason.into() }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, DetectError>;
