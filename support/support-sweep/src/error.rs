//! Error types for sweep operations.

use support_types::SupportError;
use thiserror::Error;

/// Result type for sweep operations.
pub type SweepResult<T> = Result<T, SweepError>;

/// Errors that can occur while sweeping a path into a mesh.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SweepError {
    /// Path has too few points.
    #[error("path needs at least {min} points, got {actual}")]
    TooFewPoints {
        /// Minimum required points.
        min: usize,
        /// Actual point count.
        actual: usize,
    },

    /// Radius is zero, negative or not finite.
    #[error("invalid radius: {0}")]
    InvalidRadius(f64),

    /// Too few sides around the circumference.
    #[error("radial segments must be at least {min}, got {actual}")]
    TooFewSegments {
        /// Minimum required segments.
        min: usize,
        /// Actual segment count.
        actual: usize,
    },

    /// Every segment of the path has zero length.
    #[error("path has no segment of non-zero length")]
    Degenerate,
}

impl From<SweepError> for SupportError {
    fn from(err: SweepError) -> Self {
        Self::sweep(err.to_string())
    }
}
