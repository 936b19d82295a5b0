//! Error types for support generation.
//!
//! Almost every failure inside the pipeline is recovered locally: degenerate
//! elements are skipped and exhausted routes fall back to simpler paths. The
//! [`SupportError`] enum covers what remains, conditions under which the
//! pipeline cannot proceed at all.

/// Errors that can occur during support generation.
///
/// # Example
///
/// ```
/// use support_types::SupportError;
///
/// let error = SupportError::invalid_config("step_size must be positive");
/// assert!(error.is_invalid_config());
/// assert!(error.to_string().contains("step_size"));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum SupportError {
    /// The model surface has no vertices or no faces.
    ///
    /// There is nothing to sample for the collision index and nothing to
    /// support.
    #[error("model surface is empty")]
    EmptySurface,

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Geometry that an operation requires to be non-degenerate was not.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Sweeping a path into a solid failed.
    #[error("sweep failed: {0}")]
    Sweep(String),
}

impl SupportError {
    /// Creates an invalid configuration error with the given message.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Creates a degenerate geometry error with the given message.
    ///
    /// # Example
    ///
    /// ```
    /// use support_types::SupportError;
    ///
    /// let error = SupportError::degenerate("zero-length segment");
    /// assert!(error.to_string().contains("zero-length"));
    /// ```
    #[must_use]
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry(message.into())
    }

    /// Creates a sweep error with the given message.
    #[must_use]
    pub fn sweep(message: impl Into<String>) -> Self {
        Self::Sweep(message.into())
    }

    /// Returns `true` if this is an empty surface error.
    #[must_use]
    pub const fn is_empty_surface(&self) -> bool {
        matches!(self, Self::EmptySurface)
    }

    /// Returns `true` if this is an invalid configuration error.
    #[must_use]
    pub const fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidConfig(_))
    }

    /// Returns `true` if this is a degenerate geometry error.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        matches!(self, Self::DegenerateGeometry(_))
    }
}

/// Result type for support generation operations.
pub type SupportResult<T> = Result<T, SupportError>;
