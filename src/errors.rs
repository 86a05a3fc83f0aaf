//! Error types and validation functions for scale profile analysis.
//!
//! Every failure in this crate is a violated precondition rather than a
//! transient fault: using a profile before `init`, addressing a scale that
//! does not exist, or asking for an aggregate that is undefined. Errors are
//! returned to the caller immediately and never retried.

use thiserror::Error;

/// Error types for scale profile operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ScaleProfileError {
    /// The profile has not been initialized, or has been cleared.
    #[error("Invalid state: {operation} requires an initialized scale profile")]
    InvalidState {
        /// Operation that was attempted
        operation: String,
    },

    /// A scale index outside `[0, len)`.
    #[error("Scale index out of range: {index} not in [0, {len})")]
    IndexOutOfRange {
        /// Index provided by the caller
        index: usize,
        /// Number of scales in the profile
        len: usize,
    },

    /// A structural argument that cannot be used (empty scale sequence, bad scale value).
    #[error("Invalid argument: {parameter}, expected {constraint}")]
    InvalidArgument {
        /// Argument name
        parameter: String,
        /// Constraint the argument violates
        constraint: String,
    },

    /// A numeric parameter outside its admissible range.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// An aggregate was requested on an accumulator holding no samples.
    #[error("Empty statistic at scale index {index}: aggregate is undefined")]
    EmptyStatistic {
        /// Scale index of the empty accumulator
        index: usize,
    },

    /// Median requested on an accumulator that neither retains samples nor has a frozen median.
    #[error("Median unavailable at scale index {index}: samples were not retained")]
    MedianUnavailable {
        /// Scale index of the accumulator
        index: usize,
    },

    /// Not enough points for the requested computation.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required points
        required: usize,
        /// Actual number of points
        actual: usize,
    },

    /// Numerical computation failed (non-finite values, degenerate design).
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for the failure
        reason: String,
    },

    /// Encoding or decoding of a persisted profile failed.
    #[error("Serialization failed ({format}): {reason}")]
    SerializationError {
        /// Format that failed
        format: String,
        /// Underlying failure
        reason: String,
    },

    /// A persisted profile was written with a format version this build cannot read.
    #[error("Unsupported profile format version {found}, supported version is {supported}")]
    UnsupportedVersion {
        /// Version found in the blob
        found: u32,
        /// Version this build writes and reads
        supported: u32,
    },
}

/// Result type for scale profile operations.
pub type ScaleResult<T> = Result<T, ScaleProfileError>;

/// Validates that `index` addresses one of `len` scales.
///
/// # Example
/// ```rust
/// use scale_profile::errors::validate_index;
///
/// assert!(validate_index(2, 3).is_ok());
/// assert!(validate_index(3, 3).is_err());
/// ```
pub fn validate_index(index: usize, len: usize) -> ScaleResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(ScaleProfileError::IndexOutOfRange { index, len })
    }
}

/// Validates that a value is finite and not NaN.
///
/// # Example
/// ```rust
/// use scale_profile::errors::validate_finite;
///
/// assert!(validate_finite(1.0, "value").is_ok());
/// assert!(validate_finite(f64::NAN, "value").is_err());
/// assert!(validate_finite(f64::INFINITY, "value").is_err());
/// ```
pub fn validate_finite(value: f64, name: &str) -> ScaleResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ScaleProfileError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "a finite value".to_string(),
        })
    }
}

/// Validates that a value is finite and strictly positive.
///
/// Scales and power-law anchors go through a logarithm, so zero and
/// negative values are rejected.
pub fn validate_positive(value: f64, name: &str) -> ScaleResult<()> {
    validate_finite(value, name)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ScaleProfileError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "> 0".to_string(),
        })
    }
}
