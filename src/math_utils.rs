//! Mathematical utility functions and constants for scale profile analysis.
//!
//! This module provides the numerical foundation used by the profile builder
//! and the noise estimator: NaN-safe ordering, medians, guarded logarithms and
//! the least-squares fit used to measure log-log slopes.

use crate::errors::{ScaleProfileError, ScaleResult};

/// Numerical constants used throughout the crate.
pub mod constants {
    /// Default epsilon for floating point comparisons
    pub const DEFAULT_EPSILON: f64 = 1e-12;

    /// Minimum spread of the predictor before a regression is considered degenerate
    pub const MIN_VARIANCE: f64 = 1e-15;

    /// Minimum positive value for log operations
    pub const MIN_LOG_VALUE: f64 = 1e-300;
}

/// Safe comparison for floating point values (handles NaN)
pub fn float_total_cmp(a: &f64, b: &f64) -> std::cmp::Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater, // push NaN to end
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal),
    }
}

/// Calculate median of already-sorted data (handles even-length correctly)
pub fn median_of_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some(0.5 * (sorted[n / 2 - 1] + sorted[n / 2]))
    }
}

/// Calculate median (handles even-length correctly)
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut v = values.to_vec();
    v.sort_by(float_total_cmp);
    median_of_sorted(&v)
}

/// Guarded floating point helpers.
pub mod float_ops {
    use super::constants::{DEFAULT_EPSILON, MIN_LOG_VALUE};

    /// Check if a floating point number is approximately zero
    #[inline]
    pub fn approx_zero(x: f64) -> bool {
        x.abs() < DEFAULT_EPSILON
    }

    /// Check if a floating point number is approximately zero with custom epsilon
    #[inline]
    pub fn approx_zero_eps(x: f64, epsilon: f64) -> bool {
        x.abs() < epsilon
    }

    /// Safe logarithm that checks for positive arguments and finite inputs
    pub fn safe_ln(x: f64) -> Option<f64> {
        if x > MIN_LOG_VALUE && x.is_finite() {
            Some(x.ln())
        } else {
            None
        }
    }
}

/// Result of a simple linear least-squares fit `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Fitted slope
    pub slope: f64,
    /// Fitted intercept
    pub intercept: f64,
    /// Coefficient of determination; 1.0 when `y` is constant
    pub r_squared: f64,
}

/// Ordinary Least Squares regression of `y` on `x`.
///
/// Data is centred before the sums are formed so that large log-scale
/// offsets do not cancel catastrophically. Two points are enough to define a
/// slope, so unlike a general-purpose estimator no residual degrees of freedom
/// are required.
///
/// # Errors
/// * `InsufficientData` if fewer than 2 points or mismatched lengths
/// * `NumericalError` on non-finite input or constant `x`
///
/// # Example
/// ```rust
/// use scale_profile::math_utils::ols_regression;
///
/// let x = vec![0.0, 1.0, 2.0];
/// let y = vec![1.0, 3.0, 5.0];
/// let fit = ols_regression(&x, &y).unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!((fit.intercept - 1.0).abs() < 1e-12);
/// ```
pub fn ols_regression(x: &[f64], y: &[f64]) -> ScaleResult<LinearFit> {
    if x.len() != y.len() || x.len() < 2 {
        return Err(ScaleProfileError::InsufficientData {
            required: 2,
            actual: x.len().min(y.len()),
        });
    }

    if !x.iter().all(|&val| val.is_finite()) || !y.iter().all(|&val| val.is_finite()) {
        return Err(ScaleProfileError::NumericalError {
            reason: "Non-finite values in regression data".to_string(),
        });
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (sxy, sxx, syy) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0, 0.0), |(sxy, sxx, syy), (xi, yi)| {
            let dx = xi - mean_x;
            let dy = yi - mean_y;
            (sxy + dx * dy, sxx + dx * dx, syy + dy * dy)
        });

    if float_ops::approx_zero_eps(sxx, constants::MIN_VARIANCE) {
        return Err(ScaleProfileError::NumericalError {
            reason: "Predictor variable has zero variance (constant values)".to_string(),
        });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    if !slope.is_finite() || !intercept.is_finite() {
        return Err(ScaleProfileError::NumericalError {
            reason: "Non-finite regression coefficients computed".to_string(),
        });
    }

    let r_squared = if float_ops::approx_zero_eps(syy, constants::MIN_VARIANCE) {
        1.0
    } else {
        (sxy * sxy / (sxx * syy)).clamp(0.0, 1.0)
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}
