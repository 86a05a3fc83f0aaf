//! Regression and noise level estimation over log-log profiles.
//!
//! The noise level of a measurement site is the first scale at which its
//! profile starts behaving like a stable power law, i.e. the start of the
//! first meaningful scale interval. Sites whose profile never stabilizes have
//! no noise level, reported as `0.0`; scale values are strictly positive so
//! the sentinel is unambiguous.

use crate::config::{LowerBound, MeaningfulScaleConfig};
use crate::errors::{ScaleProfileError, ScaleResult};
use crate::math_utils::ols_regression;
use crate::slopes::{meaningful_intervals, ScaleInterval};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sentinel returned when no noise level is detected
pub const NO_NOISE_LEVEL: f64 = 0.0;

/// Slope fitted over the first meaningful interval, or over the whole profile
/// when none exists
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlopeEstimate {
    /// Whether the slope comes from a meaningful interval
    pub meaningful: bool,
    /// Least-squares slope of `ln value` against `ln scale`
    pub slope: f64,
    /// Coefficient of determination of the fit
    pub r_squared: f64,
    /// Interval the fit was restricted to, `None` for a full-range fit
    pub interval: Option<ScaleInterval>,
}

impl SlopeEstimate {
    /// `(meaningful, slope)` pair
    pub fn as_pair(&self) -> (bool, f64) {
        (self.meaningful, self.slope)
    }
}

/// Fits the profile slope over its first meaningful interval.
///
/// Falls back to a fit over all points when no interval of at least
/// `config.min_width` slopes exists; callers must check
/// [`SlopeEstimate::meaningful`] before trusting the result.
///
/// # Errors
/// * `InsufficientData` when the fallback has fewer than two points; a single
///   point defines no slope, so no NaN estimate is produced
/// * `InvalidParameter` for a malformed band
pub fn slope_from_intervals(
    x: &[f64],
    y: &[f64],
    config: &MeaningfulScaleConfig,
) -> ScaleResult<SlopeEstimate> {
    let intervals = meaningful_intervals(x, y, config)?;

    match intervals.first() {
        Some(&interval) => {
            let range = interval.indices();
            let fit = ols_regression(&x[range.clone()], &y[range])?;
            log::debug!(
                "Slope {:.4} fitted over meaningful interval [{}, {}]",
                fit.slope,
                interval.start,
                interval.end
            );
            Ok(SlopeEstimate {
                meaningful: true,
                slope: fit.slope,
                r_squared: fit.r_squared,
                interval: Some(interval),
            })
        }
        None => {
            let fit = ols_regression(x, y)?;
            log::debug!(
                "No meaningful interval among {} points, full-range slope {:.4}",
                x.len(),
                fit.slope
            );
            Ok(SlopeEstimate {
                meaningful: false,
                slope: fit.slope,
                r_squared: fit.r_squared,
                interval: None,
            })
        }
    }
}

/// Scale at the start of the first meaningful interval, or [`NO_NOISE_LEVEL`].
///
/// `scales` must be index-aligned with the profile points.
pub fn noise_level_from_profile(
    scales: &[f64],
    x: &[f64],
    y: &[f64],
    config: &MeaningfulScaleConfig,
) -> ScaleResult<f64> {
    check_alignment(scales, x)?;
    let intervals = meaningful_intervals(x, y, config)?;
    Ok(noise_level_of(scales, intervals.first()))
}

/// Noise level restricted to intervals lying on or above a power-law floor.
///
/// An interval is rejected as soon as one of its points falls strictly below
/// `ln(bound.at_scale_1) + bound.slope * x[k]`, the log of the floor
/// `at_scale_1 * scale^slope`. The first surviving interval gives the level.
pub fn lower_bounded_noise_level_from_profile(
    scales: &[f64],
    x: &[f64],
    y: &[f64],
    config: &MeaningfulScaleConfig,
    bound: &LowerBound,
) -> ScaleResult<f64> {
    check_alignment(scales, x)?;
    bound.validate()?;
    let intervals = meaningful_intervals(x, y, config)?;

    let accepted = intervals
        .iter()
        .find(|interval| interval.indices().all(|k| y[k] >= bound.floor_at(x[k])));

    if accepted.is_none() && !intervals.is_empty() {
        log::debug!(
            "All {} meaningful intervals fall below the floor {} * scale^{}",
            intervals.len(),
            bound.at_scale_1,
            bound.slope
        );
    }
    Ok(noise_level_of(scales, accepted))
}

fn noise_level_of(scales: &[f64], interval: Option<&ScaleInterval>) -> f64 {
    match interval {
        Some(interval) => {
            log::debug!(
                "Noise level {} at meaningful interval [{}, {}]",
                scales[interval.start],
                interval.start,
                interval.end
            );
            scales[interval.start]
        }
        None => NO_NOISE_LEVEL,
    }
}

fn check_alignment(scales: &[f64], x: &[f64]) -> ScaleResult<()> {
    if scales.len() == x.len() {
        Ok(())
    } else {
        Err(ScaleProfileError::InvalidArgument {
            parameter: "scales".to_string(),
            constraint: format!("one scale per profile point ({} != {})", scales.len(), x.len()),
        })
    }
}
