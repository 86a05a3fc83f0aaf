//! Slope analysis of log-log profiles.
//!
//! Given profile points `(ln scale, ln value)`, the slope between two
//! consecutive scales is the finite difference of the profile. A
//! *meaningful scale interval* is a maximal run of consecutive slopes inside
//! a configured band, long enough to be trusted. Intervals are reported in
//! profile-point indices: the run of slopes `start..end` yields the interval
//! `[start, end]`, covering `end - start + 1` points.

use crate::config::MeaningfulScaleConfig;
use crate::errors::{ScaleProfileError, ScaleResult};
use crate::math_utils::float_ops;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closed interval of profile-point indices `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScaleInterval {
    /// Index of the first point
    pub start: usize,
    /// Index of the last point (inclusive)
    pub end: usize,
}

impl ScaleInterval {
    /// Number of slopes spanned, `end - start`
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    /// Point indices covered by the interval
    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

impl From<ScaleInterval> for (usize, usize) {
    fn from(interval: ScaleInterval) -> Self {
        (interval.start, interval.end)
    }
}

/// Finite-difference slopes `(y[i+1] - y[i]) / (x[i+1] - x[i])`.
///
/// Returns `n - 1` slopes for `n` points. Two points sharing the same `x`
/// yield a NaN slope, which no band accepts.
pub fn finite_difference_slopes(x: &[f64], y: &[f64]) -> ScaleResult<Vec<f64>> {
    if x.len() != y.len() {
        return Err(ScaleProfileError::InvalidArgument {
            parameter: "profile".to_string(),
            constraint: format!("x and y of equal length (got {} and {})", x.len(), y.len()),
        });
    }
    Ok(x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| {
            let dx = xs[1] - xs[0];
            if float_ops::approx_zero(dx) {
                f64::NAN
            } else {
                (ys[1] - ys[0]) / dx
            }
        })
        .collect())
}

/// Finds the meaningful scale intervals of a profile.
///
/// Scans the slopes left to right, closing a run at every slope outside
/// `[config.min_slope, config.max_slope]`. Runs of at least
/// `config.min_width` slopes are kept. The result is ordered by start index
/// and intervals never overlap.
///
/// # Example
/// ```rust
/// use scale_profile::config::MeaningfulScaleConfig;
/// use scale_profile::slopes::meaningful_intervals;
///
/// let x: Vec<f64> = (1..=4).map(|s| (s as f64).ln()).collect();
/// let y: Vec<f64> = x.iter().map(|lx| -lx).collect();
/// let intervals = meaningful_intervals(&x, &y, &MeaningfulScaleConfig::default()).unwrap();
/// assert_eq!(intervals.len(), 1);
/// assert_eq!((intervals[0].start, intervals[0].end), (0, 3));
/// ```
pub fn meaningful_intervals(
    x: &[f64],
    y: &[f64],
    config: &MeaningfulScaleConfig,
) -> ScaleResult<Vec<ScaleInterval>> {
    config.validate()?;
    let slopes = finite_difference_slopes(x, y)?;

    let mut intervals = Vec::new();
    let mut run_start = 0;
    for (k, &slope) in slopes.iter().enumerate() {
        // slope k joins points k and k + 1
        if !config.accepts(slope) {
            if k - run_start >= config.min_width {
                intervals.push(ScaleInterval {
                    start: run_start,
                    end: k,
                });
            }
            run_start = k + 1;
        }
    }
    if slopes.len() - run_start >= config.min_width {
        intervals.push(ScaleInterval {
            start: run_start,
            end: slopes.len(),
        });
    }
    Ok(intervals)
}
