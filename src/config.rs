//! # Profile Configuration
//!
//! Configuration structures for building profiles and detecting meaningful
//! scales: which aggregate turns the samples of a scale into a profile value,
//! the slope band that qualifies a run of scales, and the power-law floor used
//! by the lower-bounded noise level.

use crate::errors::{validate_finite, validate_positive, ScaleProfileError, ScaleResult};
use crate::statistic::Statistic;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Aggregate used to turn the samples of one scale into a profile value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProfileMode {
    /// Arithmetic mean of the samples (default)
    #[default]
    Mean,
    /// Largest sample
    Max,
    /// Smallest sample
    Min,
    /// Median; requires retained samples or a frozen median
    Median,
}

impl ProfileMode {
    /// Returns the accessor selected by this mode.
    ///
    /// Profile builds resolve the mode once and apply the returned function
    /// to every scale.
    pub fn aggregator(self) -> fn(&Statistic) -> Option<f64> {
        match self {
            ProfileMode::Mean => Statistic::mean,
            ProfileMode::Max => Statistic::max,
            ProfileMode::Min => Statistic::min,
            ProfileMode::Median => Statistic::median,
        }
    }

    /// Applies this mode to one statistic.
    pub fn aggregate(self, stat: &Statistic) -> Option<f64> {
        (self.aggregator())(stat)
    }

    /// Upper-case name used in textual output
    pub fn name(self) -> &'static str {
        match self {
            ProfileMode::Mean => "MEAN",
            ProfileMode::Max => "MAX",
            ProfileMode::Min => "MIN",
            ProfileMode::Median => "MEDIAN",
        }
    }
}

/// Slope band and minimum width defining a meaningful scale interval
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeaningfulScaleConfig {
    /// Minimum number of consecutive qualifying slopes
    pub min_width: usize,
    /// Upper bound on the log-log slope (inclusive)
    pub max_slope: f64,
    /// Lower bound on the log-log slope (inclusive)
    pub min_slope: f64,
}

impl Default for MeaningfulScaleConfig {
    fn default() -> Self {
        Self {
            min_width: 1,
            max_slope: -0.2,
            min_slope: -1e10,
        }
    }
}

impl MeaningfulScaleConfig {
    /// Default band with `min_width = 2`, the minimum interval size used
    /// when fitting a slope over the first meaningful interval.
    pub fn for_slope_estimation() -> Self {
        Self {
            min_width: 2,
            ..Self::default()
        }
    }

    /// Same band with a different minimum width
    pub fn with_min_width(mut self, min_width: usize) -> Self {
        self.min_width = min_width;
        self
    }

    /// Same width with a different slope band
    pub fn with_slopes(mut self, max_slope: f64, min_slope: f64) -> Self {
        self.max_slope = max_slope;
        self.min_slope = min_slope;
        self
    }

    /// Checks that the width is positive and the band is well formed.
    pub fn validate(&self) -> ScaleResult<()> {
        if self.min_width == 0 {
            return Err(ScaleProfileError::InvalidParameter {
                parameter: "min_width".to_string(),
                value: 0.0,
                constraint: ">= 1".to_string(),
            });
        }
        if self.max_slope.is_nan() {
            return Err(nan_parameter("max_slope"));
        }
        if self.min_slope.is_nan() {
            return Err(nan_parameter("min_slope"));
        }
        if self.min_slope > self.max_slope {
            return Err(ScaleProfileError::InvalidParameter {
                parameter: "min_slope".to_string(),
                value: self.min_slope,
                constraint: format!("<= max_slope ({})", self.max_slope),
            });
        }
        Ok(())
    }

    /// Whether a slope lies inside the band. NaN never does.
    #[inline]
    pub fn accepts(&self, slope: f64) -> bool {
        self.min_slope <= slope && slope <= self.max_slope
    }
}

fn nan_parameter(name: &str) -> ScaleProfileError {
    ScaleProfileError::InvalidParameter {
        parameter: name.to_string(),
        value: f64::NAN,
        constraint: "must not be NaN".to_string(),
    }
}

/// Power-law floor `at_scale_1 * scale^slope` below which profile values are
/// considered implausibly small
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LowerBound {
    /// Floor value at scale 1
    pub at_scale_1: f64,
    /// Decay exponent of the floor
    pub slope: f64,
}

impl Default for LowerBound {
    fn default() -> Self {
        Self {
            at_scale_1: 1.0,
            slope: -2.0,
        }
    }
}

impl LowerBound {
    /// Floor for lengths measured on digital contours (slope -1)
    pub fn digital_contour() -> Self {
        Self {
            at_scale_1: 1.0,
            slope: -1.0,
        }
    }

    /// Floor for digital image graphs, whose area values are divided by scale^3
    pub fn image_graph() -> Self {
        Self {
            at_scale_1: 1.0,
            slope: -3.0,
        }
    }

    /// Checks that the anchor is positive and the slope finite.
    pub fn validate(&self) -> ScaleResult<()> {
        validate_positive(self.at_scale_1, "lower_bound_at_scale_1")?;
        validate_finite(self.slope, "lower_bound_slope")
    }

    /// Floor in log space at `log_scale = ln(scale)`
    #[inline]
    pub fn floor_at(&self, log_scale: f64) -> f64 {
        self.at_scale_1.ln() + self.slope * log_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_default_band() {
        let config = MeaningfulScaleConfig::default();
        assert_eq!(config.min_width, 1);
        assert!(config.accepts(-0.2));
        assert!(config.accepts(-1e10));
        assert!(!config.accepts(-0.19));
        assert!(!config.accepts(f64::NAN));
        assert!(config.validate().is_ok());
        assert_eq!(MeaningfulScaleConfig::for_slope_estimation().min_width, 2);
    }

    #[test]
    fn test_band_validation() {
        assert!(MeaningfulScaleConfig::default()
            .with_min_width(0)
            .validate()
            .is_err());
        assert!(MeaningfulScaleConfig::default()
            .with_slopes(-2.0, -1.0)
            .validate()
            .is_err());
        assert!(MeaningfulScaleConfig::default()
            .with_slopes(f64::NAN, -1.0)
            .validate()
            .is_err());
        assert!(MeaningfulScaleConfig::default()
            .with_slopes(-0.5, -0.5)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_mode_dispatch() {
        let mut stat = Statistic::new(true);
        for v in [1.0, 2.0, 6.0] {
            stat.add(v);
        }
        assert_approx_eq!(ProfileMode::Mean.aggregate(&stat).unwrap(), 3.0, 1e-15);
        assert_eq!(ProfileMode::Max.aggregate(&stat), Some(6.0));
        assert_eq!(ProfileMode::Min.aggregate(&stat), Some(1.0));
        assert_eq!(ProfileMode::Median.aggregate(&stat), Some(2.0));
        assert_eq!(ProfileMode::default(), ProfileMode::Mean);
    }

    #[test]
    fn test_lower_bound_floor() {
        let bound = LowerBound::default();
        assert!(bound.validate().is_ok());
        assert_approx_eq!(bound.floor_at(0.0), 0.0, 1e-15);
        assert_approx_eq!(bound.floor_at(2.0_f64.ln()), -2.0 * 2.0_f64.ln(), 1e-15);

        let bound = LowerBound {
            at_scale_1: 0.0,
            slope: -1.0,
        };
        assert!(bound.validate().is_err());
        assert_eq!(LowerBound::image_graph().slope, -3.0);
        assert_eq!(LowerBound::digital_contour().slope, -1.0);
    }
}
