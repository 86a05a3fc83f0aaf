//! # Scale Profile
//!
//! A [`ScaleProfile`] represents what happens at one measurement site (one
//! contour point, one surface element) across a sequence of observation
//! scales: for every scale it accumulates the digital lengths measured there
//! in a [`Statistic`]. All analysis is performed in log-log space.
//!
//! Typical use:
//!
//! ```rust
//! use scale_profile::{MeaningfulScaleConfig, ScaleProfile};
//!
//! # fn main() -> Result<(), scale_profile::ScaleProfileError> {
//! let mut profile = ScaleProfile::new();
//! profile.init_with_count(4, false)?;
//! for (idx, scale) in [1.0_f64, 2.0, 3.0, 4.0].iter().enumerate() {
//!     profile.add_value(idx, 1.0 / scale)?;
//! }
//! assert_eq!(profile.noise_level(&MeaningfulScaleConfig::default())?, 1.0);
//! # Ok(())
//! # }
//! ```

use crate::config::{LowerBound, MeaningfulScaleConfig, ProfileMode};
use crate::errors::{
    validate_finite, validate_index, validate_positive, ScaleProfileError, ScaleResult,
};
use crate::math_utils::float_ops;
use crate::noise::{
    lower_bounded_noise_level_from_profile, noise_level_from_profile, slope_from_intervals,
    SlopeEstimate,
};
use crate::slopes::{meaningful_intervals, ScaleInterval};
use crate::statistic::Statistic;
use std::fmt;

/// Multiscale profile of one measurement site.
///
/// `Clone` deep-copies the scale and statistic sequences; two profiles never
/// share accumulator state. To replace a profile, move a clone into it.
#[derive(Debug, Clone, Default)]
pub struct ScaleProfile {
    scales: Vec<f64>,
    stats: Vec<Statistic>,
    mode: ProfileMode,
    store_samples: bool,
}

impl ScaleProfile {
    /// Creates an invalid (uninitialized) profile using [`ProfileMode::Mean`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an invalid (uninitialized) profile using `mode`.
    pub fn with_mode(mode: ProfileMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Initializes the profile with the given scales, discarding prior state.
    ///
    /// One empty [`Statistic`] is allocated per scale, retaining raw samples
    /// if `store_samples` is set (needed for [`ProfileMode::Median`]).
    ///
    /// # Errors
    /// `InvalidArgument` if `scales` is empty or contains a value that is not
    /// finite and strictly positive. The profile is left untouched on error.
    pub fn init<I, S>(&mut self, scales: I, store_samples: bool) -> ScaleResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<f64>,
    {
        let scales: Vec<f64> = scales.into_iter().map(Into::into).collect();
        if scales.is_empty() {
            return Err(ScaleProfileError::InvalidArgument {
                parameter: "scales".to_string(),
                constraint: "at least one scale".to_string(),
            });
        }
        if let Some((idx, &scale)) = scales
            .iter()
            .enumerate()
            .find(|(_, &s)| validate_positive(s, "scale").is_err())
        {
            return Err(ScaleProfileError::InvalidArgument {
                parameter: format!("scales[{}]", idx),
                constraint: format!("a finite scale > 0, got {}", scale),
            });
        }

        self.stats = vec![Statistic::new(store_samples); scales.len()];
        self.scales = scales;
        self.store_samples = store_samples;
        log::debug!(
            "Initialized scale profile with {} scales (store samples: {})",
            self.scales.len(),
            store_samples
        );
        Ok(())
    }

    /// Initializes the profile with the scales `1, 2, ..., count`.
    pub fn init_with_count(&mut self, count: usize, store_samples: bool) -> ScaleResult<()> {
        self.init((1..=count).map(|s| s as f64), store_samples)
    }

    /// Returns the profile to the uninitialized state. The mode is kept.
    pub fn clear(&mut self) {
        self.scales = Vec::new();
        self.stats = Vec::new();
        self.store_samples = false;
    }

    /// Whether the profile has been initialized with at least one scale.
    pub fn is_valid(&self) -> bool {
        !self.scales.is_empty() && self.scales.len() == self.stats.len()
    }

    /// Adds one sample at scale `idx`.
    ///
    /// # Errors
    /// `InvalidState` before `init`, `IndexOutOfRange` for a bad index and
    /// `InvalidParameter` for a non-finite value.
    pub fn add_value(&mut self, idx: usize, value: f64) -> ScaleResult<()> {
        self.ensure_valid("add_value")?;
        validate_index(idx, self.stats.len())?;
        validate_finite(value, "value")?;
        self.stats[idx].add(value);
        Ok(())
    }

    /// Merges an externally built statistic into the one at scale `idx`.
    pub fn add_statistic(&mut self, idx: usize, stat: &Statistic) -> ScaleResult<()> {
        self.ensure_valid("add_statistic")?;
        validate_index(idx, self.stats.len())?;
        self.stats[idx].merge(stat);
        Ok(())
    }

    /// Freezes the median of every scale and releases the retained samples.
    ///
    /// The median of each statistic is computed once and cached; samples
    /// added afterwards update the other aggregates but not the median.
    /// Calling this twice is a no-op the second time.
    pub fn stop_stats_saving(&mut self) {
        if !self.store_samples {
            return;
        }
        for stat in &mut self.stats {
            stat.terminate();
        }
        self.store_samples = false;
    }

    /// Selects the aggregate used to compute profile values.
    pub fn set_profile_mode(&mut self, mode: ProfileMode) {
        self.mode = mode;
    }

    /// Aggregate used to compute profile values.
    pub fn mode(&self) -> ProfileMode {
        self.mode
    }

    /// Scale values, in construction order.
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Statistics, index-aligned with [`scales`](Self::scales).
    pub fn statistics(&self) -> &[Statistic] {
        &self.stats
    }

    /// Statistic at scale `idx`.
    pub fn statistic(&self, idx: usize) -> ScaleResult<&Statistic> {
        validate_index(idx, self.stats.len())?;
        Ok(&self.stats[idx])
    }

    /// Number of scales.
    pub fn len(&self) -> usize {
        self.scales.len()
    }

    /// Whether the profile holds no scale.
    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    /// Whether newly added samples are retained.
    pub fn stores_samples(&self) -> bool {
        self.store_samples
    }

    /// Appends the profile points to `x` and `y`.
    ///
    /// `x[i] = ln(scale[i])` and `y[i] = ln(aggregate(stat[i]))` in scale
    /// order. The buffers are only extended once every point is computed, so
    /// on error they are left as they were.
    ///
    /// # Errors
    /// * `InvalidState` before `init`
    /// * `EmptyStatistic` if a scale received no sample
    /// * `MedianUnavailable` in median mode without retained or frozen samples
    /// * `NumericalError` if an aggregate is not strictly positive
    pub fn get_profile(&self, x: &mut Vec<f64>, y: &mut Vec<f64>) -> ScaleResult<()> {
        self.ensure_valid("get_profile")?;
        let aggregate = self.mode.aggregator();

        let mut ys = Vec::with_capacity(self.stats.len());
        for (idx, stat) in self.stats.iter().enumerate() {
            let value = match aggregate(stat) {
                Some(value) => value,
                None if stat.count() == 0 => {
                    return Err(ScaleProfileError::EmptyStatistic { index: idx })
                }
                None => return Err(ScaleProfileError::MedianUnavailable { index: idx }),
            };
            let log_value = float_ops::safe_ln(value).ok_or_else(|| {
                ScaleProfileError::NumericalError {
                    reason: format!(
                        "{} aggregate {} at scale index {} has no logarithm",
                        self.mode.name(),
                        value,
                        idx
                    ),
                }
            })?;
            ys.push(log_value);
        }

        x.extend(self.scales.iter().map(|s| s.ln()));
        y.extend(ys);
        Ok(())
    }

    /// Profile points as freshly allocated vectors.
    pub fn profile(&self) -> ScaleResult<(Vec<f64>, Vec<f64>)> {
        let mut x = Vec::with_capacity(self.len());
        let mut y = Vec::with_capacity(self.len());
        self.get_profile(&mut x, &mut y)?;
        Ok((x, y))
    }

    /// Meaningful scale intervals of the profile, ordered by start index.
    ///
    /// See [`meaningful_intervals`] for the definition.
    pub fn meaningful_scales(&self, config: &MeaningfulScaleConfig) -> ScaleResult<Vec<ScaleInterval>> {
        let (x, y) = self.profile()?;
        meaningful_intervals(&x, &y, config)
    }

    /// Slope of the first meaningful interval, `config.min_width` acting as
    /// the minimum interval size.
    ///
    /// When no interval qualifies, the slope fitted over the whole profile is
    /// returned with `meaningful == false`.
    ///
    /// # Errors
    /// A single-scale profile has no slope and fails with `InsufficientData`,
    /// whereas [`noise_level`](Self::noise_level) reports `0.0` for it.
    pub fn slope_from_meaningful_scales(
        &self,
        config: &MeaningfulScaleConfig,
    ) -> ScaleResult<SlopeEstimate> {
        let (x, y) = self.profile()?;
        slope_from_intervals(&x, &y, config)
    }

    /// Noise level: the scale at the start of the first meaningful interval,
    /// or `0.0` when there is none.
    pub fn noise_level(&self, config: &MeaningfulScaleConfig) -> ScaleResult<f64> {
        let (x, y) = self.profile()?;
        noise_level_from_profile(&self.scales, &x, &y, config)
    }

    /// Noise level ignoring intervals whose values fall below the power-law
    /// floor `bound.at_scale_1 * scale^bound.slope`.
    pub fn lower_bounded_noise_level(
        &self,
        config: &MeaningfulScaleConfig,
        bound: &LowerBound,
    ) -> ScaleResult<f64> {
        let (x, y) = self.profile()?;
        lower_bounded_noise_level_from_profile(&self.scales, &x, &y, config, bound)
    }

    #[cfg(feature = "serde")]
    pub(crate) fn from_parts(
        scales: Vec<f64>,
        stats: Vec<Statistic>,
        mode: ProfileMode,
    ) -> ScaleResult<Self> {
        if scales.len() != stats.len() {
            return Err(ScaleProfileError::InvalidArgument {
                parameter: "stats".to_string(),
                constraint: format!(
                    "one statistic per scale ({} scales, {} statistics)",
                    scales.len(),
                    stats.len()
                ),
            });
        }
        let store_samples = stats.iter().any(Statistic::stores_samples);
        Ok(Self {
            scales,
            stats,
            mode,
            store_samples,
        })
    }

    fn ensure_valid(&self, operation: &str) -> ScaleResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ScaleProfileError::InvalidState {
                operation: operation.to_string(),
            })
        }
    }
}

impl fmt::Display for ScaleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[ScaleProfile mode={} scales={}]", self.mode.name(), self.len())?;
        for (scale, stat) in self.scales.iter().zip(&self.stats) {
            writeln!(f, "  scale {}: {}", scale, stat)?;
        }
        Ok(())
    }
}
