//! Incremental statistic accumulator.
//!
//! A [`Statistic`] summarizes the samples measured at one scale: running
//! count, Welford mean and squared-deviation sum, extrema, and optionally the
//! raw samples so
//! that a median can be computed. Retaining samples costs memory
//! proportional to the number of samples, so it is opt-in and can be frozen
//! with [`Statistic::terminate`], which caches the median and releases the
//! samples.

use crate::math_utils::median;
use std::fmt;
use std::ops::AddAssign;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Running aggregate of the samples observed at one scale.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Statistic {
    count: usize,
    mean: f64,
    /// Sum of squared deviations from the running mean
    m2: f64,
    min: Option<f64>,
    max: Option<f64>,
    store_samples: bool,
    samples: Vec<f64>,
    /// Median frozen by `terminate`. Never recomputed afterwards.
    frozen_median: Option<f64>,
}

impl Statistic {
    /// Creates an empty accumulator, retaining raw samples if `store_samples` is set.
    pub fn new(store_samples: bool) -> Self {
        Self {
            store_samples,
            ..Self::default()
        }
    }

    /// Adds one sample.
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
        if self.store_samples {
            self.samples.push(value);
        }
    }

    /// Merges the samples summarized by `other` into `self`.
    ///
    /// Raw samples of `other` are appended only when `self` retains samples.
    /// A frozen median on `self` is kept as is.
    pub fn merge(&mut self, other: &Statistic) {
        if other.count == 0 {
            return;
        }
        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        let weight = other.count as f64 / count as f64;
        self.mean += delta * weight;
        self.m2 += other.m2 + delta * delta * self.count as f64 * weight;
        self.count = count;
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        if self.store_samples {
            if other.samples.len() < other.count {
                log::warn!(
                    "Merging a statistic of {} samples with only {} retained; median will be partial",
                    other.count,
                    other.samples.len()
                );
            }
            self.samples.extend_from_slice(&other.samples);
        }
    }

    /// Number of samples added so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Sum of all samples, recovered as `mean * count`.
    pub fn sum(&self) -> f64 {
        self.mean * self.count as f64
    }

    /// Arithmetic mean, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.mean)
        }
    }

    /// Population variance, `None` when empty.
    pub fn variance(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.m2 / self.count as f64)
        }
    }

    /// Sample variance with Bessel's correction, `None` with fewer than two samples.
    pub fn unbiased_variance(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        Some(self.m2 / (self.count - 1) as f64)
    }

    /// Smallest sample.
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    /// Largest sample.
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Median of the samples.
    ///
    /// Returns the frozen median if [`terminate`](Self::terminate) has been
    /// called, otherwise computes it from the retained samples. `None` when
    /// neither is available.
    pub fn median(&self) -> Option<f64> {
        match self.frozen_median {
            Some(m) => Some(m),
            None if self.store_samples => median(&self.samples),
            None => None,
        }
    }

    /// Whether raw samples are currently retained.
    pub fn stores_samples(&self) -> bool {
        self.store_samples
    }

    /// Retained raw samples, in insertion order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Freezes the median and releases the retained samples.
    ///
    /// Later samples update count, mean and extrema but not the median.
    /// Calling this twice is a no-op the second time.
    pub fn terminate(&mut self) {
        if !self.store_samples {
            return;
        }
        if self.samples.is_empty() {
            log::warn!("Freezing a statistic with no retained samples; median stays undefined");
        }
        self.frozen_median = median(&self.samples);
        self.samples = Vec::new();
        self.store_samples = false;
    }

    /// Every floating point value that is persisted with the statistic.
    #[cfg(feature = "serde")]
    pub(crate) fn stored_values(&self) -> impl Iterator<Item = f64> + '_ {
        [self.mean, self.m2]
            .into_iter()
            .chain(self.min)
            .chain(self.max)
            .chain(self.frozen_median)
            .chain(self.samples.iter().copied())
    }

    /// Resets to an empty accumulator, keeping the retention flag.
    pub fn clear(&mut self) {
        *self = Self::new(self.store_samples);
    }
}

impl AddAssign<&Statistic> for Statistic {
    fn add_assign(&mut self, other: &Statistic) {
        self.merge(other);
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.mean(), self.min, self.max) {
            (Some(mean), Some(min), Some(max)) => {
                write!(f, "[Statistic n={} mean={:.6} min={} max={}", self.count, mean, min, max)?;
                if let Some(median) = self.median() {
                    write!(f, " median={}", median)?;
                }
                write!(f, "]")
            }
            _ => write!(f, "[Statistic n=0]"),
        }
    }
}
