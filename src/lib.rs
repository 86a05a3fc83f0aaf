//! # Multiscale Profiles and Noise Levels
//!
//! Estimation of the noise level of a digital measurement site from its
//! multiscale profile.
//!
//! Digital lengths measured at one site (a contour point, a surface element)
//! are collected at a sequence of increasing observation scales. In log-log
//! space, noise-free data follows a power law whose slope stays within a known
//! band, whereas noise makes the first scales behave erratically. The first
//! scale from which the profile slope stabilizes is the *noise level* of the
//! site.
//!
//! ## Key Features
//!
//! - **Scale profiles**: per-scale accumulation of samples with mean, max, min
//!   or median aggregation
//! - **Meaningful scales**: detection of maximal runs of scales whose log-log
//!   slope lies in a configurable band
//! - **Slope estimation**: least-squares slope over the first meaningful
//!   interval, with a full-range fallback
//! - **Noise levels**: plain and lower-bounded variants, the latter rejecting
//!   implausibly small values under a power-law floor
//! - **Persistence**: versioned, lossless encoding (feature `serde`)
//!
//! ## Quick Start
//!
//! ```rust
//! use scale_profile::{LowerBound, MeaningfulScaleConfig, ScaleProfile};
//!
//! fn main() -> Result<(), scale_profile::ScaleProfileError> {
//!     let mut profile = ScaleProfile::new();
//!     profile.init([1.0, 2.0, 3.0, 4.0, 5.0], false)?;
//!
//!     // Lengths are flat up to scale 2, then decrease like 1/scale.
//!     for (idx, length) in [1.0, 1.0, 2.0 / 3.0, 0.5, 0.4].into_iter().enumerate() {
//!         profile.add_value(idx, length)?;
//!     }
//!
//!     let config = MeaningfulScaleConfig::default();
//!     assert_eq!(profile.noise_level(&config)?, 2.0);
//!
//!     let estimate = profile.slope_from_meaningful_scales(&config)?;
//!     assert!(estimate.meaningful);
//!     assert!((estimate.slope + 1.0).abs() < 1e-9);
//!
//!     let level = profile.lower_bounded_noise_level(&config, &LowerBound::digital_contour())?;
//!     assert_eq!(level, 2.0);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! [`ScaleProfile`] owns the scales and one [`Statistic`] per scale and is
//! the entry point for all queries. The analysis steps are also available as
//! free functions over raw profile points in [`slopes`] and [`noise`], for
//! callers that build profiles themselves.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod errors;
pub mod math_utils;
pub mod noise;
pub mod profile;
#[cfg(feature = "serde")]
pub mod serialization;
pub mod slopes;
pub mod statistic;

pub use config::{LowerBound, MeaningfulScaleConfig, ProfileMode};
pub use errors::{ScaleProfileError, ScaleResult};
pub use math_utils::{ols_regression, LinearFit};
pub use noise::{
    lower_bounded_noise_level_from_profile, noise_level_from_profile, slope_from_intervals,
    SlopeEstimate, NO_NOISE_LEVEL,
};
pub use profile::ScaleProfile;
#[cfg(feature = "serde")]
pub use serialization::PROFILE_FORMAT_VERSION;
pub use slopes::{finite_difference_slopes, meaningful_intervals, ScaleInterval};
pub use statistic::Statistic;
