//! Versioned persistence of scale profiles.
//!
//! A profile is stored as a JSON document holding a format version, the
//! aggregation mode, the scale sequence and one statistic per scale,
//! including retained samples and frozen medians. The layout itself is not a
//! contract; only lossless round-trips are.

use crate::config::ProfileMode;
use crate::errors::{ScaleProfileError, ScaleResult};
use crate::profile::ScaleProfile;
use crate::statistic::Statistic;
use serde::{Deserialize, Serialize};

/// Format version written by [`ScaleProfile::encode`]
pub const PROFILE_FORMAT_VERSION: u32 = 1;

const FORMAT: &str = "json";

#[derive(Serialize)]
struct ProfileBlobRef<'a> {
    version: u32,
    mode: ProfileMode,
    scales: &'a [f64],
    stats: &'a [Statistic],
}

#[derive(Deserialize)]
struct ProfileBlob {
    version: u32,
    mode: ProfileMode,
    scales: Vec<f64>,
    stats: Vec<Statistic>,
}

impl ScaleProfile {
    /// Encodes the profile into an opaque versioned blob.
    ///
    /// # Errors
    /// `SerializationError` if a scale or a statistic value is not finite,
    /// which the format cannot represent.
    pub fn encode(&self) -> ScaleResult<Vec<u8>> {
        if let Some(idx) = self
            .statistics()
            .iter()
            .position(|stat| !stat.stored_values().all(f64::is_finite))
        {
            return Err(ScaleProfileError::SerializationError {
                format: FORMAT.to_string(),
                reason: format!("statistic at scale index {} holds a non-finite value", idx),
            });
        }
        if self.scales().iter().any(|s| !s.is_finite()) {
            return Err(ScaleProfileError::SerializationError {
                format: FORMAT.to_string(),
                reason: "non-finite scale".to_string(),
            });
        }
        let blob = ProfileBlobRef {
            version: PROFILE_FORMAT_VERSION,
            mode: self.mode(),
            scales: self.scales(),
            stats: self.statistics(),
        };
        serde_json::to_vec(&blob).map_err(serialization_error)
    }

    /// Decodes a blob produced by [`encode`](Self::encode).
    ///
    /// # Errors
    /// * `UnsupportedVersion` for a blob of another format version
    /// * `SerializationError` for malformed input
    /// * `InvalidArgument` if scales and statistics are not index-aligned
    pub fn decode(bytes: &[u8]) -> ScaleResult<Self> {
        let blob: ProfileBlob = serde_json::from_slice(bytes).map_err(serialization_error)?;
        if blob.version != PROFILE_FORMAT_VERSION {
            return Err(ScaleProfileError::UnsupportedVersion {
                found: blob.version,
                supported: PROFILE_FORMAT_VERSION,
            });
        }
        ScaleProfile::from_parts(blob.scales, blob.stats, blob.mode)
    }
}

fn serialization_error(err: serde_json::Error) -> ScaleProfileError {
    ScaleProfileError::SerializationError {
        format: FORMAT.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_keeps_samples_and_mode() {
        let mut profile = ScaleProfile::with_mode(ProfileMode::Median);
        profile.init([1.0, 2.5, 4.0], true).unwrap();
        for (idx, v) in [(0, 0.1), (0, 0.7), (1, 1.0 / 3.0), (2, 2.0)] {
            profile.add_value(idx, v).unwrap();
        }

        let decoded = ScaleProfile::decode(&profile.encode().unwrap()).unwrap();
        assert_eq!(decoded.mode(), ProfileMode::Median);
        assert_eq!(decoded.scales(), profile.scales());
        assert_eq!(decoded.statistics(), profile.statistics());
        assert!(decoded.stores_samples());
        assert_eq!(decoded.statistic(0).unwrap().samples(), &[0.1, 0.7]);
    }

    #[test]
    fn test_roundtrip_of_huge_samples() {
        let mut profile = ScaleProfile::new();
        profile.init_with_count(3, true).unwrap();
        profile.add_value(0, 1e200).unwrap();
        profile.add_value(0, 1e200).unwrap();
        profile.add_value(1, 5e199).unwrap();
        profile.add_value(2, 1e-200).unwrap();

        let decoded = ScaleProfile::decode(&profile.encode().unwrap()).unwrap();
        assert_eq!(decoded.statistics(), profile.statistics());
        assert_eq!(decoded.profile().unwrap(), profile.profile().unwrap());
    }

    #[test]
    fn test_encode_rejects_overflowed_statistic() {
        // spread of 2e200 overflows the squared-deviation sum
        let mut stat = Statistic::new(false);
        stat.add(1e200);
        stat.add(-1e200);

        let mut profile = ScaleProfile::new();
        profile.init_with_count(2, false).unwrap();
        profile.add_statistic(1, &stat).unwrap();
        assert!(matches!(
            profile.encode(),
            Err(ScaleProfileError::SerializationError { .. })
        ));
    }

    #[test]
    fn test_roundtrip_of_invalid_profile() {
        let profile = ScaleProfile::new();
        let decoded = ScaleProfile::decode(&profile.encode().unwrap()).unwrap();
        assert!(!decoded.is_valid());
    }

    #[test]
    fn test_decode_rejects_other_versions() {
        let bytes = br#"{"version":2,"mode":"Mean","scales":[],"stats":[]}"#;
        assert!(matches!(
            ScaleProfile::decode(bytes),
            Err(ScaleProfileError::UnsupportedVersion { found: 2, supported: 1 })
        ));
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        assert!(matches!(
            ScaleProfile::decode(b"not a profile"),
            Err(ScaleProfileError::SerializationError { .. })
        ));
        let misaligned = br#"{"version":1,"mode":"Mean","scales":[1.0],"stats":[]}"#;
        assert!(matches!(
            ScaleProfile::decode(misaligned),
            Err(ScaleProfileError::InvalidArgument { .. })
        ));
    }
}
