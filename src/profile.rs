//! Distance-attenuation profiles
//!
//! A profile is pure data: the falloff model plus its parameters. Gain
//! evaluation follows the Web Audio panner formulas so graph implementations
//! and tests can verify what a sink would actually do with the parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Falloff function mapping listener-to-source distance to attenuation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceModel {
    /// Linear ramp from full gain at `ref_distance` to silence at `max_distance`
    Linear,
    /// Inverse falloff: `ref / (ref + rolloff * (d - ref))`
    #[default]
    Inverse,
    /// Exponential falloff: `(d / ref) ^ -rolloff`
    Exponential,
}

impl DistanceModel {
    /// Evaluate the gain this model produces at `distance`
    ///
    /// Distances below `ref_distance` are clamped to full gain; the linear
    /// model additionally clamps to `max_distance`.
    pub fn gain(self, distance: f32, ref_distance: f32, max_distance: f32, rolloff: f32) -> f32 {
        match self {
            DistanceModel::Linear => {
                let range = max_distance - ref_distance;
                if range <= 0.0 {
                    return 1.0;
                }
                let d = distance.clamp(ref_distance, max_distance);
                (1.0 - rolloff * (d - ref_distance) / range).max(0.0)
            }
            DistanceModel::Inverse => {
                let d = distance.max(ref_distance);
                ref_distance / (ref_distance + rolloff * (d - ref_distance))
            }
            DistanceModel::Exponential => {
                let d = distance.max(ref_distance);
                (d / ref_distance).powf(-rolloff)
            }
        }
    }
}

/// Distance-attenuation parameters for one spatial sink
///
/// Value object with validation and nothing else; applying it to an actual
/// sink is the sink manager's job. Defaults mirror the public configuration
/// schema (positional, inverse model, max 10000, ref 1, rolloff 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AttenuationProfile {
    /// Whether the sink is positional (3D panned) or plain playback
    ///
    /// Fixed at sink creation; profile re-application after creation leaves
    /// positionality untouched.
    pub positional: bool,
    /// Falloff model
    pub distance_model: DistanceModel,
    /// Distance beyond which gain no longer decreases (linear model clamps here)
    pub max_distance: f32,
    /// Distance at which falloff begins; full gain inside it
    pub ref_distance: f32,
    /// Falloff steepness
    pub rolloff_factor: f32,
}

impl Default for AttenuationProfile {
    fn default() -> Self {
        Self {
            positional: true,
            distance_model: DistanceModel::Inverse,
            max_distance: 10_000.0,
            ref_distance: 1.0,
            rolloff_factor: 1.0,
        }
    }
}

impl AttenuationProfile {
    /// The fixed profile applied on top of user configuration at bind time
    ///
    /// The upstream behavior this crate reproduces overwrote configured
    /// attenuation with these literals whenever a sink came up. Here that is
    /// an explicit layer: `BinderConfig::effective_profile` defaults to this
    /// value and can be set to `None` to let the configured profile stand.
    pub const fn bind_time_override() -> Self {
        Self {
            positional: true,
            distance_model: DistanceModel::Exponential,
            max_distance: 8.0,
            ref_distance: 2.0,
            rolloff_factor: 3.0,
        }
    }

    /// Check the profile invariant
    ///
    /// `ref_distance > 0`, `max_distance >= ref_distance`,
    /// `rolloff_factor >= 0`, and every parameter finite.
    pub fn validate(&self) -> Result<()> {
        if !self.ref_distance.is_finite() || self.ref_distance <= 0.0 {
            return Err(Error::InvalidProfile {
                reason: format!("ref_distance must be > 0, got {}", self.ref_distance),
            });
        }
        if !self.max_distance.is_finite() || self.max_distance < self.ref_distance {
            return Err(Error::InvalidProfile {
                reason: format!(
                    "max_distance must be >= ref_distance ({}), got {}",
                    self.ref_distance, self.max_distance
                ),
            });
        }
        if !self.rolloff_factor.is_finite() || self.rolloff_factor < 0.0 {
            return Err(Error::InvalidProfile {
                reason: format!("rolloff_factor must be >= 0, got {}", self.rolloff_factor),
            });
        }
        Ok(())
    }

    /// Evaluate this profile's gain at `distance`
    pub fn gain_at(&self, distance: f32) -> f32 {
        self.distance_model.gain(
            distance,
            self.ref_distance,
            self.max_distance,
            self.rolloff_factor,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_gain_ramps_to_silence() {
        let model = DistanceModel::Linear;
        assert!((model.gain(0.0, 1.0, 10.0, 1.0) - 1.0).abs() < 1e-6);
        assert!((model.gain(1.0, 1.0, 10.0, 1.0) - 1.0).abs() < 1e-6);
        assert!((model.gain(5.5, 1.0, 10.0, 1.0) - 0.5).abs() < 1e-6);
        assert!((model.gain(10.0, 1.0, 10.0, 1.0)).abs() < 1e-6);
        // past max_distance stays silent, never negative
        assert!((model.gain(50.0, 1.0, 10.0, 1.0)).abs() < 1e-6);
    }

    #[test]
    fn inverse_gain_halves_at_double_distance() {
        let model = DistanceModel::Inverse;
        assert!((model.gain(1.0, 1.0, 100.0, 1.0) - 1.0).abs() < 1e-6);
        assert!((model.gain(2.0, 1.0, 100.0, 1.0) - 0.5).abs() < 1e-6);
        assert!((model.gain(10.0, 1.0, 100.0, 1.0) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn exponential_gain_follows_power_law() {
        let model = DistanceModel::Exponential;
        assert!((model.gain(2.0, 2.0, 8.0, 3.0) - 1.0).abs() < 1e-6);
        assert!((model.gain(4.0, 2.0, 8.0, 3.0) - 0.125).abs() < 1e-6);
    }

    #[test]
    fn gain_clamps_below_ref_distance() {
        for model in [
            DistanceModel::Linear,
            DistanceModel::Inverse,
            DistanceModel::Exponential,
        ] {
            assert!((model.gain(0.01, 2.0, 8.0, 3.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn default_profile_matches_schema() {
        let p = AttenuationProfile::default();
        assert!(p.positional);
        assert_eq!(p.distance_model, DistanceModel::Inverse);
        assert_eq!(p.max_distance, 10_000.0);
        assert_eq!(p.ref_distance, 1.0);
        assert_eq!(p.rolloff_factor, 1.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn bind_time_override_is_valid() {
        let p = AttenuationProfile::bind_time_override();
        assert_eq!(p.distance_model, DistanceModel::Exponential);
        assert_eq!(p.max_distance, 8.0);
        assert_eq!(p.ref_distance, 2.0);
        assert_eq!(p.rolloff_factor, 3.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_parameters() {
        let mut p = AttenuationProfile {
            ref_distance: 0.0,
            ..Default::default()
        };
        assert!(p.validate().is_err());

        p.ref_distance = 5.0;
        p.max_distance = 4.0;
        assert!(p.validate().is_err());

        p.max_distance = 10.0;
        p.rolloff_factor = -1.0;
        assert!(p.validate().is_err());

        p.rolloff_factor = f32::NAN;
        assert!(p.validate().is_err());
    }

    #[test]
    fn distance_model_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DistanceModel::Exponential).unwrap(),
            "\"exponential\""
        );
        let parsed: DistanceModel = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(parsed, DistanceModel::Linear);
    }
}
