//! Tunable constants of the distance → scale mapping.
//!
//! The defaults are empirical (they were picked by hand against a webcam),
//! so they stay configurable rather than derived.

use thiserror::Error;

use crate::HandLandmark;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("distance range [{0}, {1}] is empty or inverted")]
    DistanceRange(f32, f32),
    #[error("scale range [{0}, {1}] is inverted or non-positive")]
    ScaleRange(f32, f32),
    #[error("clamp bounds [{0}, {1}] are inverted or non-positive")]
    Clamp(f32, f32),
    #[error("neutral scale {0} lies outside the clamp bounds")]
    Neutral(f32),
    #[error("single-hand decay {0} must lie in (0, 1]")]
    Decay(f32),
}

/// Every constant the estimator uses.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleConfig {
    /// Fingertip distance mapped to `min_scale`.
    pub min_distance: f32,
    /// Fingertip distance mapped to `max_scale`.
    pub max_distance: f32,
    pub min_scale:    f32,
    pub max_scale:    f32,
    /// Multiplier applied per one-hand detection.
    pub single_hand_decay: f32,
    /// Hard lower bound on the published scale.
    pub clamp_min:    f32,
    /// Hard upper bound on the published scale.
    pub clamp_max:    f32,
    /// Initial value, and the value for "no hands" and reset.
    pub neutral:      f32,
    /// Landmark whose distance drives the mapping.
    pub fingertip:    HandLandmark,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        ScaleConfig {
            min_distance:      0.05,
            max_distance:      0.3,
            min_scale:         0.5,
            max_scale:         2.0,
            single_hand_decay: 0.98,
            clamp_min:         0.1,
            clamp_max:         3.0,
            neutral:           1.0,
            fingertip:         HandLandmark::IndexFingerTip,
        }
    }
}

impl ScaleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_distance < self.max_distance) {
            return Err(ConfigError::DistanceRange(self.min_distance, self.max_distance));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(ConfigError::ScaleRange(self.min_scale, self.max_scale));
        }
        if !(self.clamp_min > 0.0 && self.clamp_min <= self.clamp_max) {
            return Err(ConfigError::Clamp(self.clamp_min, self.clamp_max));
        }
        if !(self.clamp_min..=self.clamp_max).contains(&self.neutral) {
            return Err(ConfigError::Neutral(self.neutral));
        }
        if !(self.single_hand_decay > 0.0 && self.single_hand_decay <= 1.0) {
            return Err(ConfigError::Decay(self.single_hand_decay));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ScaleConfig::default().validate(), Ok(()));
    }

    #[test]
    fn inverted_ranges_rejected() {
        let cfg = ScaleConfig { min_distance: 0.3, max_distance: 0.05, ..Default::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::DistanceRange(0.3, 0.05)));

        let cfg = ScaleConfig { min_scale: 2.0, max_scale: 0.5, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::ScaleRange(..))));

        let cfg = ScaleConfig { clamp_min: 3.0, clamp_max: 0.1, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::Clamp(..))));
    }

    #[test]
    fn decay_and_neutral_checked() {
        let cfg = ScaleConfig { single_hand_decay: 1.5, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::Decay(_))));

        let cfg = ScaleConfig { neutral: 5.0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::Neutral(_))));

        let cfg = ScaleConfig { min_distance: f32::NAN, ..Default::default() };
        assert!(cfg.validate().is_err());
    }
}
