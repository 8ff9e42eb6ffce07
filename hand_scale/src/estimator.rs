//! The scale state machine.
//!
//! [`GestureScaleEstimator::update`] runs once per detection result, not once
//! per rendered frame. Readers pick up whatever [`current_scale`] holds at the
//! time, so a slow detector means several frames share one value.
//!
//! [`current_scale`]: GestureScaleEstimator::current_scale

use crate::{ConfigError, HandObservation, ScaleConfig};

/// Which branch the last update took.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleUpdate {
    /// No hands: snapped to neutral.
    Released,
    /// One hand: decayed.
    Decayed,
    /// Two or more hands, with the measured fingertip distance.
    Paired { distance: f32 },
}

/// Owns the one scale value the renderer reads.
#[derive(Clone, Debug)]
pub struct GestureScaleEstimator {
    config:      ScaleConfig,
    scale:       f32,
    last_update: Option<ScaleUpdate>,
}

impl GestureScaleEstimator {
    pub fn new(config: ScaleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(GestureScaleEstimator {
            scale:       config.neutral,
            config,
            last_update: None,
        })
    }

    /// Fold one detection result into the scale and return the new value.
    pub fn update(&mut self, observation: &HandObservation) -> f32 {
        let branch = match observation.first_pair() {
            Some((first, second)) => {
                let tip = self.config.fingertip;
                let distance = first.landmark(tip).distance(second.landmark(tip));
                self.scale = self.scale_for_distance(distance);
                ScaleUpdate::Paired { distance }
            }
            None if observation.hand_count() == 1 => {
                self.scale *= self.config.single_hand_decay;
                ScaleUpdate::Decayed
            }
            None => {
                self.scale = self.config.neutral;
                ScaleUpdate::Released
            }
        };

        self.scale = self.clamp(self.scale);
        self.last_update = Some(branch);
        log::trace!("scale {:.3} after {:?}", self.scale, branch);
        self.scale
    }

    /// Linear map of a fingertip distance onto the scale range. Distances
    /// outside the operating range saturate at the range ends.
    pub fn scale_for_distance(&self, distance: f32) -> f32 {
        let c = &self.config;
        let ratio = ((distance - c.min_distance) / (c.max_distance - c.min_distance))
            .clamp(0.0, 1.0);
        // NaN distances (a detector glitch) count as "hands together".
        let ratio = if ratio.is_nan() { 0.0 } else { ratio };
        c.min_scale + (c.max_scale - c.min_scale) * ratio
    }

    /// External "reset" action: back to neutral, whatever the hands are doing.
    pub fn reset(&mut self) {
        self.scale = self.config.neutral;
        self.last_update = None;
    }

    pub fn current_scale(&self) -> f32 { self.scale }

    pub fn last_update(&self) -> Option<ScaleUpdate> { self.last_update }

    pub fn config(&self) -> &ScaleConfig { &self.config }

    fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.config.clamp_min, self.config.clamp_max)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hand;
    use approx::assert_relative_eq;

    fn estimator() -> GestureScaleEstimator {
        GestureScaleEstimator::new(ScaleConfig::default()).unwrap()
    }

    /// Two hands whose index fingertips are `d` apart along x.
    fn pair(d: f32) -> HandObservation {
        HandObservation::new(vec![
            Hand::with_fingertip_at([0.0, 0.5, 0.0]),
            Hand::with_fingertip_at([d, 0.5, 0.0]),
        ])
    }

    fn one_hand() -> HandObservation {
        HandObservation::new(vec![Hand::with_fingertip_at([0.5, 0.5, 0.0])])
    }

    #[test]
    fn starts_neutral() {
        assert_eq!(estimator().current_scale(), 1.0);
        assert_eq!(estimator().last_update(), None);
    }

    #[test]
    fn close_hands_give_min_scale() {
        let mut est = estimator();
        assert_eq!(est.update(&pair(0.05)), 0.5);
        assert_eq!(est.update(&pair(0.01)), 0.5);
        assert_eq!(est.update(&pair(0.0)), 0.5);
    }

    #[test]
    fn far_hands_give_max_scale() {
        let mut est = estimator();
        assert_eq!(est.update(&pair(0.3)), 2.0);
        assert_eq!(est.update(&pair(0.9)), 2.0);
    }

    #[test]
    fn midpoint_maps_linearly() {
        let mut est = estimator();
        assert_relative_eq!(est.update(&pair(0.175)), 1.25, epsilon = 1e-5);
        assert_relative_eq!(est.scale_for_distance(0.175), 1.25, epsilon = 1e-5);
    }

    #[test]
    fn distance_is_three_dimensional() {
        let mut est = estimator();
        let obs = HandObservation::new(vec![
            Hand::with_fingertip_at([0.0, 0.0, 0.0]),
            Hand::with_fingertip_at([0.0, 0.0, 0.175]),
        ]);
        assert_relative_eq!(est.update(&obs), 1.25, epsilon = 1e-5);
        match est.last_update() {
            Some(ScaleUpdate::Paired { distance }) => assert_relative_eq!(distance, 0.175, epsilon = 1e-6),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn only_first_two_hands_count() {
        let mut est = estimator();
        let obs = HandObservation::new(vec![
            Hand::with_fingertip_at([0.0, 0.0, 0.0]),
            Hand::with_fingertip_at([0.01, 0.0, 0.0]),
            Hand::with_fingertip_at([0.9, 0.0, 0.0]),
        ]);
        assert_eq!(est.update(&obs), 0.5);
    }

    #[test]
    fn no_hands_snaps_to_neutral() {
        let mut est = estimator();
        est.update(&pair(0.3));
        assert_eq!(est.update(&HandObservation::empty()), 1.0);
        est.update(&pair(0.0));
        assert_eq!(est.update(&HandObservation::empty()), 1.0);
        assert_eq!(est.last_update(), Some(ScaleUpdate::Released));
    }

    #[test]
    fn one_hand_decays_monotonically_to_floor() {
        let mut est = estimator();
        est.update(&pair(0.3));
        let mut prev = est.current_scale();
        let mut reached_floor = false;
        for _ in 0..500 {
            let s = est.update(&one_hand());
            assert!(s >= 0.1);
            if prev > 0.1 {
                assert!(s < prev, "{s} !< {prev}");
            } else {
                assert_eq!(s, 0.1);
                reached_floor = true;
            }
            prev = s;
        }
        assert!(reached_floor);
        assert_eq!(est.last_update(), Some(ScaleUpdate::Decayed));
    }

    #[test]
    fn one_hand_single_step_is_decay_factor() {
        let mut est = estimator();
        assert_relative_eq!(est.update(&one_hand()), 0.98, epsilon = 1e-6);
    }

    #[test]
    fn adversarial_inputs_stay_bounded() {
        let mut est = estimator();
        let inputs = [
            pair(f32::MAX), pair(-5.0), pair(f32::INFINITY), pair(f32::NAN),
            one_hand(), HandObservation::empty(), pair(1e-9), one_hand(),
        ];
        for obs in inputs.iter().cycle().take(200) {
            let s = est.update(obs);
            assert!((0.1..=3.0).contains(&s), "out of bounds: {s}");
        }
    }

    #[test]
    fn custom_constants_are_honoured() {
        let cfg = ScaleConfig {
            min_distance: 0.1,
            max_distance: 0.2,
            min_scale:    1.0,
            max_scale:    3.0,
            single_hand_decay: 0.5,
            ..Default::default()
        };
        let mut est = GestureScaleEstimator::new(cfg).unwrap();
        assert_relative_eq!(est.update(&pair(0.15)), 2.0, epsilon = 1e-5);
        assert_relative_eq!(est.update(&one_hand()), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn reset_returns_to_neutral() {
        let mut est = estimator();
        est.update(&pair(0.3));
        est.reset();
        assert_eq!(est.current_scale(), 1.0);
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = ScaleConfig { max_distance: 0.0, ..Default::default() };
        assert!(GestureScaleEstimator::new(cfg).is_err());
    }
}
