//! # hand_scale
//!
//! Turns an irregular stream of hand-landmark detections into one bounded
//! scale factor.
//!
//! | Hands in the observation | Effect on the scale |
//! |---|---|
//! | none | snaps to neutral (1.0) |
//! | one | multiplied by the decay factor (0.98) |
//! | two or more | fingertip distance of the first two, mapped linearly from 0.05–0.3 onto 0.5–2.0 |
//!
//! Whatever the branch, the result is clamped to `[0.1, 3.0]`.
//!
//! ```rust
//! use hand_scale::{GestureScaleEstimator, HandObservation, Hand, ScaleConfig};
//!
//! let mut est = GestureScaleEstimator::new(ScaleConfig::default()).unwrap();
//! let obs = HandObservation::new(vec![
//!     Hand::with_fingertip_at([0.20, 0.5, 0.0]),
//!     Hand::with_fingertip_at([0.80, 0.5, 0.0]),
//! ]);
//! assert_eq!(est.update(&obs), 2.0);
//! ```

pub mod config;
pub mod estimator;
pub mod landmark;

pub use config::{ConfigError, ScaleConfig};
pub use estimator::{GestureScaleEstimator, ScaleUpdate};
pub use landmark::{Hand, HandLandmark, HandObservation, Landmark, LANDMARK_COUNT};
