//! Hand-landmark detection results.
//!
//! A detector reports each hand as 21 landmarks in a fixed order
//! (wrist, then four joints per finger from thumb to pinky), in normalized
//! image coordinates: `x`, `y` in `[0, 1]` across the frame, `z` a relative
//! depth on roughly the same scale.

use nalgebra::Vector3;

/// Landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Named landmark slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandLandmark {
    Wrist            = 0,
    ThumbCmc         = 1,
    ThumbMcp         = 2,
    ThumbIp          = 3,
    ThumbTip         = 4,
    IndexFingerMcp   = 5,
    IndexFingerPip   = 6,
    IndexFingerDip   = 7,
    IndexFingerTip   = 8,
    MiddleFingerMcp  = 9,
    MiddleFingerPip  = 10,
    MiddleFingerDip  = 11,
    MiddleFingerTip  = 12,
    RingFingerMcp    = 13,
    RingFingerPip    = 14,
    RingFingerDip    = 15,
    RingFingerTip    = 16,
    PinkyMcp         = 17,
    PinkyPip         = 18,
    PinkyDip         = 19,
    PinkyTip         = 20,
}

impl HandLandmark {
    pub fn index(self) -> usize { self as usize }
}

/// One detected point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self { Landmark { x, y, z } }

    pub fn to_vector(self) -> Vector3<f32> { Vector3::new(self.x, self.y, self.z) }

    /// Euclidean distance in landmark space.
    pub fn distance(self, other: Landmark) -> f32 {
        (self.to_vector() - other.to_vector()).norm()
    }
}

impl From<[f32; 3]> for Landmark {
    fn from([x, y, z]: [f32; 3]) -> Self { Landmark { x, y, z } }
}

/// One hand: all 21 landmarks in detector order.
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl Hand {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self { Hand { landmarks } }

    /// A hand whose every landmark sits at `p`. Handy for simulation and tests,
    /// where only the fingertip matters.
    pub fn with_fingertip_at(p: [f32; 3]) -> Self {
        Hand { landmarks: [Landmark::from(p); LANDMARK_COUNT] }
    }

    pub fn landmark(&self, which: HandLandmark) -> Landmark {
        self.landmarks[which.index()]
    }
}

/// Everything one detection call reported. Read once, then dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandObservation {
    pub hands: Vec<Hand>,
}

impl HandObservation {
    pub fn new(hands: Vec<Hand>) -> Self { HandObservation { hands } }

    pub fn empty() -> Self { HandObservation::default() }

    pub fn hand_count(&self) -> usize { self.hands.len() }

    /// The first two hands, in detector order.
    ///
    /// No handedness matching is attempted: which physical hand comes first
    /// may change from one detection to the next.
    pub fn first_pair(&self) -> Option<(&Hand, &Hand)> {
        match self.hands.as_slice() {
            [a, b, ..] => Some((a, b)),
            _          => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn index_tip_is_slot_eight() {
        assert_eq!(HandLandmark::IndexFingerTip.index(), 8);
        assert_eq!(HandLandmark::PinkyTip.index(), LANDMARK_COUNT - 1);
    }

    #[test]
    fn landmark_distance_is_euclidean() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.3, 0.4, 0.0);
        assert_relative_eq!(a.distance(b), 0.5, epsilon = 1e-6);
        assert_relative_eq!(b.distance(a), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn first_pair_needs_two_hands() {
        assert!(HandObservation::empty().first_pair().is_none());
        let one = HandObservation::new(vec![Hand::with_fingertip_at([0.1, 0.1, 0.0])]);
        assert!(one.first_pair().is_none());

        let three = HandObservation::new(vec![
            Hand::with_fingertip_at([0.1, 0.0, 0.0]),
            Hand::with_fingertip_at([0.2, 0.0, 0.0]),
            Hand::with_fingertip_at([0.9, 0.0, 0.0]),
        ]);
        let (a, b) = three.first_pair().unwrap();
        assert_eq!(a.landmark(HandLandmark::IndexFingerTip).x, 0.1);
        assert_eq!(b.landmark(HandLandmark::IndexFingerTip).x, 0.2);
    }
}
