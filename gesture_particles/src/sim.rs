//! Keyboard hand simulation (always available).
//!
//! The visualizer sends [`SimInput`] events here. [`SimCamera`] folds them into
//! a [`SimPose`] and emits that pose as a "frame" at a webcam-like rate;
//! [`SimDetector`] turns a pose into landmark data with the two index
//! fingertips `separation` apart. Together they stand in for a real camera
//! and landmark model behind [`DetectionPipeline`](crate::detection::DetectionPipeline).

use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use hand_scale::{Hand, HandLandmark, HandObservation, Landmark, LANDMARK_COUNT};

use crate::detection::{CaptureError, DetectionError, DetectorOptions, FrameSource, LandmarkDetector};

/// Raw input event from the simulation keys.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Number of hands "in view".
    SetHands(u8),
    /// Move the fingertips apart.
    Widen,
    /// Move the fingertips together.
    Narrow,
}

/// What the simulated camera currently sees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimPose {
    pub hands:      u8,
    /// Fingertip distance in normalized image units.
    pub separation: f32,
}

impl Default for SimPose {
    fn default() -> Self { SimPose { hands: 0, separation: 0.175 } }
}

impl SimPose {
    pub const STEP:           f32 = 0.01;
    pub const MAX_SEPARATION: f32 = 0.6;

    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::SetHands(n) => self.hands = n,
            SimInput::Widen  => self.separation = (self.separation + Self::STEP).min(Self::MAX_SEPARATION),
            SimInput::Narrow => self.separation = (self.separation - Self::STEP).max(0.0),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimCamera
// ════════════════════════════════════════════════════════════════════════════

/// Frame source fed by the visualizer's simulation keys.
pub struct SimCamera {
    rx:             Receiver<SimInput>,
    pose:           SimPose,
    frame_interval: Duration,
}

impl SimCamera {
    /// ~30 frames per second, like a typical webcam.
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimCamera::with_interval(rx, Duration::from_millis(33))
    }

    pub fn with_interval(rx: Receiver<SimInput>, frame_interval: Duration) -> Self {
        SimCamera { rx, pose: SimPose::default(), frame_interval }
    }
}

impl FrameSource for SimCamera {
    type Frame = SimPose;

    fn open(&mut self) -> Result<(), CaptureError> { Ok(()) }

    /// Ends when the visualizer drops its sender (window closed).
    fn next_frame(&mut self) -> Option<SimPose> {
        thread::sleep(self.frame_interval);
        loop {
            match self.rx.try_recv() {
                Ok(input)                       => self.pose.apply(input),
                Err(TryRecvError::Empty)        => return Some(self.pose),
                Err(TryRecvError::Disconnected) => return None,
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimDetector
// ════════════════════════════════════════════════════════════════════════════

/// Places synthetic hands around the image center.
#[derive(Default)]
pub struct SimDetector {
    options: DetectorOptions,
}

impl SimDetector {
    fn hand_at(tip_x: f32) -> Hand {
        // Wrist below the fingertip, remaining joints spread along the finger.
        let mut landmarks = [Landmark::new(tip_x, 0.5, 0.0); LANDMARK_COUNT];
        landmarks[HandLandmark::Wrist.index()] = Landmark::new(tip_x, 0.8, 0.0);
        for (k, slot) in (HandLandmark::IndexFingerMcp.index()..HandLandmark::IndexFingerTip.index()).enumerate() {
            landmarks[slot] = Landmark::new(tip_x, 0.65 - 0.05 * k as f32, 0.0);
        }
        Hand::new(landmarks)
    }
}

impl LandmarkDetector for SimDetector {
    type Frame = SimPose;

    fn configure(&mut self, options: &DetectorOptions) {
        log::info!(
            "simulated detector: max {} hands, complexity {}, confidence {:.2}/{:.2}",
            options.max_hands, options.model_complexity,
            options.min_detection_confidence, options.min_tracking_confidence,
        );
        self.options = options.clone();
    }

    fn detect(&mut self, pose: &SimPose) -> Result<HandObservation, DetectionError> {
        let half = pose.separation / 2.0;
        let hands = match (pose.hands as usize).min(self.options.max_hands) {
            0 => vec![],
            1 => vec![Self::hand_at(0.5)],
            _ => vec![Self::hand_at(0.5 - half), Self::hand_at(0.5 + half)],
        };
        Ok(HandObservation::new(hands))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
