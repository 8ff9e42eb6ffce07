//! LeapMotion hand source (feature = "leap").
//!
//! A LeapMotion controller tracks hands itself, so there is no separate
//! camera/detector split here: every tracking frame is converted straight
//! into a [`HandObservation`]. Joint positions arrive in millimetres and are
//! converted to metres, which puts a comfortable fingertip spread (5–30 cm)
//! inside the default 0.05–0.3 operating range.
//!
//! Requires the LeapC shared library installed.

use std::sync::mpsc::Sender;

use hand_scale::{Hand, HandObservation, Landmark, LANDMARK_COUNT};
use leaprs::*;

use crate::detection::{CaptureError, DetectionEvent, DetectorOptions, HandSource};

const MM_PER_UNIT: f32 = 1000.0;

/// Hand source backed by a real LeapMotion controller.
pub struct LeapHandSource {
    pub options: DetectorOptions,
}

impl HandSource for LeapHandSource {
    fn run(self: Box<Self>, tx: Sender<DetectionEvent>) {
        let mut connection = match open_connection() {
            Ok(c) => c,
            Err(e) => {
                log::error!("{}", e);
                let _ = tx.send(DetectionEvent::CaptureUnavailable(e.to_string()));
                return;
            }
        };
        if tx.send(DetectionEvent::Started).is_err() { return; }

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(e) => {
                    log::warn!("leap poll failed: {:?}", e);
                    if tx.send(DetectionEvent::Failed(format!("{:?}", e))).is_err() { return; }
                    continue;
                }
            };

            if let Event::Tracking(frame) = msg.event() {
                let hands: Vec<Hand> = frame.hands()
                    .take(self.options.max_hands)
                    .map(|h| convert_hand(&h))
                    .collect();
                if tx.send(DetectionEvent::Observation(HandObservation::new(hands))).is_err() {
                    return;
                }
            }
        }
    }
}

fn open_connection() -> Result<Connection, CaptureError> {
    let mut connection = Connection::create(ConnectionConfig::default())
        .map_err(|e| CaptureError::Unavailable(format!("LeapC connection: {:?}", e)))?;
    connection.open()
        .map_err(|e| CaptureError::Unavailable(format!("LeapMotion device: {:?}", e)))?;
    Ok(connection)
}

fn to_landmark(x: f32, y: f32, z: f32) -> Landmark {
    Landmark::new(x / MM_PER_UNIT, y / MM_PER_UNIT, z / MM_PER_UNIT)
}

/// Lay the Leap skeleton out in the 21-slot order: palm for the wrist, then
/// per finger the knuckle, two interior joints and the tip.
fn convert_hand(hand: &leaprs::Hand) -> Hand {
    let palm = hand.palm().position();
    let mut landmarks = [to_landmark(palm.x, palm.y, palm.z); LANDMARK_COUNT];

    for (f, digit) in hand.digits().take(5).enumerate() {
        let joints = [
            digit.metacarpal().next_joint(),
            digit.proximal().next_joint(),
            digit.intermediate().next_joint(),
            digit.distal().next_joint(),
        ];
        for (j, p) in joints.iter().enumerate() {
            landmarks[1 + f * 4 + j] = to_landmark(p.x, p.y, p.z);
        }
    }
    Hand::new(landmarks)
}
