//! Hand detection: camera frames in, [`HandObservation`]s out.
//!
//! The public interface is [`DetectionEvent`] delivered over a `mpsc` channel.
//! The render loop doesn't need to know whether events came from a simulated
//! camera, a LeapMotion controller, or anything else that implements
//! [`HandSource`].
//!
//! [`DetectionPipeline`] is the generic source: it pairs a [`FrameSource`]
//! (the camera) with a [`LandmarkDetector`] and runs them strictly in
//! sequence on its own thread, so there is never more than one detection in
//! flight.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use hand_scale::HandObservation;
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

/// The camera could not be opened. Not retried without a fresh user action.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CaptureError {
    #[error("camera access denied: {0}")]
    Denied(String),
    #[error("no camera available: {0}")]
    Unavailable(String),
}

/// One detection call failed. The next frame is still submitted.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("hand detection failed: {0}")]
pub struct DetectionError(pub String);

// ════════════════════════════════════════════════════════════════════════════
// DetectionEvent
// ════════════════════════════════════════════════════════════════════════════

/// What a hand source reports back to the render loop.
#[derive(Clone, Debug, PartialEq)]
pub enum DetectionEvent {
    /// Camera is live; observations will follow.
    Started,
    /// Result of one detection call (possibly with zero hands).
    Observation(HandObservation),
    /// A single detection call failed.
    Failed(String),
    /// The camera never came up. No further events follow.
    CaptureUnavailable(String),
}

// ════════════════════════════════════════════════════════════════════════════
// Collaborator traits
// ════════════════════════════════════════════════════════════════════════════

/// Detector settings.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorOptions {
    pub max_hands:                usize,
    /// 0 = lite, 1 = full.
    pub model_complexity:         u8,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence:  f32,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        DetectorOptions {
            max_hands:                2,
            model_complexity:         1,
            min_detection_confidence: 0.7,
            min_tracking_confidence:  0.7,
        }
    }
}

/// A live video feed.
pub trait FrameSource: Send + 'static {
    type Frame;

    /// Acquire the device. Called once, before the first frame.
    fn open(&mut self) -> Result<(), CaptureError>;

    /// Block until the next frame is ready; `None` once the feed has ended.
    fn next_frame(&mut self) -> Option<Self::Frame>;
}

/// Turns one frame into zero or more hands.
pub trait LandmarkDetector: Send + 'static {
    type Frame;

    fn configure(&mut self, options: &DetectorOptions);

    fn detect(&mut self, frame: &Self::Frame) -> Result<HandObservation, DetectionError>;
}

/// Anything that can deliver [`DetectionEvent`]s over a channel.
pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<DetectionEvent>);
}

// ════════════════════════════════════════════════════════════════════════════
// Spawn helper
// ════════════════════════════════════════════════════════════════════════════

/// Spawn a hand source on its own thread and return the receiving end.
pub fn spawn_hand_source<H: HandSource>(source: H) -> Receiver<DetectionEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// DetectionPipeline: camera + detector
// ════════════════════════════════════════════════════════════════════════════

/// Capture → detect → publish, one frame at a time.
pub struct DetectionPipeline<S, D> {
    source:   S,
    detector: D,
    options:  DetectorOptions,
}

impl<S, D> DetectionPipeline<S, D>
where
    S: FrameSource,
    D: LandmarkDetector<Frame = S::Frame>,
{
    pub fn new(source: S, detector: D, options: DetectorOptions) -> Self {
        DetectionPipeline { source, detector, options }
    }
}

impl<S, D> HandSource for DetectionPipeline<S, D>
where
    S: FrameSource,
    D: LandmarkDetector<Frame = S::Frame>,
{
    fn run(self: Box<Self>, tx: Sender<DetectionEvent>) {
        let DetectionPipeline { mut source, mut detector, options } = *self;

        if let Err(e) = source.open() {
            log::error!("{}", e);
            let _ = tx.send(DetectionEvent::CaptureUnavailable(e.to_string()));
            return;
        }
        detector.configure(&options);
        if tx.send(DetectionEvent::Started).is_err() { return; }

        while let Some(frame) = source.next_frame() {
            let event = match detector.detect(&frame) {
                Ok(mut observation) => {
                    observation.hands.truncate(options.max_hands);
                    DetectionEvent::Observation(observation)
                }
                Err(e) => {
                    log::warn!("{}", e);
                    DetectionEvent::Failed(e.to_string())
                }
            };
            if tx.send(event).is_err() { return; }
        }
        log::info!("frame source ended; detection stopped");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
