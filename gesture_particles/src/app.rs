//! Top-level application state machine.
//!
//! `AppState` owns the `PointField`, the `BoundingEnvelope`, the
//! `GestureScaleEstimator` and the `RenderLoop`. It processes `UiEvent`s from
//! the window and `DetectionEvent`s from the hand source, and drives one
//! render tick per frame.

use std::sync::mpsc::{Receiver, TryRecvError};

use hand_scale::{ConfigError, GestureScaleEstimator, ScaleConfig};
use particle_field::{BoundingEnvelope, FieldError, PointField, Rgb, Template};
use thiserror::Error;

use crate::detection::{spawn_hand_source, DetectionEvent, DetectorOptions};
use crate::render_loop::{RenderLoop, RenderTarget};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub template:      Template,
    pub count:         usize,
    pub color:         Rgb,
    pub seed:          u64,
    /// Per-tick spin about X and Y, in radians.
    pub rotation_step: (f32, f32),
    pub scale:         ScaleConfig,
    pub detector:      DetectorOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            template:      Template::Heart,
            count:         2000,
            color:         Rgb::HOT_PINK,
            seed:          0x5EED,
            rotation_step: (0.001, 0.002),
            scale:         ScaleConfig::default(),
            detector:      DetectorOptions::default(),
        }
    }
}

/// Colors the `C` key steps through.
pub const PALETTE: [Rgb; 6] = [
    Rgb::HOT_PINK,
    Rgb { r: 0.0,  g: 0.75, b: 1.0  },
    Rgb { r: 1.0,  g: 0.84, b: 0.0  },
    Rgb { r: 0.5,  g: 1.0,  b: 0.0  },
    Rgb { r: 0.58, g: 0.44, b: 0.86 },
    Rgb::WHITE,
];

pub const MIN_COUNT: usize = 125;
pub const MAX_COUNT: usize = 64_000;

// ════════════════════════════════════════════════════════════════════════════
// Events and states
// ════════════════════════════════════════════════════════════════════════════

/// What the user asked for through the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UiEvent {
    SelectTemplate(Template),
    SetColor(Rgb),
    CycleColor,
    /// Double the particle count.
    GrowCount,
    /// Halve the particle count.
    ShrinkCount,
    StartTracking,
    /// Force the scale back to neutral.
    Reset,
    Quit,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TrackingState {
    Idle,
    /// Source spawned, camera not confirmed yet.
    Starting,
    Active,
    /// Capture failed; a new start request may try again.
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("window: {0}")]
    Window(String),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── scene ────────────────────────────────────────────────────────────
    field:       PointField,
    envelope:    BoundingEnvelope,
    render_loop: RenderLoop,

    // ── gesture ──────────────────────────────────────────────────────────
    estimator:   GestureScaleEstimator,
    tracking:    TrackingState,
    last_error:  Option<String>,

    palette_index: usize,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Result<Self, AppError> {
        let field     = PointField::new(cfg.template, cfg.count, cfg.color, cfg.seed)?;
        let envelope  = BoundingEnvelope::new(cfg.template, cfg.color);
        let estimator = GestureScaleEstimator::new(cfg.scale.clone())?;

        Ok(AppState {
            field,
            envelope,
            render_loop:   RenderLoop::new(cfg.rotation_step),
            estimator,
            tracking:      TrackingState::Idle,
            last_error:    None,
            palette_index: PALETTE.iter().position(|c| *c == cfg.color).unwrap_or(0),
        })
    }

    // ── UI ────────────────────────────────────────────────────────────────

    /// Apply one UI event. `StartTracking` and `Quit` need the run loop and
    /// are only noted here; see [`begin_tracking`](AppState::begin_tracking).
    pub fn handle_ui(&mut self, event: UiEvent) -> Result<(), AppError> {
        match event {
            UiEvent::SelectTemplate(t) => self.select_template(t)?,
            UiEvent::SetColor(c)       => self.set_color(c),
            UiEvent::CycleColor => {
                self.palette_index = (self.palette_index + 1) % PALETTE.len();
                self.set_color(PALETTE[self.palette_index]);
            }
            UiEvent::GrowCount   => self.set_count(self.field.count().saturating_mul(2))?,
            UiEvent::ShrinkCount => self.set_count(self.field.count() / 2)?,
            UiEvent::Reset => {
                self.estimator.reset();
                log::info!("scale reset to {:.2}", self.estimator.current_scale());
            }
            UiEvent::StartTracking | UiEvent::Quit => {}
        }
        Ok(())
    }

    fn select_template(&mut self, template: Template) -> Result<(), AppError> {
        self.field.regenerate(template, self.field.count())?;
        self.envelope.rebuild(template);
        log::info!("template {} ({} points)", template, self.field.count());
        Ok(())
    }

    fn set_color(&mut self, color: Rgb) {
        self.field.apply_color(color);
        self.envelope.apply_color(color);
    }

    fn set_count(&mut self, count: usize) -> Result<(), AppError> {
        let count = count.clamp(MIN_COUNT, MAX_COUNT);
        if count != self.field.count() {
            self.field.regenerate(self.field.template(), count)?;
        }
        Ok(())
    }

    /// Move to `Starting` if tracking is idle or previously failed. Returns
    /// true when the caller should spawn a hand source.
    pub fn begin_tracking(&mut self) -> bool {
        match self.tracking {
            TrackingState::Idle | TrackingState::Unavailable(_) => {
                self.tracking = TrackingState::Starting;
                self.last_error = None;
                true
            }
            TrackingState::Starting | TrackingState::Active => false,
        }
    }

    // ── Detection ─────────────────────────────────────────────────────────

    pub fn handle_detection(&mut self, event: DetectionEvent) {
        match event {
            DetectionEvent::Started => {
                self.tracking = TrackingState::Active;
                log::info!("hand tracking active");
            }
            DetectionEvent::Observation(obs) => {
                self.estimator.update(&obs);
            }
            DetectionEvent::Failed(msg) => {
                self.last_error = Some(msg);
            }
            DetectionEvent::CaptureUnavailable(msg) => {
                self.last_error = Some(format!("Error accessing camera: {}", msg));
                self.tracking = TrackingState::Unavailable(msg);
            }
        }
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    pub fn tick<T: RenderTarget + ?Sized>(&mut self, target: &mut T) {
        let scale = self.estimator.current_scale();
        self.render_loop.tick(scale, &mut self.field, &mut self.envelope, target);
    }

    pub fn status_line(&self) -> String {
        let tracking = match &self.tracking {
            TrackingState::Idle           => "off",
            TrackingState::Starting       => "starting",
            TrackingState::Active         => "on",
            TrackingState::Unavailable(_) => "unavailable",
        };
        let mut line = format!(
            "{} | {} points | scale {:.2} | hands: {}",
            self.field.template(), self.field.count(), self.estimator.current_scale(), tracking,
        );
        if let Some(err) = &self.last_error {
            line.push_str(" | ");
            line.push_str(err);
        }
        line
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn field(&self)      -> &PointField            { &self.field }
    pub fn envelope(&self)   -> &BoundingEnvelope      { &self.envelope }
    pub fn estimator(&self)  -> &GestureScaleEstimator { &self.estimator }
    pub fn tracking(&self)   -> &TrackingState         { &self.tracking }
    pub fn last_error(&self) -> Option<&str>           { self.last_error.as_deref() }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "leap")]
fn start_hand_source(options: &DetectorOptions, _vis: &mut Visualizer) -> Receiver<DetectionEvent> {
    spawn_hand_source(crate::leap::LeapHandSource { options: options.clone() })
}

#[cfg(not(feature = "leap"))]
fn start_hand_source(options: &DetectorOptions, vis: &mut Visualizer) -> Receiver<DetectionEvent> {
    use crate::detection::DetectionPipeline;
    use crate::sim::{SimCamera, SimDetector};

    let (sim_tx, sim_rx) = std::sync::mpsc::channel();
    vis.attach_sim(sim_tx);
    spawn_hand_source(DetectionPipeline::new(
        SimCamera::new(sim_rx),
        SimDetector::default(),
        options.clone(),
    ))
}

/// Run the full application.
///
/// Creates the visualizer and drives the event/render loop at ~60 fps. The
/// hand source (simulation by default, hardware with `--features leap`) is
/// only started when the user presses `H`.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    let mut app = AppState::new(&cfg)?;
    let mut vis = Visualizer::new().map_err(AppError::Window)?;
    let mut detections: Option<Receiver<DetectionEvent>> = None;

    log::info!("{} points of {}, seed {:#x}", cfg.count, cfg.template, cfg.seed);

    while vis.is_open() {
        // 1. Window input
        for event in vis.poll_input() {
            match event {
                UiEvent::Quit => return Ok(()),
                UiEvent::StartTracking => {
                    if app.begin_tracking() {
                        detections = Some(start_hand_source(&cfg.detector, &mut vis));
                    }
                }
                other => app.handle_ui(other)?,
            }
        }

        // 2. Drain detection events, in arrival order
        let mut finished = false;
        if let Some(rx) = &detections {
            loop {
                match rx.try_recv() {
                    Ok(event) => app.handle_detection(event),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => { finished = true; break; }
                }
            }
        }
        if finished {
            log::debug!("hand source finished");
            detections = None;
        }

        // 3. Render
        vis.set_status(app.status_line());
        app.tick(&mut vis);
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_loop::RenderFrame;
    use approx::assert_relative_eq;
    use hand_scale::{Hand, HandObservation};

    fn make_app() -> AppState {
        AppState::new(&AppConfig { count: 500, ..AppConfig::default() }).unwrap()
    }

    fn pair(spread: f32) -> DetectionEvent {
        DetectionEvent::Observation(HandObservation::new(vec![
            Hand::with_fingertip_at([0.5 - spread / 2.0, 0.5, 0.0]),
            Hand::with_fingertip_at([0.5 + spread / 2.0, 0.5, 0.0]),
        ]))
    }

    #[derive(Default)]
    struct Recorder { scale: f32, points: usize }

    impl RenderTarget for Recorder {
        fn submit(&mut self, frame: &RenderFrame<'_>) {
            self.scale  = frame.scale;
            self.points = frame.points.len();
        }
    }

    #[test]
    fn starts_from_config() {
        let app = AppState::new(&AppConfig::default()).unwrap();
        assert_eq!(app.field().template(), Template::Heart);
        assert_eq!(app.field().count(), 2000);
        assert_eq!(app.field().color(), Rgb::HOT_PINK);
        assert_eq!(app.estimator().current_scale(), 1.0);
        assert_eq!(*app.tracking(), TrackingState::Idle);
    }

    #[test]
    fn invalid_scale_config_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.scale.min_distance = 0.5;
        assert!(matches!(AppState::new(&cfg), Err(AppError::Config(_))));
    }

    #[test]
    fn template_change_rebuilds_envelope() {
        let mut app = make_app();
        app.handle_ui(UiEvent::SelectTemplate(Template::RingAndCore)).unwrap();
        assert_eq!(app.field().template(), Template::RingAndCore);
        assert_eq!(app.envelope().template(), Template::RingAndCore);
        assert_eq!(app.envelope().radius(), 4.0);
        assert_eq!(app.field().count(), 500);
        assert_eq!(app.field().color(), Rgb::HOT_PINK);
    }

    #[test]
    fn color_change_leaves_geometry() {
        let mut app = make_app();
        let geo = app.field().geometry_revision();
        app.handle_ui(UiEvent::SetColor(Rgb::WHITE)).unwrap();
        assert_eq!(app.field().geometry_revision(), geo);
        assert!(app.field().colors().iter().all(|c| *c == Rgb::WHITE));
        assert_eq!(app.envelope().tint(), Rgb::WHITE.envelope_tint());
    }

    #[test]
    fn cycle_color_walks_the_palette() {
        let mut app = make_app();
        for expected in PALETTE.iter().cycle().skip(1).take(PALETTE.len() + 1) {
            app.handle_ui(UiEvent::CycleColor).unwrap();
            assert_eq!(app.field().color(), *expected);
        }
    }

    #[test]
    fn count_doubles_and_halves_within_bounds() {
        let mut app = make_app();
        app.handle_ui(UiEvent::GrowCount).unwrap();
        assert_eq!(app.field().count(), 1000);
        for _ in 0..10 { app.handle_ui(UiEvent::ShrinkCount).unwrap(); }
        assert_eq!(app.field().count(), MIN_COUNT);
        for _ in 0..20 { app.handle_ui(UiEvent::GrowCount).unwrap(); }
        assert_eq!(app.field().count(), MAX_COUNT);
        assert_eq!(app.field().colors().len(), MAX_COUNT);
    }

    #[test]
    fn reset_forces_neutral_scale_only() {
        let mut app = make_app();
        app.handle_ui(UiEvent::SelectTemplate(Template::Flower)).unwrap();
        app.handle_detection(pair(0.6));
        assert_eq!(app.estimator().current_scale(), 2.0);

        app.handle_ui(UiEvent::Reset).unwrap();
        assert_eq!(app.estimator().current_scale(), 1.0);
        assert_eq!(app.field().template(), Template::Flower);
        assert_eq!(app.field().color(), Rgb::HOT_PINK);
    }

    #[test]
    fn starting_twice_is_a_no_op() {
        let mut app = make_app();
        assert!(app.begin_tracking());
        assert!(!app.begin_tracking());
        app.handle_detection(DetectionEvent::Started);
        assert_eq!(*app.tracking(), TrackingState::Active);
        assert!(!app.begin_tracking());
    }

    #[test]
    fn capture_failure_is_reported_and_retryable() {
        let mut app = make_app();
        app.begin_tracking();
        app.handle_detection(DetectionEvent::CaptureUnavailable("denied".into()));
        assert_eq!(*app.tracking(), TrackingState::Unavailable("denied".into()));
        assert_eq!(app.last_error(), Some("Error accessing camera: denied"));
        assert!(app.status_line().contains("Error accessing camera"));
        assert_eq!(app.estimator().current_scale(), 1.0);

        assert!(app.begin_tracking());
        assert_eq!(app.last_error(), None);
    }

    #[test]
    fn detection_failure_keeps_scale_and_later_results_apply() {
        let mut app = make_app();
        app.handle_detection(pair(0.175));
        let before = app.estimator().current_scale();
        app.handle_detection(DetectionEvent::Failed("model hiccup".into()));
        assert_eq!(app.estimator().current_scale(), before);
        assert_eq!(app.last_error(), Some("model hiccup"));

        app.handle_detection(pair(0.05));
        assert_relative_eq!(app.estimator().current_scale(), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn tick_renders_with_current_scale() {
        let mut app = make_app();
        let mut rec = Recorder::default();
        app.tick(&mut rec);
        assert_eq!(rec.scale, 1.0);
        assert_eq!(rec.points, 500);

        app.handle_detection(pair(0.6));
        app.tick(&mut rec);
        assert_eq!(rec.scale, 2.0);
    }

    #[test]
    fn status_line_mentions_template_and_count() {
        let app = make_app();
        let line = app.status_line();
        assert!(line.starts_with("heart | 500 points | scale 1.00"));
        assert!(line.ends_with("hands: off"));
    }
}
