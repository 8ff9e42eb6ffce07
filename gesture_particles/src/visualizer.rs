//! Software-rendered point-cloud visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │            . ·:·. particles (perspective, spinning)          │
//! │         /‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾\  dome wireframe                   │
//! │                                                              │
//! │  status bar                                                  │
//! │  key legend                                                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Points are projected through a fixed perspective camera (75° vertical
//! field of view, eye at z = 5) and splatted with 80 % opacity; the dome is
//! drawn as a 20 % opacity wireframe.

use std::sync::mpsc::Sender;

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use particle_field::{envelope, Point, Template};

use crate::app::UiEvent;
use crate::render_loop::{RenderFrame, RenderTarget};
use crate::sim::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:      usize = 960;
pub const WIN_H:      usize = 640;
const VIEW_H:         usize = WIN_H - 44;
const STATUS_Y:       usize = WIN_H - 36;
const BG_COLOR:       u32   = 0xFF000000;
const TEXT_BG:        u32   = 0xFF0F3460;

const FOV_Y_DEG:      f32   = 75.0;
const CAMERA_Z:       f32   = 5.0;
const NEAR:           f32   = 0.1;
const FAR:            f32   = 1000.0;
/// World-space point size.
const POINT_SIZE:     f32   = 0.05;
const POINT_OPACITY:  f32   = 0.8;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:   Window,
    buf:      Vec<u32>,
    sim_tx:   Option<Sender<SimInput>>,
    status:   String,

    // Uploaded state, refreshed when the revisions move.
    point_argb:        Vec<u32>,
    geometry_revision: u64,
    color_revision:    u64,
}

impl Visualizer {
    pub fn new() -> Result<Self, String> {
        let mut window = Window::new(
            "Gesture Particles",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx: None,
            status: String::new(),
            point_argb: Vec::new(),
            geometry_revision: 0,
            color_revision: 0,
        })
    }

    /// Route simulation keys to a (new) simulated camera.
    pub fn attach_sim(&mut self, tx: Sender<SimInput>) { self.sim_tx = Some(tx); }

    pub fn set_status(&mut self, status: String) { self.status = status; }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard state; UI keys come back as events, simulation keys go
    /// straight to the simulated camera.
    pub fn poll_input(&mut self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        if !self.window.is_open() {
            events.push(UiEvent::Quit);
            return events;
        }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        let held     = |k: Key| self.window.is_key_pressed(k, KeyRepeat::Yes);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            events.push(UiEvent::Quit);
            return events;
        }

        let template_keys = [Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5, Key::Key6];
        for (key, template) in template_keys.iter().zip(Template::ALL) {
            if one_shot(*key) {
                events.push(UiEvent::SelectTemplate(template));
            }
        }
        if one_shot(Key::C)                                  { events.push(UiEvent::CycleColor); }
        if one_shot(Key::Equal) || one_shot(Key::NumPadPlus) { events.push(UiEvent::GrowCount); }
        if one_shot(Key::Minus) || one_shot(Key::NumPadMinus){ events.push(UiEvent::ShrinkCount); }
        if one_shot(Key::H)                                  { events.push(UiEvent::StartTracking); }
        if one_shot(Key::R)                                  { events.push(UiEvent::Reset); }

        // ── Simulated hands ───────────────────────────────────────────────
        let mut sim = Vec::new();
        if one_shot(Key::N) { sim.push(SimInput::SetHands(0)); }
        if one_shot(Key::O) { sim.push(SimInput::SetHands(1)); }
        if one_shot(Key::B) { sim.push(SimInput::SetHands(2)); }
        if held(Key::Up)    { sim.push(SimInput::Widen); }
        if held(Key::Down)  { sim.push(SimInput::Narrow); }
        if let Some(tx) = &self.sim_tx {
            for input in sim {
                let _ = tx.send(input);
            }
        }

        events
    }

    // ── Upload ────────────────────────────────────────────────────────────

    fn sync_buffers(&mut self, frame: &RenderFrame<'_>) {
        if frame.geometry_revision != self.geometry_revision {
            log::debug!(
                "rebinding point buffers ({} points, revision {})",
                frame.points.len(), frame.geometry_revision
            );
            self.geometry_revision = frame.geometry_revision;
        }
        if frame.color_revision != self.color_revision
            || self.point_argb.len() != frame.colors.len()
        {
            self.point_argb = frame.colors.iter().map(|c| c.to_argb()).collect();
            self.color_revision = frame.color_revision;
        }
    }

    // ── Projection ────────────────────────────────────────────────────────

    fn focal_px() -> f32 {
        (VIEW_H as f32 / 2.0) / (FOV_Y_DEG.to_radians() / 2.0).tan()
    }

    /// Camera-space depth plus screen coordinates, or `None` when clipped.
    fn project(p: &Point) -> Option<(f32, f32, f32)> {
        let depth = CAMERA_Z - p.z;
        if !(NEAR..FAR).contains(&depth) { return None; }
        let f = Self::focal_px();
        let sx = WIN_W as f32 / 2.0 + p.x * f / depth;
        let sy = VIEW_H as f32 / 2.0 - p.y * f / depth;
        Some((sx, sy, depth))
    }

    // ── Frame ─────────────────────────────────────────────────────────────

    fn draw_envelope(&mut self, frame: &RenderFrame<'_>) {
        let tint = frame.envelope_tint.to_argb();
        let projected: Vec<Option<(f32, f32, f32)>> = frame.envelope_vertices.iter()
            .map(|v| Self::project(&(frame.envelope_rotation * v)))
            .collect();
        for &(a, b) in frame.envelope_edges {
            if let (Some(pa), Some(pb)) = (projected[a as usize], projected[b as usize]) {
                self.draw_line(pa.0, pa.1, pb.0, pb.1, tint, envelope::OPACITY);
            }
        }
    }

    fn draw_points(&mut self, frame: &RenderFrame<'_>) {
        let f = Self::focal_px();
        for (i, p) in frame.points.iter().enumerate() {
            let Some((sx, sy, depth)) = Self::project(&(frame.field_rotation * p)) else { continue };
            let color = self.point_argb.get(i).copied().unwrap_or(0xFFFFFFFF);
            let size  = ((POINT_SIZE * f / depth).round() as isize).clamp(1, 6);
            let half  = size / 2;
            for dy in 0..size {
                for dx in 0..size {
                    self.blend_pixel(sx as isize + dx - half, sy as isize + dy - half, color, POINT_OPACITY);
                }
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(WIN_H) {
            for col in x..(x+w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < WIN_W && y < WIN_H {
            self.buf[y * WIN_W + x] = color;
        }
    }

    fn blend_pixel(&mut self, x: isize, y: isize, color: u32, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= WIN_W || y as usize >= VIEW_H { return; }
        let i = y as usize * WIN_W + x as usize;
        self.buf[i] = blend(self.buf[i], color, alpha);
    }

    /// DDA line, clipped to the view.
    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: u32, alpha: f32) {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().min(4096.0) as usize;
        if steps == 0 {
            self.blend_pixel(x0 as isize, y0 as isize, color, alpha);
            return;
        }
        for s in 0..=steps {
            let t = s as f32 / steps as f32;
            let x = x0 + (x1 - x0) * t;
            let y = y0 + (y1 - y0) * t;
            self.blend_pixel(x as isize, y as isize, color, alpha);
        }
    }

    /// Minimal bitmap font: 3×5 characters for status rendering.
    /// Each character is encoded as 5 rows × 3 bits.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W { break; }
        }
    }
}

impl RenderTarget for Visualizer {
    fn submit(&mut self, frame: &RenderFrame<'_>) {
        self.sync_buffers(frame);

        self.buf.fill(BG_COLOR);
        self.draw_envelope(frame);
        self.draw_points(frame);

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y, WIN_W, WIN_H - STATUS_Y, TEXT_BG);
        let status = std::mem::take(&mut self.status);
        self.draw_label(&status, 10, STATUS_Y + 10, 0xFFEEEEEE);
        self.status = status;

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "1-6=template  C=color  +/-=count  H=hands  R=reset  N/O/B=sim hands  Up/Down=spread  Q=quit",
            10, WIN_H - 16, 0xFF888888,
        );

        if let Err(e) = self.window.update_with_buffer(&self.buf, WIN_W, WIN_H) {
            log::warn!("frame presentation failed: {}", e);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '|' => [0b010, 0b010, 0b010, 0b010, 0b010],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}
