//! Per-frame orchestration.
//!
//! Each tick: read the latest scale, scale the field and the envelope by that
//! same value, advance the slow spin, and hand everything to the
//! [`RenderTarget`]. Nothing here can fail.

use std::f32::consts::PI;

use nalgebra::{Rotation3, Vector3};
use particle_field::{BoundingEnvelope, Point, PointField, Rgb};

/// Everything the renderer needs for one frame. Borrowed, not copied.
pub struct RenderFrame<'a> {
    pub points:            &'a [Point],
    pub colors:            &'a [Rgb],
    /// Changes when the point buffers were replaced; rebind.
    pub geometry_revision: u64,
    /// Changes when colors were rewritten; re-upload.
    pub color_revision:    u64,
    /// Accumulated spin applied to the field.
    pub field_rotation:    Rotation3<f32>,
    pub envelope_vertices: &'a [Point],
    pub envelope_edges:    &'a [(u32, u32)],
    pub envelope_tint:     Rgb,
    /// Fixed flip that stands the dome upright; not spun.
    pub envelope_rotation: Rotation3<f32>,
    pub scale:             f32,
}

/// The rendering collaborator.
pub trait RenderTarget {
    fn submit(&mut self, frame: &RenderFrame<'_>);
}

/// Owns the spin state; drives one frame per [`tick`](RenderLoop::tick).
#[derive(Clone, Debug)]
pub struct RenderLoop {
    angle_x: f32,
    angle_y: f32,
    step_x:  f32,
    step_y:  f32,
    ticks:   u64,
}

impl RenderLoop {
    /// `step` is the per-tick rotation about X and Y, in radians.
    pub fn new(step: (f32, f32)) -> Self {
        RenderLoop { angle_x: 0.0, angle_y: 0.0, step_x: step.0, step_y: step.1, ticks: 0 }
    }

    pub fn tick<T: RenderTarget + ?Sized>(
        &mut self,
        scale:    f32,
        field:    &mut PointField,
        envelope: &mut BoundingEnvelope,
        target:   &mut T,
    ) {
        field.compute_scaled(scale);
        envelope.compute_scaled(scale);

        self.angle_x += self.step_x;
        self.angle_y += self.step_y;
        self.ticks   += 1;

        let frame = RenderFrame {
            points:            field.scaled_positions(),
            colors:            field.colors(),
            geometry_revision: field.geometry_revision(),
            color_revision:    field.color_revision(),
            field_rotation:    self.rotation(),
            envelope_vertices: envelope.scaled_vertices(),
            envelope_edges:    envelope.edges(),
            envelope_tint:     envelope.tint(),
            envelope_rotation: Rotation3::from_axis_angle(&Vector3::x_axis(), PI),
            scale,
        };
        target.submit(&frame);
    }

    /// X then Y, matching an XYZ Euler order.
    pub fn rotation(&self) -> Rotation3<f32> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), self.angle_x)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.angle_y)
    }

    pub fn angles(&self) -> (f32, f32) { (self.angle_x, self.angle_y) }
    pub fn ticks(&self)  -> u64        { self.ticks }
}

impl Default for RenderLoop {
    fn default() -> Self { RenderLoop::new((0.001, 0.002)) }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use particle_field::Template;

    /// Keeps a copy of what it was handed.
    #[derive(Default)]
    struct Recorder {
        frames:   usize,
        scale:    f32,
        first:    Option<Point>,
        env_max:  f32,
        revs:     (u64, u64),
        rotation: Option<Rotation3<f32>>,
    }

    impl RenderTarget for Recorder {
        fn submit(&mut self, frame: &RenderFrame<'_>) {
            self.frames  += 1;
            self.scale    = frame.scale;
            self.first    = frame.points.first().copied();
            self.env_max  = frame.envelope_vertices.iter().map(|v| v.norm()).fold(0.0, f32::max);
            self.revs     = (frame.geometry_revision, frame.color_revision);
            self.rotation = Some(frame.field_rotation);
            assert_eq!(frame.points.len(), frame.colors.len());
        }
    }

    fn scene() -> (PointField, BoundingEnvelope) {
        (
            PointField::new(Template::Sphere, 64, Rgb::HOT_PINK, 5).unwrap(),
            BoundingEnvelope::new(Template::Sphere, Rgb::HOT_PINK),
        )
    }

    #[test]
    fn field_and_envelope_share_the_scale() {
        let (mut field, mut env) = scene();
        let mut rec = Recorder::default();
        let mut rl = RenderLoop::default();

        rl.tick(2.0, &mut field, &mut env, &mut rec);
        assert_eq!(rec.scale, 2.0);
        assert_relative_eq!(rec.first.unwrap(), field.base_positions()[0] * 2.0, epsilon = 1e-6);
        assert_relative_eq!(rec.env_max, env.radius() * 2.0, epsilon = 1e-4);
    }

    #[test]
    fn rotation_accumulates_independent_of_scale() {
        let (mut field, mut env) = scene();
        let mut rec = Recorder::default();
        let mut a = RenderLoop::new((0.01, 0.02));
        let mut b = RenderLoop::new((0.01, 0.02));

        for i in 0..100 {
            a.tick(1.0, &mut field, &mut env, &mut rec);
            b.tick(0.1 + i as f32 * 0.02, &mut field, &mut env, &mut rec);
        }
        assert_eq!(a.angles(), b.angles());
        assert_relative_eq!(a.angles().0, 1.0, epsilon = 1e-4);
        assert_relative_eq!(a.angles().1, 2.0, epsilon = 1e-4);
        assert_eq!(a.ticks(), 100);
        assert_eq!(rec.frames, 200);
    }

    #[test]
    fn angles_grow_monotonically() {
        let (mut field, mut env) = scene();
        let mut rec = Recorder::default();
        let mut rl = RenderLoop::default();
        let mut prev = rl.angles();
        for _ in 0..10 {
            rl.tick(1.0, &mut field, &mut env, &mut rec);
            let now = rl.angles();
            assert!(now.0 > prev.0 && now.1 > prev.1);
            prev = now;
        }
        assert!(rec.rotation.is_some());
    }

    #[test]
    fn revisions_are_forwarded() {
        let (mut field, mut env) = scene();
        let mut rec = Recorder::default();
        let mut rl = RenderLoop::default();

        rl.tick(1.0, &mut field, &mut env, &mut rec);
        let (geo, col) = rec.revs;

        field.apply_color(Rgb::WHITE);
        rl.tick(1.0, &mut field, &mut env, &mut rec);
        assert_eq!(rec.revs, (geo, col + 1));

        field.regenerate(Template::Heart, 10).unwrap();
        rl.tick(1.0, &mut field, &mut env, &mut rec);
        assert_eq!(rec.revs, (geo + 1, col + 2));
    }

    #[test]
    fn scaling_every_tick_leaves_base_alone() {
        let (mut field, mut env) = scene();
        let base = field.base_positions().to_vec();
        let mut rec = Recorder::default();
        let mut rl = RenderLoop::default();
        for s in [0.1, 3.0, 0.5, 2.0, 1.0] {
            rl.tick(s, &mut field, &mut env, &mut rec);
        }
        assert_eq!(field.base_positions(), &base[..]);
    }
}
