//! The generated point field.
//!
//! `PointField` owns three buffers:
//!
//! * **base positions**: written only by [`PointField::regenerate`];
//! * **colors**: rewritten in place by [`PointField::apply_color`];
//! * **scaled**: a working buffer filled by [`PointField::compute_scaled`].
//!
//! Scaling always reads the base and writes the working buffer, so any number
//! of rescales leaves the base exactly as generated.
//!
//! The renderer learns about changes through two separate counters:
//! `geometry_revision` moves when the buffers are replaced (rebind),
//! `color_revision` moves when color contents change (re-upload).

use thiserror::Error;

use crate::{sampler, Point, Rgb, Template};

#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("a point field needs at least one particle")]
    EmptyField,
    #[error("color channel {0} is outside [0, 1]")]
    InvalidColor(f32),
    #[error("{0:?} is not a #rrggbb color")]
    InvalidHex(String),
}

/// Positions and colors for the current template / count / color.
#[derive(Debug, Clone)]
pub struct PointField {
    template:          Template,
    color:             Rgb,
    seed:              u64,
    /// Bumped per regeneration so a re-roll of the same template differs.
    generation:        u64,
    base_positions:    Vec<Point>,
    colors:            Vec<Rgb>,
    scaled:            Vec<Point>,
    geometry_revision: u64,
    color_revision:    u64,
}

impl PointField {
    pub fn new(template: Template, count: usize, color: Rgb, seed: u64) -> Result<Self, FieldError> {
        let mut field = PointField {
            template,
            color,
            seed,
            generation:        0,
            base_positions:    Vec::new(),
            colors:            Vec::new(),
            scaled:            Vec::new(),
            geometry_revision: 0,
            color_revision:    0,
        };
        field.regenerate(template, count)?;
        Ok(field)
    }

    /// Replace every buffer with a fresh `count`-point sampling of `template`.
    ///
    /// Handles to the previous buffers are stale afterwards; both revisions
    /// move.
    pub fn regenerate(&mut self, template: Template, count: usize) -> Result<(), FieldError> {
        if count == 0 {
            return Err(FieldError::EmptyField);
        }
        let pass_seed = self.seed.wrapping_add(self.generation);
        self.generation += 1;

        self.template       = template;
        self.base_positions = sampler::generate(template, count, pass_seed);
        self.colors         = vec![self.color; count];
        self.scaled         = Vec::with_capacity(count);
        self.geometry_revision += 1;
        self.color_revision    += 1;

        log::debug!(
            "regenerated {} field: {} points (pass seed {:#x})",
            template, count, pass_seed
        );
        Ok(())
    }

    /// Rewrite every color in place. Positions are untouched.
    pub fn apply_color(&mut self, color: Rgb) {
        self.color = color;
        self.colors.iter_mut().for_each(|c| *c = color);
        self.color_revision += 1;
    }

    /// `base[i] * scale` for every point, in the reused working buffer.
    pub fn compute_scaled(&mut self, scale: f32) -> &[Point] {
        self.scaled.clear();
        self.scaled.extend(self.base_positions.iter().map(|p| p * scale));
        &self.scaled
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn template(&self)          -> Template { self.template }
    pub fn color(&self)             -> Rgb      { self.color }
    pub fn count(&self)             -> usize    { self.base_positions.len() }
    pub fn base_positions(&self)    -> &[Point] { &self.base_positions }
    pub fn colors(&self)            -> &[Rgb]   { &self.colors }
    /// Output of the last [`compute_scaled`](Self::compute_scaled).
    pub fn scaled_positions(&self)  -> &[Point] { &self.scaled }
    pub fn geometry_revision(&self) -> u64      { self.geometry_revision }
    pub fn color_revision(&self)    -> u64      { self.color_revision }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
