//! The translucent dome drawn around the field.
//!
//! Geometry is the upper half of a UV sphere (32 × 16 segments). Vertices
//! whose depth is negative are pulled toward the equatorial plane by a factor
//! of 0.3, which turns the hemisphere into a lopsided dome. Normals are
//! recomputed from the flattened faces.

use std::f32::consts::{FRAC_PI_2, TAU};

use crate::{Point, Rgb, Template};

pub const WIDTH_SEGMENTS:  usize = 32;
pub const HEIGHT_SEGMENTS: usize = 16;
/// Depth factor applied to vertices behind the equatorial plane.
pub const FLATTEN:         f32   = 0.3;
pub const OPACITY:         f32   = 0.2;

/// Dome sized for the current template.
#[derive(Debug, Clone)]
pub struct BoundingEnvelope {
    template:      Template,
    radius:        f32,
    tint:          Rgb,
    base_vertices: Vec<Point>,
    normals:       Vec<Point>,
    triangles:     Vec<[u32; 3]>,
    edges:         Vec<(u32, u32)>,
    scaled:        Vec<Point>,
}

impl BoundingEnvelope {
    pub fn new(template: Template, color: Rgb) -> Self {
        let mut env = BoundingEnvelope {
            template,
            radius:        template.envelope_radius(),
            tint:          color.envelope_tint(),
            base_vertices: Vec::new(),
            normals:       Vec::new(),
            triangles:     Vec::new(),
            edges:         Vec::new(),
            scaled:        Vec::new(),
        };
        env.rebuild(template);
        env
    }

    /// Re-derive radius, shell and normals for `template`.
    pub fn rebuild(&mut self, template: Template) {
        self.template = template;
        self.radius   = template.envelope_radius();

        let (mut vertices, triangles) = half_sphere(self.radius);
        for v in &mut vertices {
            if v.z < 0.0 {
                v.z *= FLATTEN;
            }
        }
        self.normals       = vertex_normals(&vertices, &triangles);
        self.edges         = unique_edges(&triangles);
        self.base_vertices = vertices;
        self.triangles     = triangles;

        log::debug!("envelope rebuilt for {}: radius {}", template, self.radius);
    }

    /// Follow the particle color.
    pub fn apply_color(&mut self, color: Rgb) {
        self.tint = color.envelope_tint();
    }

    /// Shell vertices scaled uniformly by `scale`; base geometry is untouched.
    pub fn compute_scaled(&mut self, scale: f32) -> &[Point] {
        self.scaled.clear();
        self.scaled.extend(self.base_vertices.iter().map(|v| v * scale));
        &self.scaled
    }

    pub fn template(&self)      -> Template      { self.template }
    pub fn radius(&self)        -> f32           { self.radius }
    pub fn tint(&self)          -> Rgb           { self.tint }
    pub fn base_vertices(&self) -> &[Point]      { &self.base_vertices }
    pub fn normals(&self)       -> &[Point]      { &self.normals }
    pub fn triangles(&self)     -> &[[u32; 3]]   { &self.triangles }
    /// Unique undirected edges, for wireframe drawing.
    pub fn edges(&self)         -> &[(u32, u32)] { &self.edges }
    /// Output of the last [`compute_scaled`](Self::compute_scaled).
    pub fn scaled_vertices(&self) -> &[Point]    { &self.scaled }
}

// ════════════════════════════════════════════════════════════════════════════
// Geometry
// ════════════════════════════════════════════════════════════════════════════

/// Polar angle 0..π/2 from +Y; azimuth full circle. Returns a
/// `(WIDTH+1) × (HEIGHT+1)` vertex grid and its triangles.
fn half_sphere(radius: f32) -> (Vec<Point>, Vec<[u32; 3]>) {
    let mut vertices = Vec::with_capacity((WIDTH_SEGMENTS + 1) * (HEIGHT_SEGMENTS + 1));
    for iy in 0..=HEIGHT_SEGMENTS {
        let theta = iy as f32 / HEIGHT_SEGMENTS as f32 * FRAC_PI_2;
        for ix in 0..=WIDTH_SEGMENTS {
            let phi = ix as f32 / WIDTH_SEGMENTS as f32 * TAU;
            vertices.push(Point::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ));
        }
    }

    let row = WIDTH_SEGMENTS + 1;
    let at = |ix: usize, iy: usize| (iy * row + ix) as u32;
    let mut triangles = Vec::with_capacity(WIDTH_SEGMENTS * HEIGHT_SEGMENTS * 2);
    for iy in 0..HEIGHT_SEGMENTS {
        for ix in 0..WIDTH_SEGMENTS {
            let a = at(ix + 1, iy);
            let b = at(ix, iy);
            let c = at(ix, iy + 1);
            let d = at(ix + 1, iy + 1);
            // The top row collapses onto the pole; skip its degenerate half.
            if iy != 0 {
                triangles.push([a, b, d]);
            }
            triangles.push([b, c, d]);
        }
    }
    (vertices, triangles)
}

fn unique_edges(triangles: &[[u32; 3]]) -> Vec<(u32, u32)> {
    let mut edges: Vec<(u32, u32)> = triangles.iter()
        .flat_map(|&[a, b, c]| [(a, b), (b, c), (c, a)])
        .map(|(a, b)| if a < b { (a, b) } else { (b, a) })
        .collect();
    edges.sort_unstable();
    edges.dedup();
    edges
}

/// Area-weighted vertex normals. Vertices touched only by degenerate faces
/// keep a zero normal.
fn vertex_normals(vertices: &[Point], triangles: &[[u32; 3]]) -> Vec<Point> {
    let mut normals = vec![Point::zeros(); vertices.len()];
    for &[a, b, c] in triangles {
        let (pa, pb, pc) = (vertices[a as usize], vertices[b as usize], vertices[c as usize]);
        let face = (pc - pb).cross(&(pa - pb));
        for i in [a, b, c] {
            normals[i as usize] += face;
        }
    }
    for n in &mut normals {
        let len = n.norm();
        if len > f32::EPSILON {
            *n /= len;
        }
    }
    normals
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
