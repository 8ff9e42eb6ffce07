//! Per-template sampling laws.
//!
//! Each template owns one plain function `fn(&mut dyn RngCore) -> Point`;
//! [`sample`] dispatches through [`LAWS`], indexed by [`Template::index`].
//! A law reads nothing but its RNG, so every index of a generation pass can
//! be sampled independently. [`generate`] exploits that with rayon, giving
//! each index its own RNG stream derived from `(seed, index)`.

use std::f32::consts::{PI, TAU};

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;

use crate::{Point, Template};

/// Signature shared by every law.
pub type SampleLaw = fn(&mut dyn RngCore) -> Point;

/// Dispatch table, one law per [`Template::ALL`] slot.
pub const LAWS: [SampleLaw; 6] = [
    sphere,
    heart,
    flower,
    ring_and_core,
    humanoid,
    burst,
];

pub const SPHERE_RADIUS:   f32 = 1.5;
pub const BURST_RADIUS:    f32 = 2.0;
pub const CORE_RADIUS:     f32 = 0.5;
pub const RING_INNER:      f32 = 1.5;
pub const RING_OUTER:      f32 = 2.0;
/// Probability that a ring-and-core point lands on the ring.
pub const RING_SHARE:      f32 = 0.7;
pub const PETAL_COUNT:     u32 = 8;
const HEART_SCALE:         f32 = 0.8;

// ════════════════════════════════════════════════════════════════════════════
// Entry points
// ════════════════════════════════════════════════════════════════════════════

/// Sample one point of `template`.
///
/// `index` and `particle_count` identify the point within its pass; no law
/// depends on them, so a count of 1 is as well-defined as any other.
pub fn sample(
    template:        Template,
    _index:          usize,
    _particle_count: usize,
    rng:             &mut dyn RngCore,
) -> Point {
    LAWS[template.index()](rng)
}

/// RNG for one index of a seeded pass.
pub fn index_rng(seed: u64, index: usize) -> StdRng {
    // Golden-ratio stride keeps adjacent indices far apart in seed space.
    StdRng::seed_from_u64(seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Generate `count` points in parallel.
pub fn generate(template: Template, count: usize, seed: u64) -> Vec<Point> {
    (0..count)
        .into_par_iter()
        .map(|i| sample(template, i, count, &mut index_rng(seed, i)))
        .collect()
}

/// Single-threaded twin of [`generate`]; yields the identical field.
pub fn generate_sequential(template: Template, count: usize, seed: u64) -> Vec<Point> {
    (0..count)
        .map(|i| sample(template, i, count, &mut index_rng(seed, i)))
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// Laws
// ════════════════════════════════════════════════════════════════════════════

/// Point at spherical coordinates (azimuth `theta`, polar `phi`, radius `r`).
fn spherical(theta: f32, phi: f32, r: f32) -> Point {
    Point::new(
        phi.sin() * theta.cos() * r,
        phi.sin() * theta.sin() * r,
        phi.cos() * r,
    )
}

/// Uniform in `[-half, half)`.
fn jitter(rng: &mut dyn RngCore, half: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * 2.0 * half
}

/// Ball of radius `radius`; the cube root on the radial draw undoes the
/// pile-up at the center.
fn ball(rng: &mut dyn RngCore, radius: f32) -> Point {
    let theta = rng.gen::<f32>() * TAU;
    let phi   = rng.gen::<f32>() * PI;
    let r     = rng.gen::<f32>().cbrt() * radius;
    spherical(theta, phi, r)
}

pub fn sphere(rng: &mut dyn RngCore) -> Point {
    ball(rng, SPHERE_RADIUS)
}

pub fn heart(rng: &mut dyn RngCore) -> Point {
    let t = (rng.gen::<f32>() - 0.5) * 4.0 * PI;
    let x = 16.0 * t.sin().powi(3);
    let y = -(13.0 * t.cos()
        - 5.0 * (2.0 * t).cos()
        - 2.0 * (3.0 * t).cos()
        - (4.0 * t).cos());
    let z = jitter(rng, 1.0);
    Point::new(x / 20.0 * HEART_SCALE, y / 20.0 * HEART_SCALE, z)
}

pub fn flower(rng: &mut dyn RngCore) -> Point {
    let angle  = rng.gen::<f32>() * TAU;
    let radius = rng.gen::<f32>() * 2.0;
    let petal  = rng.gen_range(0..PETAL_COUNT) as f32 * TAU / PETAL_COUNT as f32;
    let x = angle.cos() * radius * (0.5 + 0.5 * (petal * 3.0).cos());
    let y = angle.sin() * radius * (0.5 + 0.5 * (petal * 4.0).sin());
    let z = jitter(rng, 0.5);
    Point::new(x, y, z)
}

pub fn ring_and_core(rng: &mut dyn RngCore) -> Point {
    if rng.gen::<f32>() < RING_SHARE {
        let r     = RING_INNER + rng.gen::<f32>() * (RING_OUTER - RING_INNER);
        let angle = rng.gen::<f32>() * TAU;
        Point::new(angle.cos() * r, jitter(rng, 0.1), angle.sin() * r)
    } else {
        ball(rng, CORE_RADIUS)
    }
}

pub fn humanoid(rng: &mut dyn RngCore) -> Point {
    let region = rng.gen::<f32>();
    if region < 0.3 {
        // head
        Point::new(jitter(rng, 0.4), 1.2 + rng.gen::<f32>() * 0.4, jitter(rng, 0.4))
    } else if region < 0.6 {
        // torso
        Point::new(jitter(rng, 0.6), 0.5 + rng.gen::<f32>() * 0.7, jitter(rng, 0.4))
    } else {
        // base
        Point::new(jitter(rng, 0.75), rng.gen::<f32>() * 0.3, jitter(rng, 0.75))
    }
}

/// Same angles as [`sphere`] but a linear radial draw, so density falls off
/// away from the center.
pub fn burst(rng: &mut dyn RngCore) -> Point {
    let theta = rng.gen::<f32>() * TAU;
    let phi   = rng.gen::<f32>() * PI;
    let r     = rng.gen::<f32>() * BURST_RADIUS;
    spherical(theta, phi, r)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn points(template: Template, n: usize) -> Vec<Point> {
        generate(template, n, 0x5EED)
    }

    fn mean_sq_radius(ps: &[Point]) -> f64 {
        ps.iter().map(|p| p.norm_squared() as f64).sum::<f64>() / ps.len() as f64
    }

    #[test]
    fn every_law_is_finite() {
        for t in Template::ALL {
            for p in points(t, 5_000) {
                assert!(p.iter().all(|c| c.is_finite()), "{t}: {p:?}");
            }
        }
    }

    #[test]
    fn single_point_pass_is_well_defined() {
        for t in Template::ALL {
            let ps = generate(t, 1, 3);
            assert_eq!(ps.len(), 1);
            assert!(ps[0].iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        for t in Template::ALL {
            assert_eq!(generate(t, 777, 42), generate_sequential(t, 777, 42));
        }
    }

    #[test]
    fn seed_changes_field() {
        assert_ne!(generate(Template::Sphere, 64, 1), generate(Template::Sphere, 64, 2));
    }

    #[test]
    fn sphere_stays_inside_radius() {
        for p in points(Template::Sphere, 10_000) {
            assert!(p.norm() <= SPHERE_RADIUS + EPS);
        }
    }

    #[test]
    fn burst_stays_inside_radius() {
        for p in points(Template::Burst, 10_000) {
            assert!(p.norm() <= BURST_RADIUS + EPS);
        }
    }

    #[test]
    fn sphere_is_less_center_heavy_than_burst() {
        let sphere = mean_sq_radius(&points(Template::Sphere, 100_000));
        let burst  = mean_sq_radius(&points(Template::Burst, 100_000));
        assert!(sphere > burst, "sphere {sphere} vs burst {burst}");
    }

    #[test]
    fn heart_depth_is_only_jitter() {
        let ps = points(Template::Heart, 10_000);
        for p in &ps {
            assert!(p.z >= -1.0 && p.z <= 1.0);
            // |16 sin³t| ≤ 16 → |x| ≤ 0.64; |y| ≤ 21 → ≤ 0.84
            assert!(p.x.abs() <= 16.0 / 20.0 * 0.8 + EPS);
            assert!(p.y.abs() <= 21.0 / 20.0 * 0.8 + EPS);
        }
    }

    #[test]
    fn flower_bounds() {
        for p in points(Template::Flower, 10_000) {
            assert!(p.x.abs() <= 2.0 + EPS && p.y.abs() <= 2.0 + EPS);
            assert!(p.z >= -0.5 && p.z <= 0.5);
        }
    }

    #[test]
    fn ring_and_core_split() {
        let ps = points(Template::RingAndCore, 20_000);
        let mut ring = 0usize;
        for p in &ps {
            let planar = (p.x * p.x + p.z * p.z).sqrt();
            if planar >= RING_INNER - EPS {
                assert!(planar <= RING_OUTER + EPS);
                assert!(p.y.abs() <= 0.1 + EPS);
                ring += 1;
            } else {
                assert!(p.norm() <= CORE_RADIUS + EPS);
            }
        }
        let share = ring as f32 / ps.len() as f32;
        assert!((share - RING_SHARE).abs() < 0.02, "ring share {share}");
    }

    #[test]
    fn humanoid_points_fall_in_a_region() {
        let ps = points(Template::Humanoid, 20_000);
        let (mut head, mut torso, mut base) = (0usize, 0usize, 0usize);
        for p in &ps {
            if p.y >= 1.2 {
                assert!(p.x.abs() <= 0.4 + EPS && p.z.abs() <= 0.4 + EPS);
                head += 1;
            } else if p.y >= 0.5 {
                assert!(p.x.abs() <= 0.6 + EPS && p.z.abs() <= 0.4 + EPS);
                torso += 1;
            } else {
                assert!(p.y <= 0.3 + EPS);
                assert!(p.x.abs() <= 0.75 + EPS && p.z.abs() <= 0.75 + EPS);
                base += 1;
            }
        }
        let n = ps.len() as f32;
        assert!((head  as f32 / n - 0.3).abs() < 0.02);
        assert!((torso as f32 / n - 0.3).abs() < 0.02);
        assert!((base  as f32 / n - 0.4).abs() < 0.02);
    }

    #[test]
    fn table_order_matches_templates() {
        let mut a = index_rng(9, 0);
        let mut b = index_rng(9, 0);
        assert_eq!(sample(Template::Heart, 0, 1, &mut a), heart(&mut b));
        let mut a = index_rng(9, 1);
        let mut b = index_rng(9, 1);
        assert_eq!(sample(Template::Burst, 1, 2, &mut a), burst(&mut b));
    }
}
