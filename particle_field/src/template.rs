//! The closed set of procedural shapes.

use std::fmt;

/// Which sampling law a field is generated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Template {
    /// Solid ball, uniform in volume.
    #[default]
    Sphere,
    /// Parametric heart outline with depth jitter.
    Heart,
    /// Eight-petal polar rosette.
    Flower,
    /// Thin flat ring around a small solid core.
    RingAndCore,
    /// Head / torso / base stack of boxes.
    Humanoid,
    /// Radial burst, dense toward the center.
    Burst,
}

impl Template {
    /// Every template, in selector order.
    pub const ALL: [Template; 6] = [
        Template::Sphere,
        Template::Heart,
        Template::Flower,
        Template::RingAndCore,
        Template::Humanoid,
        Template::Burst,
    ];

    /// Canonical selector value.
    pub fn name(self) -> &'static str {
        match self {
            Template::Sphere      => "sphere",
            Template::Heart       => "heart",
            Template::Flower      => "flower",
            Template::RingAndCore => "saturn",
            Template::Humanoid    => "buddha",
            Template::Burst       => "fireworks",
        }
    }

    /// Position in [`Template::ALL`]; also the sampler table slot.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse a selector value. Unknown names fail closed to [`Template::Sphere`].
    pub fn parse(name: &str) -> Template {
        Self::lookup(name).unwrap_or_else(|| {
            log::warn!("unknown template {:?}; falling back to sphere", name);
            Template::Sphere
        })
    }

    /// Strict lookup, `None` for unknown names.
    pub fn lookup(name: &str) -> Option<Template> {
        let t = match name.trim().to_ascii_lowercase().as_str() {
            "sphere"                               => Template::Sphere,
            "heart"                                => Template::Heart,
            "flower"                               => Template::Flower,
            "saturn" | "ring-and-core" | "ring"    => Template::RingAndCore,
            "buddha" | "humanoid"                  => Template::Humanoid,
            "fireworks" | "explosion" | "burst"    => Template::Burst,
            _ => return None,
        };
        Some(t)
    }

    /// Radius of the bounding dome for this template.
    pub fn envelope_radius(self) -> f32 {
        match self {
            Template::Heart | Template::Flower => 3.0,
            Template::RingAndCore              => 4.0,
            _                                  => 3.5,
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
