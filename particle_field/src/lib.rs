//! # particle_field
//!
//! Procedural point fields for the gesture-scaled particle display.
//!
//! * [`Template`]: the closed set of shapes a field can take.
//! * [`sampler`]: one sampling law per template, dispatched through a table.
//! * [`PointField`]: base positions + per-point colors, regenerated wholesale
//!   on template/count change and recolored in place on color change.
//! * [`BoundingEnvelope`]: a flattened dome sized per template, scaled in
//!   lock-step with the field.
//!
//! ## Quick start
//!
//! ```rust
//! use particle_field::{PointField, BoundingEnvelope, Template, Rgb};
//!
//! let mut field = PointField::new(Template::Heart, 2000, Rgb::HOT_PINK, 7).unwrap();
//! let envelope  = BoundingEnvelope::new(Template::Heart, Rgb::HOT_PINK);
//!
//! let frame = field.compute_scaled(1.5);
//! assert_eq!(frame.len(), 2000);
//! assert_eq!(envelope.radius(), 3.0);
//! ```

pub mod color;
pub mod envelope;
pub mod field;
pub mod sampler;
pub mod template;

pub use color::Rgb;
pub use envelope::BoundingEnvelope;
pub use field::{FieldError, PointField};
pub use template::Template;

/// A 3-vector in field space.
pub type Point = nalgebra::Vector3<f32>;
