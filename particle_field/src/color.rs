//! Linear RGB triples with every channel in `[0, 1]`.

use crate::field::FieldError;

/// A color as three channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// `#ff69b4`, the initial particle color.
    pub const HOT_PINK: Rgb = Rgb { r: 1.0, g: 105.0 / 255.0, b: 180.0 / 255.0 };
    pub const WHITE:    Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    /// Build a color, rejecting channels outside `[0, 1]` (and NaN).
    pub fn new(r: f32, g: f32, b: f32) -> Result<Self, FieldError> {
        for c in [r, g, b] {
            if !(0.0..=1.0).contains(&c) {
                return Err(FieldError::InvalidColor(c));
            }
        }
        Ok(Rgb { r, g, b })
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(s: &str) -> Result<Self, FieldError> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(FieldError::InvalidHex(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| FieldError::InvalidHex(s.to_string()))
        };
        Ok(Rgb { r: channel(0)?, g: channel(2)?, b: channel(4)? })
    }

    /// Pack into `0xFFRRGGBB` for a framebuffer.
    pub fn to_argb(self) -> u32 {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        0xFF000000 | (q(self.r) << 16) | (q(self.g) << 8) | q(self.b)
    }

    /// Gray tint used for the envelope: mean brightness boosted by half,
    /// capped at white.
    pub fn envelope_tint(self) -> Rgb {
        let level = ((self.r + self.g + self.b) / 3.0 * 1.5).min(1.0);
        Rgb { r: level, g: level, b: level }
    }

    pub fn as_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Rgb {
    fn default() -> Self { Rgb::HOT_PINK }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
