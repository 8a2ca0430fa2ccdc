//! sRGB color with hex parsing and linear interpolation.
//!
//! Palette interpolation happens directly in sRGB: the visual maps dye
//! density to a blend of two adjacent palette stops, and the plain
//! component-wise lerp is the look this effect is built around. Uses `f64`
//! components in [0, 1].

use crate::error::SimError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`. The hex round-trip has 8-bit
/// quantization, which is all the output surface can represent anyway.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    /// Parses a hex color string like "#7fb0c8" or "7fb0c8" (case insensitive).
    ///
    /// Returns `SimError::InvalidColor` if the input is not a 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, SimError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return Err(SimError::InvalidColor(format!(
                "expected 6 hex digits, got {}",
                hex.len()
            )));
        }
        let r = u8::from_str_radix(&hex[0..2], 16)
            .map_err(|e| SimError::InvalidColor(format!("invalid red component: {e}")))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .map_err(|e| SimError::InvalidColor(format!("invalid green component: {e}")))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .map_err(|e| SimError::InvalidColor(format!("invalid blue component: {e}")))?;
        Ok(Srgb {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        })
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Quantizes the components to 8-bit with rounding.
    pub fn to_rgb8(self) -> [u8; 3] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Component-wise linear interpolation toward `other`.
    ///
    /// `t = 0` returns `self`, `t = 1` returns `other`. `t` is clamped to [0, 1].
    pub fn lerp(self, other: Srgb, t: f64) -> Srgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        Srgb {
            r: self.r + t * (other.r - self.r),
            g: self.g + t * (other.g - self.g),
            b: self.b + t * (other.b - self.b),
        }
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
