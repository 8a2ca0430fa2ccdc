//! Color palettes sampled by interpolation.
//!
//! A palette is an ordered sequence of at least two sRGB stops, evenly
//! spaced along the `t` parameter. The renderer maps normalized dye density
//! to `t` and blends the two bracketing stops. Swapping the palette is a
//! pure rendering change; the solver never sees it.

use crate::color::Srgb;
use crate::error::SimError;

/// An ordered sequence of color stops sampled by linear interpolation.
///
/// `sample(0.0)` returns the first stop, `sample(1.0)` the last.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<Srgb>,
}

impl Palette {
    /// Creates a palette from a vector of colors.
    ///
    /// Requires at least two colors — a single stop cannot express the
    /// density gradient the renderer relies on.
    pub fn new(colors: Vec<Srgb>) -> Result<Self, SimError> {
        if colors.len() < 2 {
            return Err(SimError::InvalidPalette(
                "palette requires at least 2 colors".to_string(),
            ));
        }
        Ok(Self { colors })
    }

    /// Creates a palette by parsing hex color strings.
    ///
    /// Each string can be "#rrggbb" or "rrggbb" (case insensitive).
    pub fn from_hex(hexes: &[&str]) -> Result<Self, SimError> {
        let colors: Result<Vec<Srgb>, SimError> =
            hexes.iter().map(|h| Srgb::from_hex(h)).collect();
        Self::new(colors?)
    }

    /// Number of color stops.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed palette; present for API completeness.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Samples the palette at `t` in [0, 1].
    ///
    /// Maps `t` to a segment between two adjacent stops and blends them with
    /// a component-wise lerp. `t` is clamped; NaN samples the first stop.
    pub fn sample(&self, t: f64) -> Srgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = self.colors.len() - 1;
        let scaled = t * segments as f64;
        let idx = (scaled as usize).min(segments - 1);
        let frac = scaled - idx as f64;
        self.colors[idx].lerp(self.colors[idx + 1], frac)
    }

    // -- Built-in palettes --

    /// Midnight blues into pale foam. The default look.
    pub fn deep_sea() -> Self {
        Self::from_hex(&[
            "#03045e", "#023e8a", "#0077b6", "#0096c7", "#48cae4", "#ade8f4", "#caf0f8",
        ])
        .expect("deep_sea palette hex values are valid")
    }

    /// Warm teals and sandy greens.
    pub fn lagoon() -> Self {
        Self::from_hex(&[
            "#014d4e", "#0a6e6f", "#2a9d8f", "#57c5b6", "#9ae3d0", "#e9f5db",
        ])
        .expect("lagoon palette hex values are valid")
    }

    /// Violet evening light fading to rose.
    pub fn dusk() -> Self {
        Self::from_hex(&[
            "#10002b", "#3c096c", "#5a189a", "#7b2cbf", "#c77dff", "#ffafcc", "#ffe5ec",
        ])
        .expect("dusk palette hex values are valid")
    }

    /// Greens and cold cyans over a dark sky.
    pub fn aurora() -> Self {
        Self::from_hex(&[
            "#081c15", "#1b4332", "#2d6a4f", "#40916c", "#74c69d", "#b7e4c7", "#d8f3dc",
        ])
        .expect("aurora palette hex values are valid")
    }

    /// Slow coals, deep reds into gold.
    pub fn ember() -> Self {
        Self::from_hex(&[
            "#370617", "#6a040f", "#9d0208", "#dc2f02", "#f48c06", "#ffba08",
        ])
        .expect("ember palette hex values are valid")
    }

    /// Soft greys for a near-monochrome mood.
    pub fn mist() -> Self {
        Self::from_hex(&[
            "#212529", "#343a40", "#495057", "#6c757d", "#adb5bd", "#dee2e6", "#f8f9fa",
        ])
        .expect("mist palette hex values are valid")
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::deep_sea()
    }
}
