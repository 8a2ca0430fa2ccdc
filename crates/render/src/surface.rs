//! An owned RGBA8 pixel buffer with alpha-blended rectangle painting.

use stillwater_core::{SimError, Srgb};

/// A width×height RGBA8 drawing surface.
///
/// The surface is always fully opaque: blending composites the source color
/// over the existing pixel and writes alpha 255.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Creates a surface filled with opaque black.
    ///
    /// Returns `SimError::InvalidDimensions` if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidDimensions);
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|p| p.checked_mul(4))
            .ok_or(SimError::InvalidDimensions)?;
        let mut pixels = vec![0u8; len];
        for a in pixels.iter_mut().skip(3).step_by(4) {
            *a = 255;
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read-only access to the RGBA8 pixel data, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The RGBA bytes of the pixel at `(x, y)`.
    ///
    /// Callers are expected to stay in bounds; indexing panics otherwise.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = 4 * (y as usize * self.width as usize + x as usize);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Fills the whole surface with an opaque color.
    pub fn fill(&mut self, color: Srgb) {
        let [r, g, b] = color.to_rgb8();
        for px in self.pixels.chunks_exact_mut(4) {
            px[0] = r;
            px[1] = g;
            px[2] = b;
            px[3] = 255;
        }
    }

    /// Composites a colored rectangle over the surface with the given
    /// alpha in [0, 1]. The rectangle is clipped to the surface bounds.
    pub fn blend_rect(&mut self, x0: u32, y0: u32, w: u32, h: u32, color: Srgb, alpha: f64) {
        let alpha = if alpha.is_nan() {
            0.0
        } else {
            alpha.clamp(0.0, 1.0)
        };
        if alpha == 0.0 {
            return;
        }
        let [sr, sg, sb] = color.to_rgb8();
        let x1 = x0.saturating_add(w).min(self.width);
        let y1 = y0.saturating_add(h).min(self.height);

        for y in y0..y1 {
            let row = 4 * y as usize * self.width as usize;
            for x in x0..x1 {
                let i = row + 4 * x as usize;
                self.pixels[i] = blend(sr, self.pixels[i], alpha);
                self.pixels[i + 1] = blend(sg, self.pixels[i + 1], alpha);
                self.pixels[i + 2] = blend(sb, self.pixels[i + 2], alpha);
                self.pixels[i + 3] = 255;
            }
        }
    }
}

/// Source-over blend of one 8-bit channel.
#[inline]
fn blend(src: u8, dst: u8, alpha: f64) -> u8 {
    (src as f64 * alpha + dst as f64 * (1.0 - alpha)).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white() -> Srgb {
        Srgb::from_hex("#ffffff").unwrap()
    }

    #[test]
    fn new_creates_opaque_black_surface() {
        let s = Surface::new(4, 3).unwrap();
        assert_eq!(s.width(), 4);
        assert_eq!(s.height(), 3);
        assert_eq!(s.pixels().len(), 48);
        for px in s.pixels().chunks_exact(4) {
            assert_eq!(px, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn new_with_zero_dimension_returns_error() {
        assert!(matches!(Surface::new(0, 5), Err(SimError::InvalidDimensions)));
        assert!(matches!(Surface::new(5, 0), Err(SimError::InvalidDimensions)));
    }

    #[test]
    fn fill_sets_every_pixel() {
        let mut s = Surface::new(3, 3).unwrap();
        s.fill(Srgb::from_hex("#336699").unwrap());
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(s.pixel(x, y), [0x33, 0x66, 0x99, 255]);
            }
        }
    }

    #[test]
    fn blend_rect_with_full_alpha_overwrites() {
        let mut s = Surface::new(4, 4).unwrap();
        s.blend_rect(1, 1, 2, 2, white(), 1.0);
        assert_eq!(s.pixel(1, 1), [255, 255, 255, 255]);
        assert_eq!(s.pixel(2, 2), [255, 255, 255, 255]);
        assert_eq!(s.pixel(0, 0), [0, 0, 0, 255], "outside the rect untouched");
        assert_eq!(s.pixel(3, 3), [0, 0, 0, 255]);
    }

    #[test]
    fn blend_rect_with_half_alpha_mixes() {
        let mut s = Surface::new(2, 2).unwrap();
        s.blend_rect(0, 0, 2, 2, white(), 0.5);
        let [r, g, b, a] = s.pixel(0, 0);
        assert_eq!(a, 255);
        for v in [r, g, b] {
            assert!((127..=128).contains(&v), "expected ~127.5, got {v}");
        }
    }

    #[test]
    fn blend_rect_with_zero_alpha_is_a_no_op() {
        let mut s = Surface::new(2, 2).unwrap();
        s.blend_rect(0, 0, 2, 2, white(), 0.0);
        assert_eq!(s.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn blend_rect_clips_to_surface_bounds() {
        let mut s = Surface::new(4, 4).unwrap();
        // Extends past the right and bottom edges; must not panic.
        s.blend_rect(3, 3, 10, 10, white(), 1.0);
        assert_eq!(s.pixel(3, 3), [255, 255, 255, 255]);
        assert_eq!(s.pixel(2, 2), [0, 0, 0, 255]);
    }

    #[test]
    fn blend_rect_nan_alpha_is_a_no_op() {
        let mut s = Surface::new(2, 2).unwrap();
        s.blend_rect(0, 0, 2, 2, white(), f64::NAN);
        assert_eq!(s.pixel(0, 0), [0, 0, 0, 255]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn blend_rect_never_panics_for_any_geometry(
                x0 in 0u32..100,
                y0 in 0u32..100,
                w in 0u32..200,
                h in 0u32..200,
                alpha in -1.0_f64..=2.0,
            ) {
                let mut s = Surface::new(32, 32).unwrap();
                s.blend_rect(x0, y0, w, h, white(), alpha);
                // Alpha channel stays opaque everywhere
                for px in s.pixels().chunks_exact(4) {
                    prop_assert_eq!(px[3], 255);
                }
            }
        }
    }
}
