//! PNG export of a rendered surface.

use std::path::Path;

use stillwater_core::SimError;

use crate::surface::Surface;

/// Writes the surface to `path` as an RGBA PNG.
pub fn write_png(surface: &Surface, path: &Path) -> Result<(), SimError> {
    let img = image::RgbaImage::from_raw(
        surface.width(),
        surface.height(),
        surface.pixels().to_vec(),
    )
    .ok_or_else(|| SimError::Io("surface buffer does not match its dimensions".into()))?;
    img.save(path).map_err(|e| SimError::Io(e.to_string()))
}
