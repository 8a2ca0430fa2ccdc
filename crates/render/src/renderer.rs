//! Maps the density field to palette colors and paints cell rectangles.

use stillwater_sim::FluidSim;

use crate::surface::Surface;

/// Densities at or below this threshold are not painted.
pub const VISIBLE_THRESHOLD: f64 = 0.001;
/// Density is normalized against this scale before the palette lookup.
pub const DENSITY_SCALE: f64 = 100.0;
/// Painted alpha never exceeds this cap.
pub const ALPHA_MAX: f64 = 0.75;
/// Weight of normalized density in the alpha blend.
const DENSITY_ALPHA_WEIGHT: f64 = 0.6;
/// Weight of local velocity magnitude in the alpha blend.
const VELOCITY_ALPHA_WEIGHT: f64 = 0.4;
/// Gain applied to velocity magnitude before it saturates at 1.
const VELOCITY_ALPHA_GAIN: f64 = 4.0;

/// Paints the simulator's density field onto the surface.
///
/// Each cell with visible density is normalized, mapped through the active
/// palette, and composited as one rectangle covering the cell's
/// screen-space extent (`surface_extent / n` per axis). Alpha blends
/// normalized density with local velocity magnitude so fast-moving dye
/// reads brighter, capped at [`ALPHA_MAX`]. A no-op before the simulator
/// is initialized.
pub fn paint(sim: &FluidSim, surface: &mut Surface) {
    let Some(grid) = sim.grid() else {
        return;
    };
    let n = grid.n();
    let palette = sim.palette();
    let cell_w = surface.width() as f64 / n as f64;
    let cell_h = surface.height() as f64 / n as f64;

    for j in 0..n {
        for i in 0..n {
            let idx = grid.idx(i, j);
            let d = grid.density[idx];
            if d <= VISIBLE_THRESHOLD {
                continue;
            }
            let t = (d / DENSITY_SCALE).min(1.0);
            let color = palette.sample(t);

            let speed = (grid.vx[idx] * grid.vx[idx] + grid.vy[idx] * grid.vy[idx]).sqrt();
            let motion = (speed * VELOCITY_ALPHA_GAIN).min(1.0);
            let alpha =
                (DENSITY_ALPHA_WEIGHT * t + VELOCITY_ALPHA_WEIGHT * motion).min(ALPHA_MAX);

            let x0 = (i as f64 * cell_w).round() as u32;
            let y0 = (j as f64 * cell_h).round() as u32;
            let x1 = ((i + 1) as f64 * cell_w).round() as u32;
            let y1 = ((j + 1) as f64 * cell_h).round() as u32;
            surface.blend_rect(x0, y0, x1 - x0, y1 - y0, color, alpha);
        }
    }
}
