//! Forcing and input adaptation: gaussian impulse splats, drag-gesture
//! mapping, and the ambient stimuli that keep the visual moving when idle.
//!
//! Impulses add to the existing field values, so repeated touches
//! accumulate. All splat centers are clamped into the interior; an
//! edge-of-screen touch lands on the nearest interior cell instead of
//! failing.

use glam::DVec2;
use stillwater_core::{FluidGrid, Xorshift64};

/// Splat radius in cells: impulses cover a 7x7 neighborhood.
pub const SPLAT_RADIUS: isize = 3;
/// Gaussian falloff divisor for the fixed-radius splats.
const SPLAT_FALLOFF: f64 = 8.0;
/// Frames between ambient dye blobs.
const AMBIENT_DYE_INTERVAL: u64 = 60;
/// Radians the ambient orbit advances per frame.
const ORBIT_RATE: f64 = 0.02;
/// Orbit radius as a fraction of the grid side.
const ORBIT_RADIUS: f64 = 0.25;

/// A localized impulse, queued from input callbacks and applied at the top
/// of each step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Impulse {
    /// Velocity impulse centered at grid cell `(x, y)`.
    Force { x: usize, y: usize, fx: f64, fy: f64 },
    /// Dye impulse centered at grid cell `(x, y)`.
    Dye { x: usize, y: usize, amount: f64 },
}

/// Applies a queued impulse to the grid.
pub fn apply(grid: &mut FluidGrid, impulse: Impulse) {
    match impulse {
        Impulse::Force { x, y, fx, fy } => add_force(grid, x, y, fx, fy),
        Impulse::Dye { x, y, amount } => add_density(grid, x, y, amount),
    }
}

/// Clamps a cell coordinate into the interior `[1, n-2]`.
#[inline]
fn clamp_interior(v: usize, n: usize) -> usize {
    v.clamp(1, n - 2)
}

/// Offsets `c` by `d`, returning `None` if the result leaves the interior.
#[inline]
fn interior_offset(c: usize, d: isize, n: usize) -> Option<usize> {
    let v = c as isize + d;
    if v >= 1 && v <= n as isize - 2 {
        Some(v as usize)
    } else {
        None
    }
}

/// Adds a velocity impulse with gaussian falloff around `(x, y)`.
///
/// The center is clamped to the interior; cells of the 7x7 stencil that
/// fall outside the interior are skipped.
pub fn add_force(grid: &mut FluidGrid, x: usize, y: usize, fx: f64, fy: f64) {
    let n = grid.n();
    let cx = clamp_interior(x, n);
    let cy = clamp_interior(y, n);
    for dy in -SPLAT_RADIUS..=SPLAT_RADIUS {
        for dx in -SPLAT_RADIUS..=SPLAT_RADIUS {
            let (Some(i), Some(j)) = (interior_offset(cx, dx, n), interior_offset(cy, dy, n))
            else {
                continue;
            };
            let w = (-((dx * dx + dy * dy) as f64) / SPLAT_FALLOFF).exp();
            let idx = grid.idx(i, j);
            grid.vx[idx] += fx * w;
            grid.vy[idx] += fy * w;
        }
    }
}

/// Adds a dye impulse with gaussian falloff around `(x, y)`.
pub fn add_density(grid: &mut FluidGrid, x: usize, y: usize, amount: f64) {
    let n = grid.n();
    let cx = clamp_interior(x, n);
    let cy = clamp_interior(y, n);
    for dy in -SPLAT_RADIUS..=SPLAT_RADIUS {
        for dx in -SPLAT_RADIUS..=SPLAT_RADIUS {
            let (Some(i), Some(j)) = (interior_offset(cx, dx, n), interior_offset(cy, dy, n))
            else {
                continue;
            };
            let w = (-((dx * dx + dy * dy) as f64) / SPLAT_FALLOFF).exp();
            let idx = grid.idx(i, j);
            grid.density[idx] += amount * w;
        }
    }
}

/// Adds a wide, soft dye deposit with caller-supplied radius.
///
/// Only used for pre-warm seeding so the first visible frame is not empty.
pub fn add_smooth_density(grid: &mut FluidGrid, x: usize, y: usize, amount: f64, radius: f64) {
    let n = grid.n();
    let cx = clamp_interior(x, n);
    let cy = clamp_interior(y, n);
    let r = radius.ceil().max(1.0) as isize;
    let falloff = radius * 1.5;
    for dy in -r..=r {
        for dx in -r..=r {
            let (Some(i), Some(j)) = (interior_offset(cx, dx, n), interior_offset(cy, dy, n))
            else {
                continue;
            };
            let w = (-((dx * dx + dy * dy) as f64) / falloff).exp();
            let idx = grid.idx(i, j);
            grid.density[idx] += amount * w;
        }
    }
}

/// Seeds a freshly zeroed grid with a few soft dye blobs and gentle
/// currents so the first rendered frame already has something to show.
pub fn prewarm(grid: &mut FluidGrid, rng: &mut Xorshift64) {
    let n = grid.n();
    let interior = n - 2;
    for _ in 0..4 {
        let x = 1 + rng.next_usize(interior);
        let y = 1 + rng.next_usize(interior);
        let amount = rng.next_range(20.0, 50.0);
        let radius = rng.next_range(4.0, 9.0);
        add_smooth_density(grid, x, y, amount, radius);
        let fx = rng.next_range(-0.05, 0.05);
        let fy = rng.next_range(-0.05, 0.05);
        add_force(grid, x, y, fx, fy);
    }
}

/// Tracks one drag gesture: down -> move xN -> up/cancel.
///
/// Positions are screen-space; the simulator converts the returned deltas
/// into grid impulses. Transient, never persisted.
#[derive(Debug, Default)]
pub struct PointerTracker {
    last: Option<DVec2>,
}

impl PointerTracker {
    /// Starts a gesture at `pos`.
    pub fn press(&mut self, pos: DVec2) {
        self.last = Some(pos);
    }

    /// Ends the gesture. Velocity decay handles the trailing motion.
    pub fn release(&mut self) {
        self.last = None;
    }

    /// Advances the gesture to `pos`, returning the delta from the previous
    /// position. Returns `None` when no gesture is active.
    pub fn drag(&mut self, pos: DVec2) -> Option<DVec2> {
        let delta = pos - self.last?;
        self.last = Some(pos);
        Some(delta)
    }

    /// Whether a gesture is currently active.
    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }
}

/// Injects the per-frame ambient stimuli: one force along a slowly rotating
/// circular path, a few small random nudges, and a periodic dye blob.
///
/// Purely a design choice to keep the calming visual in motion; hosts can
/// disable it via `SimParams::ambient`.
#[derive(Debug, Clone)]
pub struct AmbientDriver {
    frame: u64,
}

impl AmbientDriver {
    pub fn new() -> Self {
        Self { frame: 0 }
    }

    /// Runs one frame of ambient forcing.
    pub fn inject(&mut self, grid: &mut FluidGrid, rng: &mut Xorshift64, force: f64, dye: f64) {
        let n = grid.n();
        let nf = n as f64;
        let interior = n - 2;

        // One tangential push along the orbit keeps a slow circulation going.
        let angle = self.frame as f64 * ORBIT_RATE;
        let ox = (nf * 0.5 + angle.cos() * nf * ORBIT_RADIUS) as usize;
        let oy = (nf * 0.5 + angle.sin() * nf * ORBIT_RADIUS) as usize;
        add_force(grid, ox, oy, -angle.sin() * force, angle.cos() * force);

        // 2-3 small random nudges.
        let nudges = 2 + rng.next_usize(2);
        for _ in 0..nudges {
            let x = 1 + rng.next_usize(interior);
            let y = 1 + rng.next_usize(interior);
            let fx = rng.next_range(-force, force) * 0.5;
            let fy = rng.next_range(-force, force) * 0.5;
            add_force(grid, x, y, fx, fy);
        }

        if self.frame % AMBIENT_DYE_INTERVAL == 0 {
            let x = 1 + rng.next_usize(interior);
            let y = 1 + rng.next_usize(interior);
            add_density(grid, x, y, dye);
        }

        self.frame += 1;
    }
}

impl Default for AmbientDriver {
    fn default() -> Self {
        Self::new()
    }
}
