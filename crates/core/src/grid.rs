//! Square field storage for the fluid solver.
//!
//! A `FluidGrid` owns six n×n row-major `f64` fields: dye density, the two
//! velocity components, and a previous-step scratch buffer for each. Unlike
//! a clamped image field, values are unbounded and signed — the solver needs
//! negative velocities and transient undershoot. Interior loops run over
//! `1..n-1`; boundary cells are only ever written by the solver's explicit
//! mirroring pass. Callers are trusted to stay in bounds.

use crate::error::SimError;

/// Smallest usable grid: one interior cell surrounded by boundary cells.
pub const MIN_GRID_SIZE: usize = 3;

/// The n×n scalar and vector fields the solver mutates in place.
///
/// Fields are public so the solver and forcing code can split-borrow them
/// (e.g. read `vx_prev` while writing `vx`) without accessor gymnastics.
/// All six vectors always have length `n * n`.
#[derive(Debug, Clone)]
pub struct FluidGrid {
    n: usize,
    /// Dye concentration. Conceptually non-negative; not hard-clamped.
    pub density: Vec<f64>,
    /// Previous-step density, input to diffusion/advection.
    pub density_prev: Vec<f64>,
    /// Velocity x component.
    pub vx: Vec<f64>,
    /// Velocity y component.
    pub vy: Vec<f64>,
    /// Previous-step velocity x, also reused as projection scratch.
    pub vx_prev: Vec<f64>,
    /// Previous-step velocity y, also reused as projection scratch.
    pub vy_prev: Vec<f64>,
}

impl FluidGrid {
    /// Creates a zero-filled grid with side length `n`.
    ///
    /// Returns `SimError::InvalidDimensions` if `n < MIN_GRID_SIZE` or if
    /// `n * n` overflows `usize`.
    pub fn new(n: usize) -> Result<Self, SimError> {
        if n < MIN_GRID_SIZE {
            return Err(SimError::InvalidDimensions);
        }
        let len = n.checked_mul(n).ok_or(SimError::InvalidDimensions)?;
        Ok(Self {
            n,
            density: vec![0.0; len],
            density_prev: vec![0.0; len],
            vx: vec![0.0; len],
            vy: vec![0.0; len],
            vx_prev: vec![0.0; len],
            vy_prev: vec![0.0; len],
        })
    }

    /// Grid side length in cells.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Flat index of cell `(i, j)` in row-major order.
    #[inline]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        j * self.n + i
    }

    /// Zeroes every cell of every field without reallocating.
    pub fn reset(&mut self) {
        self.density.fill(0.0);
        self.density_prev.fill(0.0);
        self.vx.fill(0.0);
        self.vy.fill(0.0);
        self.vx_prev.fill(0.0);
        self.vy_prev.fill(0.0);
    }

    /// Sum of the density field over all cells.
    pub fn total_density(&self) -> f64 {
        self.density.iter().sum()
    }
}
