#![deny(unsafe_code)]
//! Rasterization of the fluid's density field onto an RGBA surface.
//!
//! The renderer reads the simulator's density and velocity fields, maps
//! density through the active palette, and paints one alpha-blended
//! rectangle per visible cell. The grid resolution is the resolution of
//! the visual; there is no anti-aliasing or sub-cell smoothing.

pub mod renderer;
pub mod surface;

#[cfg(feature = "png")]
pub mod snapshot;

pub use renderer::{paint, ALPHA_MAX, DENSITY_SCALE, VISIBLE_THRESHOLD};
pub use surface::Surface;
