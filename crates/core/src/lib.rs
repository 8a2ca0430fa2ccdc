#![deny(unsafe_code)]
//! Core types for the stillwater fluid visual.
//!
//! Provides the `FluidGrid` field storage, color types (`Srgb`), `Palette`,
//! the `Xorshift64` PRNG, JSON parameter helpers, and the shared `SimError`
//! type. The solver and renderer live in their own crates and build on top
//! of these.

pub mod color;
pub mod error;
pub mod grid;
pub mod palette;
pub mod params;
pub mod prng;

pub use color::Srgb;
pub use error::SimError;
pub use grid::FluidGrid;
pub use palette::Palette;
pub use prng::Xorshift64;
