//! Error types shared across the stillwater workspace.

use thiserror::Error;

/// Errors produced by simulator and renderer operations.
#[derive(Debug, Error)]
pub enum SimError {
    /// A grid side length or surface dimension was too small or overflowed.
    #[error("invalid dimensions: grid and surface dimensions must be non-zero")]
    InvalidDimensions,

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// A snapshot could not be written.
    #[error("i/o error: {0}")]
    Io(String),
}
