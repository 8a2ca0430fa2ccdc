//! Deterministic Xorshift64 PRNG.
//!
//! Drives the ambient stimuli and pre-warm seeding. Seedable and pure
//! integer arithmetic, so two simulators built from the same seed replay
//! the exact same ambient motion on every platform.

use serde::{Deserialize, Serialize};

/// Xorshift64 PRNG. Same seed always produces the same sequence.
///
/// Uses the standard shift triple (13, 7, 17). A seed of 0 is replaced
/// with a non-zero fallback to avoid the all-zeros fixed point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Used when the caller passes seed 0, which xorshift cannot escape.
    const FALLBACK_SEED: u64 = 0xB1E5_5ED0_0F1D_E5CE;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns a uniformly distributed f64 in [0, 1).
    ///
    /// Uses the top 53 bits for full mantissa precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns a uniformly distributed f64 in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a uniformly distributed usize in [0, max).
    ///
    /// # Panics
    ///
    /// Panics if `max` is 0.
    pub fn next_usize(&mut self, max: usize) -> usize {
        (self.next_u64() as usize) % max
    }
}
