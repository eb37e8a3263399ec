//! Deterministic warrior-placement randomness.
//!
//! The generator is the MINSTD Park-Miller LCG, implemented directly so
//! placements reproduce pMARS bit for bit. A generic RNG must not be
//! substituted here; `rand` is only consulted for the initial state
//! when the caller declines to fix the seed.

use crate::config::ConfigError;

/// MINSTD modulus, `2^31 - 1`.
const RNG_MODULUS: i64 = 2_147_483_647;
/// Fixed seeds are interpreted as start positions modulo `2^30 + 1`.
const FIXED_SEED_MODULUS: i64 = 1_073_741_825;

/// Placement state for one tournament.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRng {
    state: i64,
}

impl PlacementRng {
    /// Builds the generator from the caller's seed.
    ///
    /// A positive seed is a fixed start position taken modulo
    /// `2^30 + 1`; a zero residue falls back to OS entropy, and a
    /// residue below `min_distance` is rejected. Non-positive seeds
    /// always draw the state from OS entropy.
    ///
    /// # Errors
    ///
    /// [`ConfigError::FixedPositionBelowMinDistance`] when a positive
    /// seed resolves below `min_distance`.
    pub fn from_seed(seed: i64, min_distance: i32) -> Result<Self, ConfigError> {
        if seed <= 0 {
            return Ok(Self::from_entropy());
        }
        let residue = seed.rem_euclid(FIXED_SEED_MODULUS);
        if residue == 0 {
            return Ok(Self::from_entropy());
        }
        if residue < i64::from(min_distance) {
            return Err(ConfigError::FixedPositionBelowMinDistance);
        }
        Ok(Self {
            state: (residue - i64::from(min_distance)).rem_euclid(RNG_MODULUS),
        })
    }

    fn from_entropy() -> Self {
        Self {
            state: i64::from(rand::random::<u32>()).rem_euclid(RNG_MODULUS),
        }
    }

    /// Next placement offset in `[0, placements)`.
    ///
    /// The state advances exactly once per call, whatever `placements`
    /// is, so round placements stay aligned with pMARS.
    pub fn next_offset(&mut self, placements: i32) -> i32 {
        let offset = self.state.rem_euclid(i64::from(placements)) as i32;
        self.state = advance(self.state);
        offset
    }
}

const fn advance(state: i64) -> i64 {
    let next = 16807 * (state % 127_773) - 2836 * (state / 127_773);
    if next <= 0 {
        next + RNG_MODULUS
    } else {
        next
    }
}
