//! Battle parameters and their validation.
//!
//! The absolute caps below are deliberately far below what pMARS allows:
//! this engine is built to run many tournaments concurrently inside a
//! larger host, so the limits trade historical headroom for bounded
//! memory and run time per round.

use thiserror::Error;

/// Largest supported arena, 256 Ki cells.
pub const MAX_CORE_SIZE: i32 = 262_144;
/// Cap on cycles per round.
pub const MAX_CYCLES: i32 = 5_000_000;
/// Cap on live processes per warrior.
pub const MAX_PROCESSES: i32 = 131_072;
/// Absolute cap on warrior length, before the configured cap applies.
pub const MAX_WARRIOR_LENGTH: i32 = MAX_CORE_SIZE;
/// Cap on the configured minimum placement distance.
pub const MAX_MIN_DISTANCE: i32 = MAX_CORE_SIZE / 2;
/// Cap on rounds per tournament.
pub const MAX_ROUNDS: i32 = 100_000;

/// Every knob of a tournament between one pair of warriors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MatchSettings {
    /// Arena size; the modulus of all address arithmetic.
    pub core_size: i32,
    /// Cycles per round before the round is called a tie.
    pub max_cycles: i32,
    /// Per-warrior process cap enforced by SPL.
    pub max_processes: i32,
    /// Distance cap folded into every operand read.
    pub read_limit: i32,
    /// Distance cap folded into every operand write.
    pub write_limit: i32,
    /// Minimum distance between the two warriors' load addresses.
    pub min_distance: i32,
    /// Configured cap on instructions per warrior.
    pub max_warrior_length: i32,
    /// Rounds to play (the tournament may stop early).
    pub rounds: i32,
    /// Placement seed; non-positive draws from OS entropy.
    pub seed: i64,
}

impl Default for MatchSettings {
    /// The classic ICWS'94 tournament setup.
    fn default() -> Self {
        Self {
            core_size: 8000,
            max_cycles: 80_000,
            max_processes: 8000,
            read_limit: 8000,
            write_limit: 8000,
            min_distance: 100,
            max_warrior_length: 100,
            rounds: 10,
            seed: 0,
        }
    }
}

/// Rejected configurations. Each variant renders the exact message the
/// battle boundary reports after its `ERROR: ` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `core_size < 2`.
    #[error("Core size must be at least 2")]
    CoreSizeTooSmall,
    /// `core_size > MAX_CORE_SIZE`.
    #[error("Core size exceeds maximum supported value of {}", MAX_CORE_SIZE)]
    CoreSizeTooLarge,
    /// `max_cycles` outside `[1, MAX_CYCLES]`.
    #[error("Max cycles must be between 1 and {}", MAX_CYCLES)]
    MaxCyclesOutOfRange,
    /// `max_processes` outside `[1, MAX_PROCESSES]`.
    #[error("Max processes must be between 1 and {}", MAX_PROCESSES)]
    MaxProcessesOutOfRange,
    /// `read_limit` outside `[1, core_size]`.
    #[error("Read limit must be between 1 and the core size")]
    ReadLimitOutOfRange,
    /// `write_limit` outside `[1, core_size]`.
    #[error("Write limit must be between 1 and the core size")]
    WriteLimitOutOfRange,
    /// `min_distance` outside `[0, MAX_MIN_DISTANCE]`.
    #[error("Min distance must be between 0 and {}", MAX_MIN_DISTANCE)]
    MinDistanceOutOfRange,
    /// `min_distance > core_size / 2`.
    #[error("Min distance is too large for the given core size")]
    MinDistanceTooLargeForCore,
    /// `min_distance < max_warrior_length`, which would let warriors
    /// overlap at load time.
    #[error("Min distance must be greater than or equal to max warrior length to prevent overlap")]
    MinDistanceBelowWarriorLength,
    /// `max_warrior_length` outside `[1, MAX_WARRIOR_LENGTH]`.
    #[error("Max warrior length must be between 1 and {}", MAX_WARRIOR_LENGTH)]
    WarriorLengthOutOfRange,
    /// `max_warrior_length > core_size`.
    #[error("Max warrior length cannot exceed the core size")]
    WarriorLengthExceedsCore,
    /// `rounds` outside `[1, MAX_ROUNDS]`.
    #[error("Number of rounds must be between 1 and {}", MAX_ROUNDS)]
    RoundsOutOfRange,
    /// `core_size - 2 * min_distance + 1 <= 0`: nowhere to place
    /// warrior 1.
    #[error("Core size is too small for the configured warrior distance")]
    NoValidPlacements,
    /// A positive seed resolved to a start position below
    /// `min_distance`.
    #[error("Fixed warrior position cannot be smaller than the configured minimum distance")]
    FixedPositionBelowMinDistance,
}

/// Checks every parameter bound.
///
/// # Errors
///
/// Returns the first violated bound as a [`ConfigError`].
pub fn validate_settings(settings: &MatchSettings) -> Result<(), ConfigError> {
    if settings.core_size < 2 {
        return Err(ConfigError::CoreSizeTooSmall);
    }
    if settings.core_size > MAX_CORE_SIZE {
        return Err(ConfigError::CoreSizeTooLarge);
    }
    if settings.max_cycles <= 0 || settings.max_cycles > MAX_CYCLES {
        return Err(ConfigError::MaxCyclesOutOfRange);
    }
    if settings.max_processes <= 0 || settings.max_processes > MAX_PROCESSES {
        return Err(ConfigError::MaxProcessesOutOfRange);
    }
    if settings.read_limit <= 0 || settings.read_limit > settings.core_size {
        return Err(ConfigError::ReadLimitOutOfRange);
    }
    if settings.write_limit <= 0 || settings.write_limit > settings.core_size {
        return Err(ConfigError::WriteLimitOutOfRange);
    }
    if settings.min_distance < 0 || settings.min_distance > MAX_MIN_DISTANCE {
        return Err(ConfigError::MinDistanceOutOfRange);
    }
    if settings.min_distance > settings.core_size / 2 {
        return Err(ConfigError::MinDistanceTooLargeForCore);
    }
    if settings.min_distance < settings.max_warrior_length {
        return Err(ConfigError::MinDistanceBelowWarriorLength);
    }
    if settings.max_warrior_length <= 0 || settings.max_warrior_length > MAX_WARRIOR_LENGTH {
        return Err(ConfigError::WarriorLengthOutOfRange);
    }
    if settings.max_warrior_length > settings.core_size {
        return Err(ConfigError::WarriorLengthExceedsCore);
    }
    if settings.rounds <= 0 || settings.rounds > MAX_ROUNDS {
        return Err(ConfigError::RoundsOutOfRange);
    }
    Ok(())
}
