//! Tournament controller: placement, round loop, scoring, early stop.

use crate::arena::Arena;
use crate::config::{validate_settings, ConfigError, MatchSettings};
use crate::math::normalize;
use crate::placement::PlacementRng;
use crate::round::{run_round, RoundOutcome};
use crate::trace::TraceSink;
use crate::warrior::Warrior;

/// Cumulative result of a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MatchScores {
    /// Points per warrior slot: +3 for a round win, +1 each for a tie.
    pub scores: [i32; 2],
    /// Rounds actually simulated; `0` when the identical-warrior
    /// short-circuit fired, below `settings.rounds` when the tournament
    /// stopped early.
    pub rounds_played: i32,
}

/// Plays up to `settings.rounds` rounds between two parsed warriors.
///
/// Warrior fields are normalized here, so callers may pass parser
/// output directly. Identical warriors (same normalized instructions
/// and entry offsets) short-circuit to a full-tie scoreboard without
/// touching the placement generator. After every played round the
/// tournament stops early once the score gap exceeds three points per
/// remaining round; unplayed rounds contribute nothing.
///
/// # Errors
///
/// Any [`ConfigError`] from parameter validation or seed handling.
pub fn run_match(
    warrior_0: &Warrior,
    warrior_1: &Warrior,
    settings: &MatchSettings,
    trace: &mut dyn TraceSink,
) -> Result<MatchScores, ConfigError> {
    validate_settings(settings)?;

    let warrior_0 = warrior_0.normalized(settings.core_size);
    let warrior_1 = warrior_1.normalized(settings.core_size);

    if warrior_0 == warrior_1 {
        return Ok(MatchScores {
            scores: [settings.rounds; 2],
            rounds_played: 0,
        });
    }

    let placements = settings.core_size - 2 * settings.min_distance + 1;
    if placements <= 0 {
        return Err(ConfigError::NoValidPlacements);
    }
    let mut rng = PlacementRng::from_seed(settings.seed, settings.min_distance)?;

    let mut scores = [0_i32; 2];
    let mut rounds_played = 0;

    for round in 0..settings.rounds {
        let mut arena = Arena::new(settings.core_size);

        let start_0 = 0;
        let start_1 = normalize(
            settings.min_distance + rng.next_offset(placements),
            settings.core_size,
        );
        arena.load(start_0, &warrior_0.instructions);
        arena.load(start_1, &warrior_1.instructions);

        let entries = [
            normalize(start_0 + warrior_0.entry_offset as i32, settings.core_size),
            normalize(start_1 + warrior_1.entry_offset as i32, settings.core_size),
        ];
        let first_index = (round % 2) as usize;

        trace.begin_round();
        match run_round(&mut arena, entries, settings, first_index, trace) {
            RoundOutcome::Winner(index) => scores[index] += 3,
            RoundOutcome::Tie => {
                scores[0] += 1;
                scores[1] += 1;
            }
        }

        rounds_played = round + 1;
        let remaining = settings.rounds - rounds_played;
        if (scores[0] - scores[1]).abs() > 3 * remaining {
            break;
        }
    }

    Ok(MatchScores {
        scores,
        rounds_played,
    })
}
