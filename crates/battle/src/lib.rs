//! Host boundary for two-warrior Redcode battles.
//!
//! [`run_battle`] is the string-returning entry point: a two-line
//! scoreboard on success, a single `ERROR: `-prefixed line on failure,
//! and a panic barrier that turns anything unexpected into the generic
//! error line. Rust hosts that want typed results use
//! [`battle_scores`] directly.

use std::panic::{self, AssertUnwindSafe};

use mars_core::{
    run_match, validate_settings, ConfigError, MatchScores, MatchSettings, NullTrace, TraceSink,
};
use redcode::{parse_warrior, Dialect, ParseError};
use thiserror::Error;

/// Everything that can go wrong before or during a battle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    /// A parameter bound was violated.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A warrior source failed to parse.
    #[error("Error parsing warrior {index} at {error}")]
    Parse {
        /// Which warrior, 1 or 2.
        index: u8,
        /// The underlying line-tagged error.
        error: ParseError,
    },
    /// A warrior parsed to zero instructions.
    #[error("Warrior {0} contains no executable instructions")]
    EmptyWarrior(u8),
    /// A warrior is longer than the configured cap.
    #[error("Warrior {index} length exceeds the configured maximum of {max}")]
    WarriorTooLong {
        /// Which warrior, 1 or 2.
        index: u8,
        /// The configured `max_warrior_length`.
        max: i32,
    },
}

/// Parses both warriors and plays the tournament, reporting typed
/// errors.
///
/// Checks run in a fixed order: parameters, then each warrior's parse,
/// emptiness, and configured length, then the match itself (which
/// starts with the identical-warrior short-circuit).
///
/// # Errors
///
/// Any [`BattleError`].
pub fn battle_scores(
    warrior1_source: &str,
    warrior2_source: &str,
    settings: &MatchSettings,
    dialect: Dialect,
    trace: &mut dyn TraceSink,
) -> Result<MatchScores, BattleError> {
    validate_settings(settings)?;

    let warrior1 = parse_warrior(warrior1_source, dialect)
        .map_err(|error| BattleError::Parse { index: 1, error })?;
    let warrior2 = parse_warrior(warrior2_source, dialect)
        .map_err(|error| BattleError::Parse { index: 2, error })?;

    if warrior1.is_empty() {
        return Err(BattleError::EmptyWarrior(1));
    }
    if warrior2.is_empty() {
        return Err(BattleError::EmptyWarrior(2));
    }
    if warrior1.len() > settings.max_warrior_length as usize {
        return Err(BattleError::WarriorTooLong {
            index: 1,
            max: settings.max_warrior_length,
        });
    }
    if warrior2.len() > settings.max_warrior_length as usize {
        return Err(BattleError::WarriorTooLong {
            index: 2,
            max: settings.max_warrior_length,
        });
    }

    Ok(run_match(&warrior1, &warrior2, settings, trace)?)
}

/// Runs a battle and reports the result as text.
///
/// On success the result is exactly
/// `"{id1} 0 0 0 {score1} scores\n{id2} 0 0 0 {score2} scores"`; on
/// failure a single `ERROR: <reason>` line. A panic anywhere inside the
/// engine is contained and reported as the generic error line.
#[must_use]
pub fn run_battle(
    warrior1_source: &str,
    warrior1_id: i32,
    warrior2_source: &str,
    warrior2_id: i32,
    settings: &MatchSettings,
    use_1988_rules: bool,
) -> String {
    let dialect = if use_1988_rules {
        Dialect::Icws88
    } else {
        Dialect::Icws94
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut trace = trace_sink();
        battle_scores(
            warrior1_source,
            warrior2_source,
            settings,
            dialect,
            trace.as_mut(),
        )
    }));

    match outcome {
        Ok(Ok(scores)) => format_scoreboard(warrior1_id, warrior2_id, &scores),
        Ok(Err(error)) => format!("ERROR: {error}"),
        Err(_) => String::from("ERROR: Unknown exception encountered while running battle"),
    }
}

/// Renders the two-line scoreboard.
#[must_use]
pub fn format_scoreboard(warrior1_id: i32, warrior2_id: i32, scores: &MatchScores) -> String {
    format!(
        "{warrior1_id} 0 0 0 {} scores\n{warrior2_id} 0 0 0 {} scores",
        scores.scores[0], scores.scores[1]
    )
}

/// Builds the trace sink for one battle.
///
/// With the `trace` feature, a non-empty `REDCODE_TRACE_FILE` selects a
/// file sink; an unusable path degrades to the null sink rather than
/// failing the battle.
#[cfg(feature = "trace")]
fn trace_sink() -> Box<dyn TraceSink> {
    match std::env::var("REDCODE_TRACE_FILE") {
        Ok(path) if !path.is_empty() => mars_core::FileTrace::create(&path)
            .map_or_else(|_| Box::new(NullTrace) as Box<dyn TraceSink>, |sink| {
                Box::new(sink) as Box<dyn TraceSink>
            }),
        _ => Box::new(NullTrace),
    }
}

/// Without the `trace` feature the environment is never consulted.
#[cfg(not(feature = "trace"))]
fn trace_sink() -> Box<dyn TraceSink> {
    Box::new(NullTrace)
}
