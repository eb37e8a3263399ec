//! Core simulator crate for the `redmars` two-warrior battle engine.
//!
//! Everything in this crate is deterministic and free of process-wide
//! state: a host may run independent tournaments on independent threads
//! as long as each owns its own [`Arena`], queues, and [`PlacementRng`].

/// Modular arithmetic over the arena modulus.
pub mod math;
pub use math::{fold, normalize, to_signed};

/// Typed Redcode instruction model.
pub mod instruction;
pub use instruction::{AddressMode, Instruction, Modifier, Opcode, OperandField};

/// Compiled warrior programs.
pub mod warrior;
pub use warrior::Warrior;

/// Circular instruction memory.
pub mod arena;
pub use arena::Arena;

/// Processes and per-warrior scheduling queues.
pub mod process;
pub use process::{Process, ProcessQueue};

/// Battle parameters, bounds, and validation.
pub mod config;
pub use config::{
    validate_settings, ConfigError, MatchSettings, MAX_CORE_SIZE, MAX_CYCLES, MAX_MIN_DISTANCE,
    MAX_PROCESSES, MAX_ROUNDS, MAX_WARRIOR_LENGTH,
};

/// Single-instruction execution engine.
pub mod execute;
pub use execute::{execute_process, StepOutcome, TerminationCause};

/// Strict-alternation round scheduler.
pub mod round;
pub use round::{run_round, RoundOutcome};

/// Deterministic warrior-placement randomness.
pub mod placement;
pub use placement::PlacementRng;

/// Tournament controller and scoring.
pub mod tournament;
pub use tournament::{run_match, MatchScores};

/// Execution trace hooks.
pub mod trace;
pub use trace::{ExecOperands, FileTrace, NullTrace, TraceSink};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
