//! Strict-alternation round scheduler.

use crate::arena::Arena;
use crate::config::MatchSettings;
use crate::execute::execute_process;
use crate::process::{Process, ProcessQueue};
use crate::trace::TraceSink;

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// One warrior outlived the other.
    Winner(usize),
    /// Both survived to the cycle limit, or died in a way that never
    /// produced a sole survivor.
    Tie,
}

/// Runs one round to completion on a pre-loaded arena.
///
/// Each warrior starts with a single process at its entry address. A
/// cycle executes one instruction for `first_index`'s warrior and then
/// one for the other; the round ends as soon as a queue drains at a
/// cycle boundary, or after `max_cycles` cycles.
pub fn run_round(
    arena: &mut Arena,
    entries: [i32; 2],
    settings: &MatchSettings,
    first_index: usize,
    trace: &mut dyn TraceSink,
) -> RoundOutcome {
    let mut queues = [ProcessQueue::new(), ProcessQueue::new()];
    queues[0].push(Process {
        pc: entries[0],
        owner: 0,
    });
    queues[1].push(Process {
        pc: entries[1],
        owner: 1,
    });

    let second_index = 1 - first_index;
    let mut winner = None;

    for _ in 0..settings.max_cycles {
        if queues[0].is_empty() || queues[1].is_empty() {
            break;
        }
        execute_turn(arena, &mut queues, first_index, settings, &mut winner, trace);
        execute_turn(arena, &mut queues, second_index, settings, &mut winner, trace);
    }

    winner.map_or(RoundOutcome::Tie, RoundOutcome::Winner)
}

/// Runs one turn for `current` and records a winner the first time one
/// side is left standing alone. A later turn never overwrites it.
fn execute_turn(
    arena: &mut Arena,
    queues: &mut [ProcessQueue; 2],
    current: usize,
    settings: &MatchSettings,
    winner: &mut Option<usize>,
    trace: &mut dyn TraceSink,
) {
    let opponent = 1 - current;
    let Some(process) = queues[current].pop() else {
        return;
    };
    let _ = execute_process(arena, &mut queues[current], process, settings, trace);

    if winner.is_none() {
        let current_empty = queues[current].is_empty();
        let opponent_empty = queues[opponent].is_empty();
        if current_empty && !opponent_empty {
            *winner = Some(opponent);
        } else if !current_empty && opponent_empty {
            *winner = Some(current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{run_round, RoundOutcome};
    use crate::arena::Arena;
    use crate::config::MatchSettings;
    use crate::instruction::{AddressMode, Instruction, Modifier, Opcode};
    use crate::trace::NullTrace;

    fn settings() -> MatchSettings {
        MatchSettings {
            core_size: 64,
            max_cycles: 100,
            max_processes: 8,
            read_limit: 64,
            write_limit: 64,
            min_distance: 8,
            max_warrior_length: 8,
            ..MatchSettings::default()
        }
    }

    fn imp() -> Instruction {
        Instruction {
            opcode: Opcode::Mov,
            modifier: Modifier::I,
            a_mode: AddressMode::Direct,
            a_field: 0,
            b_mode: AddressMode::Direct,
            b_field: 1,
        }
    }

    #[test]
    fn suicide_loses_to_a_survivor() {
        let mut arena = Arena::new(64);
        *arena.cell_mut(0) = imp();
        // Cell 32 keeps the default DAT.
        let outcome = run_round(&mut arena, [0, 32], &settings(), 0, &mut NullTrace);
        assert_eq!(outcome, RoundOutcome::Winner(0));
    }

    #[test]
    fn first_mover_dies_first_when_both_are_suicides() {
        let mut arena = Arena::new(64);
        // Both entries sit on default DAT cells.
        let outcome = run_round(&mut arena, [0, 32], &settings(), 0, &mut NullTrace);
        assert_eq!(outcome, RoundOutcome::Winner(1));

        let mut arena = Arena::new(64);
        let outcome = run_round(&mut arena, [0, 32], &settings(), 1, &mut NullTrace);
        assert_eq!(outcome, RoundOutcome::Winner(0));
    }

    #[test]
    fn two_survivors_tie_at_the_cycle_limit() {
        let mut arena = Arena::new(64);
        *arena.cell_mut(0) = imp();
        *arena.cell_mut(32) = imp();
        let outcome = run_round(&mut arena, [0, 32], &settings(), 0, &mut NullTrace);
        assert_eq!(outcome, RoundOutcome::Tie);
    }

    #[test]
    fn winner_is_recorded_once_and_kept() {
        // Warrior 1 dies on its first turn; warrior 0 lives arbitrarily
        // long afterwards and stays the winner.
        let mut arena = Arena::new(64);
        *arena.cell_mut(0) = imp();
        let outcome = run_round(&mut arena, [0, 32], &settings(), 1, &mut NullTrace);
        assert_eq!(outcome, RoundOutcome::Winner(0));
    }
}
