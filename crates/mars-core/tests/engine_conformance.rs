//! Engine conformance suite: addressing modes, opcode x modifier
//! semantics, resource caps, and arena invariants under random fire.

use mars_core::{
    execute_process, fold, normalize, AddressMode, Arena, Instruction, MatchSettings, Modifier,
    NullTrace, Opcode, OperandField, Process, ProcessQueue, StepOutcome, TerminationCause,
};
use proptest::prelude::*;
use rstest::rstest;

fn settings(core_size: i32) -> MatchSettings {
    MatchSettings {
        core_size,
        max_cycles: 1000,
        max_processes: 64,
        read_limit: core_size,
        write_limit: core_size,
        min_distance: 1,
        max_warrior_length: 1,
        rounds: 1,
        seed: 1,
    }
}

fn instr(
    opcode: Opcode,
    modifier: Modifier,
    a_mode: AddressMode,
    a_field: i32,
    b_mode: AddressMode,
    b_field: i32,
) -> Instruction {
    Instruction {
        opcode,
        modifier,
        a_mode,
        a_field,
        b_mode,
        b_field,
    }
}

fn run_one(arena: &mut Arena, pc: i32, config: &MatchSettings) -> (StepOutcome, ProcessQueue) {
    let mut queue = ProcessQueue::new();
    let outcome = execute_process(
        arena,
        &mut queue,
        Process { pc, owner: 0 },
        config,
        &mut NullTrace,
    );
    (outcome, queue)
}

#[rstest]
#[case::modifier_a(Modifier::A, 0, 5, true)]
#[case::modifier_b(Modifier::B, 5, 0, true)]
#[case::modifier_ab(Modifier::Ab, 0, 5, true)]
#[case::modifier_ba(Modifier::Ba, 5, 0, true)]
#[case::modifier_f(Modifier::F, 0, 5, true)]
#[case::modifier_x(Modifier::X, 5, 0, true)]
#[case::modifier_i(Modifier::I, 5, 0, true)]
#[case::all_divisors_live(Modifier::F, 5, 5, false)]
fn div_terminates_exactly_when_a_used_divisor_is_zero(
    #[case] modifier: Modifier,
    #[case] src_a: i32,
    #[case] src_b: i32,
    #[case] expect_death: bool,
) {
    let mut arena = Arena::new(64);
    *arena.cell_mut(0) = instr(
        Opcode::Div,
        modifier,
        AddressMode::Direct,
        1,
        AddressMode::Direct,
        2,
    );
    *arena.cell_mut(1) = instr(
        Opcode::Dat,
        Modifier::F,
        AddressMode::Direct,
        src_a,
        AddressMode::Direct,
        src_b,
    );
    *arena.cell_mut(2) = instr(
        Opcode::Dat,
        Modifier::F,
        AddressMode::Direct,
        20,
        AddressMode::Direct,
        30,
    );

    let config = settings(64);
    let (outcome, queue) = run_one(&mut arena, 0, &config);
    if expect_death {
        assert_eq!(
            outcome,
            StepOutcome::Terminated {
                cause: TerminationCause::ZeroDivisor
            }
        );
        assert!(queue.is_empty());
    } else {
        assert_eq!(outcome, StepOutcome::Continued);
    }
}

#[rstest]
#[case::mod_b(Opcode::Mod, Modifier::B, 30 % 5)]
#[case::div_b(Opcode::Div, Modifier::B, 30 / 5)]
fn div_and_mod_write_the_quotient_or_remainder(
    #[case] opcode: Opcode,
    #[case] modifier: Modifier,
    #[case] expected: i32,
) {
    let mut arena = Arena::new(64);
    *arena.cell_mut(0) = instr(
        opcode,
        modifier,
        AddressMode::Immediate,
        5,
        AddressMode::Direct,
        2,
    );
    *arena.cell_mut(2) = instr(
        Opcode::Dat,
        Modifier::F,
        AddressMode::Direct,
        20,
        AddressMode::Direct,
        30,
    );
    let config = settings(64);
    let (outcome, _) = run_one(&mut arena, 0, &config);
    assert_eq!(outcome, StepOutcome::Continued);
    assert_eq!(arena.field(2, OperandField::B), expected);
}

#[test]
fn spl_fills_the_queue_up_to_the_cap_and_no_further() {
    // One process splitting forever: the queue grows by one net entry
    // per executed SPL until it pins at max_processes.
    let core = 16;
    let mut arena = Arena::new(core);
    for addr in 0..core {
        *arena.cell_mut(addr) = instr(
            Opcode::Spl,
            Modifier::B,
            AddressMode::Direct,
            0,
            AddressMode::Direct,
            0,
        );
    }
    let config = MatchSettings {
        max_processes: 5,
        ..settings(core)
    };

    let mut queue = ProcessQueue::new();
    queue.push(Process { pc: 0, owner: 0 });
    for step in 0..32 {
        let process = queue.pop().expect("splitting queue never drains");
        let outcome = execute_process(&mut arena, &mut queue, process, &config, &mut NullTrace);
        assert_eq!(outcome, StepOutcome::Continued);
        assert!(
            queue.len() as i32 <= config.max_processes,
            "queue exceeded the cap at step {step}"
        );
    }
    assert_eq!(queue.len() as i32, config.max_processes);
}

#[rstest]
#[case::just_below(4, 5)]
#[case::at_cap(5, 5)]
#[case::cap_of_one(1, 1)]
fn spl_queues_its_target_only_below_the_cap(#[case] occupied: i32, #[case] cap: i32) {
    let mut arena = Arena::new(32);
    *arena.cell_mut(0) = instr(
        Opcode::Spl,
        Modifier::B,
        AddressMode::Direct,
        9,
        AddressMode::Direct,
        0,
    );
    let config = MatchSettings {
        max_processes: cap,
        ..settings(32)
    };

    // Simulate a queue that already holds `occupied - 1` other processes
    // besides the one we pop and run.
    let mut queue = ProcessQueue::new();
    for _ in 0..occupied - 1 {
        queue.push(Process { pc: 1, owner: 0 });
    }
    let outcome = execute_process(
        &mut arena,
        &mut queue,
        Process { pc: 0, owner: 0 },
        &config,
        &mut NullTrace,
    );
    assert_eq!(outcome, StepOutcome::Continued);

    // The fall-through successor always lands; the split target only
    // when the queue was still below the cap afterwards.
    let expected = if occupied < cap { occupied + 1 } else { cap };
    assert_eq!(queue.len() as i32, expected);
}

#[test]
fn read_and_write_limits_of_one_pin_everything_to_pc() {
    // With both limits at 1 every fold collapses to zero: the imp
    // copies itself onto itself and marches nowhere.
    let mut arena = Arena::new(32);
    *arena.cell_mut(0) = instr(
        Opcode::Mov,
        Modifier::I,
        AddressMode::Direct,
        0,
        AddressMode::Direct,
        1,
    );
    let config = MatchSettings {
        read_limit: 1,
        write_limit: 1,
        ..settings(32)
    };
    let (outcome, mut queue) = {
        let mut queue = ProcessQueue::new();
        let outcome = execute_process(
            &mut arena,
            &mut queue,
            Process { pc: 0, owner: 0 },
            &config,
            &mut NullTrace,
        );
        (outcome, queue)
    };
    assert_eq!(outcome, StepOutcome::Continued);
    // Cell 1 was never written; the copy landed back on cell 0.
    assert_eq!(arena.cell(1), Instruction::default());
    assert_eq!(arena.cell(0).opcode, Opcode::Mov);
    assert_eq!(queue.pop().map(|p| p.pc), Some(1));
}

#[test]
fn asymmetric_limits_fold_reads_and_writes_differently() {
    // read_limit 4 folds the A-offset 3 to -1; write_limit 8 keeps the
    // B-offset 3. The copy therefore reads behind the pc and writes
    // ahead of it.
    let core = 16;
    let mut arena = Arena::new(core);
    *arena.cell_mut(0) = instr(
        Opcode::Mov,
        Modifier::I,
        AddressMode::Direct,
        3,
        AddressMode::Direct,
        3,
    );
    let marker = instr(
        Opcode::Nop,
        Modifier::F,
        AddressMode::Direct,
        7,
        AddressMode::Direct,
        7,
    );
    *arena.cell_mut(core - 1) = marker;

    let config = MatchSettings {
        read_limit: 4,
        write_limit: 8,
        ..settings(core)
    };
    let mut queue = ProcessQueue::new();
    execute_process(
        &mut arena,
        &mut queue,
        Process { pc: 0, owner: 0 },
        &config,
        &mut NullTrace,
    );
    assert_eq!(arena.cell(3), marker);
}

#[test]
fn immediate_b_mode_takes_its_snapshot_from_the_operand() {
    // JMZ.B with an immediate B-operand of 0 tests the synthesized
    // snapshot, not the executing cell's fields.
    let mut arena = Arena::new(32);
    *arena.cell_mut(0) = instr(
        Opcode::Jmz,
        Modifier::B,
        AddressMode::Direct,
        9,
        AddressMode::Immediate,
        0,
    );
    let config = settings(32);
    let (_, mut queue) = run_one(&mut arena, 0, &config);
    assert_eq!(queue.pop().map(|p| p.pc), Some(9));

    let mut arena = Arena::new(32);
    *arena.cell_mut(0) = instr(
        Opcode::Jmz,
        Modifier::B,
        AddressMode::Direct,
        9,
        AddressMode::Immediate,
        5,
    );
    let (_, mut queue) = run_one(&mut arena, 0, &config);
    assert_eq!(queue.pop().map(|p| p.pc), Some(1));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn arena_fields_stay_normalized_under_random_programs(
        raw_cells in prop::collection::vec(
            (0_usize..16, 0_usize..7, 0_usize..8, any::<i32>(), 0_usize..8, any::<i32>()),
            8..=32,
        ),
        steps in 1_usize..64,
    ) {
        const OPCODES: [Opcode; 16] = [
            Opcode::Dat, Opcode::Mov, Opcode::Add, Opcode::Sub, Opcode::Mul, Opcode::Div,
            Opcode::Mod, Opcode::Jmp, Opcode::Jmz, Opcode::Jmn, Opcode::Djn, Opcode::Cmp,
            Opcode::Slt, Opcode::Spl, Opcode::Sne, Opcode::Nop,
        ];
        const MODIFIERS: [Modifier; 7] = [
            Modifier::A, Modifier::B, Modifier::Ab, Modifier::Ba, Modifier::F, Modifier::X,
            Modifier::I,
        ];
        const MODES: [AddressMode; 8] = [
            AddressMode::Immediate, AddressMode::Direct, AddressMode::BIndirect,
            AddressMode::BPredecrement, AddressMode::BPostincrement, AddressMode::AIndirect,
            AddressMode::APredecrement, AddressMode::APostincrement,
        ];

        let core = raw_cells.len() as i32;
        let mut arena = Arena::new(core);
        for (addr, &(op, modifier, a_mode, a_field, b_mode, b_field)) in
            raw_cells.iter().enumerate()
        {
            *arena.cell_mut(addr as i32) = Instruction {
                opcode: OPCODES[op],
                modifier: MODIFIERS[modifier],
                a_mode: MODES[a_mode],
                a_field: normalize(a_field, core),
                b_mode: MODES[b_mode],
                b_field: normalize(b_field, core),
            };
        }

        let config = MatchSettings {
            max_processes: 8,
            ..settings(core)
        };
        let mut queue = ProcessQueue::new();
        queue.push(Process { pc: 0, owner: 0 });

        for _ in 0..steps {
            let Some(process) = queue.pop() else { break };
            let _ = execute_process(&mut arena, &mut queue, process, &config, &mut NullTrace);

            prop_assert!(queue.len() as i32 <= config.max_processes);
            for addr in 0..core {
                let cell = arena.cell(addr);
                prop_assert!((0..core).contains(&cell.a_field),
                    "a-field out of range at {addr}: {}", cell.a_field);
                prop_assert!((0..core).contains(&cell.b_field),
                    "b-field out of range at {addr}: {}", cell.b_field);
            }
        }
    }

    #[test]
    fn fold_stays_inside_the_half_open_band(offset in any::<i32>(), limit in 1_i32..10_000) {
        let folded = fold(offset, limit);
        prop_assert!(folded >= -(limit / 2));
        prop_assert!(folded <= limit / 2);
        prop_assert_eq!(fold(folded, limit), folded);
    }

    #[test]
    fn normalize_is_idempotent_and_in_range(value in any::<i32>(), modulus in 1_i32..100_000) {
        let once = normalize(value, modulus);
        prop_assert!((0..modulus).contains(&once));
        prop_assert_eq!(normalize(once, modulus), once);
    }
}
