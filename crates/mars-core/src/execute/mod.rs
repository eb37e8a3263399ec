//! Single-instruction execution engine.
//!
//! One call runs one process for one instruction:
//!
//! 1. Fetch a copy of the cell at the program counter; DAT kills the
//!    process before any operand is touched.
//! 2. Resolve the A-operand (pre-decrement included, post-increment
//!    recorded).
//! 3. Commit the A post-increment.
//! 4. Resolve the B-operand and capture the destination snapshot.
//! 5. Commit the B post-increment.
//! 6. Dispatch on opcode x modifier.
//! 7. Queue the successor unless the opcode already did, or the process
//!    died.
//!
//! Successors are pushed onto the executing warrior's own queue; the
//! opposing warrior is never touched within a step.

mod operand;

use operand::{commit_increment, resolve_dest, resolve_source};

use crate::arena::Arena;
use crate::config::MatchSettings;
use crate::instruction::{Instruction, Modifier, Opcode, OperandField};
use crate::math::normalize;
use crate::process::{Process, ProcessQueue};
use crate::trace::{ExecOperands, TraceSink};

/// Result of running one process for one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A successor was queued: fall-through, skip, branch, or split.
    Continued,
    /// The process died and queued nothing.
    Terminated {
        /// Why the process died.
        cause: TerminationCause,
    },
}

/// Why a process left the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationCause {
    /// Fetched a DAT, whatever its modifier.
    DatExecuted,
    /// DIV or MOD saw a zero in a participating divisor field.
    ZeroDivisor,
}

#[derive(Clone, Copy)]
enum ArithOp {
    Add,
    Sub,
    Mul,
}

#[derive(Clone, Copy)]
enum GuardedOp {
    Div,
    Mod,
}

/// `(source field, destination field)` pairs a modifier selects.
const fn field_pairs(modifier: Modifier) -> &'static [(OperandField, OperandField)] {
    match modifier {
        Modifier::A => &[(OperandField::A, OperandField::A)],
        Modifier::B => &[(OperandField::B, OperandField::B)],
        Modifier::Ab => &[(OperandField::A, OperandField::B)],
        Modifier::Ba => &[(OperandField::B, OperandField::A)],
        Modifier::F | Modifier::I => &[
            (OperandField::A, OperandField::A),
            (OperandField::B, OperandField::B),
        ],
        Modifier::X => &[
            (OperandField::B, OperandField::A),
            (OperandField::A, OperandField::B),
        ],
    }
}

/// Destination fields JMZ, JMN, and DJN test (and DJN decrements).
const fn branch_fields(modifier: Modifier) -> &'static [OperandField] {
    match modifier {
        Modifier::A | Modifier::Ba => &[OperandField::A],
        Modifier::B | Modifier::Ab => &[OperandField::B],
        Modifier::F | Modifier::X | Modifier::I => &[OperandField::A, OperandField::B],
    }
}

/// Executes `process` for one instruction, pushing any successors onto
/// `queue` (the executing warrior's own queue).
pub fn execute_process(
    arena: &mut Arena,
    queue: &mut ProcessQueue,
    process: Process,
    settings: &MatchSettings,
    trace: &mut dyn TraceSink,
) -> StepOutcome {
    let core = arena.size();
    let pc = process.pc;
    let owner = process.owner;
    let instr = arena.cell(pc);

    if instr.opcode == Opcode::Dat {
        trace.record_exec(pc, &instr, None);
        return StepOutcome::Terminated {
            cause: TerminationCause::DatExecuted,
        };
    }

    let src = resolve_source(arena, pc, instr.a_mode, instr.a_field, settings.read_limit);
    // The A-side post-increment lands before the B-operand looks at the
    // arena, so B-indirection observes the incremented pointer.
    commit_increment(arena, src.deferred);

    let dst = resolve_dest(
        arena,
        pc,
        instr.b_mode,
        instr.b_field,
        settings.read_limit,
        settings.write_limit,
    );
    trace.record_exec(
        pc,
        &instr,
        Some(ExecOperands {
            a_addr: src.addr,
            src: &src.value,
            b_addr: dst.write_addr,
            dst_before: &dst.snapshot,
        }),
    );
    commit_increment(arena, dst.deferred);

    let mut skip = false;
    match instr.opcode {
        // DAT returned at fetch.
        Opcode::Dat => {}
        Opcode::Mov => {
            apply_mov(arena.cell_mut(dst.write_addr), &src.value, instr.modifier);
            trace.record_write(dst.write_addr, &arena.cell(dst.write_addr));
        }
        Opcode::Add => {
            apply_arithmetic(arena, dst.write_addr, &src.value, instr.modifier, ArithOp::Add);
            trace.record_write(dst.write_addr, &arena.cell(dst.write_addr));
        }
        Opcode::Sub => {
            apply_arithmetic(arena, dst.write_addr, &src.value, instr.modifier, ArithOp::Sub);
            trace.record_write(dst.write_addr, &arena.cell(dst.write_addr));
        }
        Opcode::Mul => {
            apply_arithmetic(arena, dst.write_addr, &src.value, instr.modifier, ArithOp::Mul);
            trace.record_write(dst.write_addr, &arena.cell(dst.write_addr));
        }
        Opcode::Div | Opcode::Mod => {
            let op = match instr.opcode {
                Opcode::Div => GuardedOp::Div,
                _ => GuardedOp::Mod,
            };
            let outcome =
                apply_guarded_arithmetic(arena, dst.write_addr, &src.value, instr.modifier, op);
            if outcome.wrote_any {
                trace.record_write(dst.write_addr, &arena.cell(dst.write_addr));
            }
            if outcome.zero_divisor {
                return StepOutcome::Terminated {
                    cause: TerminationCause::ZeroDivisor,
                };
            }
        }
        Opcode::Cmp => skip = compare_equal(&src.value, &dst.snapshot, instr.modifier),
        Opcode::Sne => skip = !compare_equal(&src.value, &dst.snapshot, instr.modifier),
        Opcode::Slt => skip = compare_less(&src.value, &dst.snapshot, instr.modifier),
        Opcode::Jmp => {
            queue.push(Process {
                pc: src.addr,
                owner,
            });
            return StepOutcome::Continued;
        }
        Opcode::Jmz => {
            let all_zero = branch_fields(instr.modifier)
                .iter()
                .all(|&field| dst.snapshot.field(field) == 0);
            if all_zero {
                queue.push(Process {
                    pc: src.addr,
                    owner,
                });
                return StepOutcome::Continued;
            }
        }
        Opcode::Jmn => {
            // Any selected nonzero field takes the branch, matching
            // pMARS rather than the literal ICWS'94 all-fields text.
            let any_nonzero = branch_fields(instr.modifier)
                .iter()
                .any(|&field| dst.snapshot.field(field) != 0);
            if any_nonzero {
                queue.push(Process {
                    pc: src.addr,
                    owner,
                });
                return StepOutcome::Continued;
            }
        }
        Opcode::Djn => {
            let cell = arena.cell_mut(dst.write_addr);
            let mut any_nonzero = false;
            for &field in branch_fields(instr.modifier) {
                let field = cell.field_mut(field);
                *field = normalize(*field - 1, core);
                any_nonzero |= *field != 0;
            }
            trace.record_write(dst.write_addr, &arena.cell(dst.write_addr));
            if any_nonzero {
                queue.push(Process {
                    pc: src.addr,
                    owner,
                });
                return StepOutcome::Continued;
            }
        }
        Opcode::Spl => {
            queue.push(Process {
                pc: normalize(pc + 1, core),
                owner,
            });
            if (queue.len() as i32) < settings.max_processes {
                queue.push(Process {
                    pc: src.addr,
                    owner,
                });
            }
            return StepOutcome::Continued;
        }
        Opcode::Nop => {}
    }

    let advance = if skip { 2 } else { 1 };
    queue.push(Process {
        pc: normalize(pc + advance, core),
        owner,
    });
    StepOutcome::Continued
}

fn apply_mov(dst: &mut Instruction, src: &Instruction, modifier: Modifier) {
    if modifier == Modifier::I {
        *dst = *src;
        return;
    }
    for &(from, to) in field_pairs(modifier) {
        *dst.field_mut(to) = src.field(from);
    }
}

fn apply_arithmetic(
    arena: &mut Arena,
    addr: i32,
    src: &Instruction,
    modifier: Modifier,
    op: ArithOp,
) {
    use crate::math::to_signed;

    let core = arena.size();
    let dst = arena.cell_mut(addr);
    for &(from, to) in field_pairs(modifier) {
        let rhs = to_signed(src.field(from), core);
        let lhs = to_signed(dst.field(to), core);
        let result = match op {
            ArithOp::Add => lhs + rhs,
            ArithOp::Sub => lhs - rhs,
            ArithOp::Mul => {
                (i64::from(lhs) * i64::from(rhs)).rem_euclid(i64::from(core)) as i32
            }
        };
        *dst.field_mut(to) = normalize(result, core);
    }
}

struct GuardedResult {
    wrote_any: bool,
    zero_divisor: bool,
}

/// DIV/MOD write each participating field whose divisor is nonzero; a
/// zero divisor anywhere skips that field's write and kills the process
/// once all fields have been attempted.
fn apply_guarded_arithmetic(
    arena: &mut Arena,
    addr: i32,
    src: &Instruction,
    modifier: Modifier,
    op: GuardedOp,
) -> GuardedResult {
    use crate::math::to_signed;

    let core = arena.size();
    let dst = arena.cell_mut(addr);
    let mut result = GuardedResult {
        wrote_any: false,
        zero_divisor: false,
    };
    for &(from, to) in field_pairs(modifier) {
        let rhs = to_signed(src.field(from), core);
        if rhs == 0 {
            result.zero_divisor = true;
            continue;
        }
        let lhs = to_signed(dst.field(to), core);
        let value = match op {
            GuardedOp::Div => lhs / rhs,
            GuardedOp::Mod => lhs % rhs,
        };
        *dst.field_mut(to) = normalize(value, core);
        result.wrote_any = true;
    }
    result
}

fn compare_equal(src: &Instruction, dst: &Instruction, modifier: Modifier) -> bool {
    if modifier == Modifier::I {
        return src == dst;
    }
    field_pairs(modifier)
        .iter()
        .all(|&(from, to)| src.field(from) == dst.field(to))
}

fn compare_less(src: &Instruction, dst: &Instruction, modifier: Modifier) -> bool {
    field_pairs(modifier)
        .iter()
        .all(|&(from, to)| src.field(from) < dst.field(to))
}
