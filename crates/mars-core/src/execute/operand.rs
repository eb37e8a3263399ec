//! Operand-address resolution with ordered side effects.
//!
//! Pre-decrements mutate the pointer field before it is read; the
//! matching post-increments are only *recorded* here and committed by
//! the engine at the step boundary that keeps pointer updates ordered:
//! after the A-operand read, before the B-operand resolution, and after
//! the destination snapshot respectively.

use crate::arena::Arena;
use crate::instruction::{AddressMode, Instruction, Modifier, Opcode, OperandField};
use crate::math::{fold, normalize};

/// A pointer field owed a post-increment, or `None`.
pub(crate) type DeferredIncrement = Option<(i32, OperandField)>;

/// Fully resolved A-operand.
pub(crate) struct ResolvedSource {
    /// Effective address.
    pub addr: i32,
    /// Instruction value read at the effective address.
    pub value: Instruction,
    /// Post-increment still to commit.
    pub deferred: DeferredIncrement,
}

/// Fully resolved B-operand.
pub(crate) struct ResolvedDest {
    /// Address the opcode writes through.
    pub write_addr: i32,
    /// Destination value as conditional opcodes observe it.
    pub snapshot: Instruction,
    /// Post-increment still to commit.
    pub deferred: DeferredIncrement,
}

/// The synthesized operand for immediate modes: `DAT.F #n, #n`.
const fn immediate_operand(field_value: i32) -> Instruction {
    Instruction {
        opcode: Opcode::Dat,
        modifier: Modifier::F,
        a_mode: AddressMode::Immediate,
        a_field: field_value,
        b_mode: AddressMode::Immediate,
        b_field: field_value,
    }
}

const fn pointer_field_of(mode: AddressMode) -> OperandField {
    match mode {
        AddressMode::AIndirect | AddressMode::APredecrement | AddressMode::APostincrement => {
            OperandField::A
        }
        _ => OperandField::B,
    }
}

const fn is_predecrement(mode: AddressMode) -> bool {
    matches!(
        mode,
        AddressMode::APredecrement | AddressMode::BPredecrement
    )
}

const fn is_postincrement(mode: AddressMode) -> bool {
    matches!(
        mode,
        AddressMode::APostincrement | AddressMode::BPostincrement
    )
}

/// Resolves the A-operand against `limit` (the read distance cap).
pub(crate) fn resolve_source(
    arena: &mut Arena,
    pc: i32,
    mode: AddressMode,
    field_value: i32,
    limit: i32,
) -> ResolvedSource {
    let core = arena.size();
    match mode {
        AddressMode::Immediate => ResolvedSource {
            addr: pc,
            value: immediate_operand(field_value),
            deferred: None,
        },
        AddressMode::Direct => {
            let addr = normalize(pc + fold(field_value, limit), core);
            ResolvedSource {
                addr,
                value: arena.cell(addr),
                deferred: None,
            }
        }
        indirect => {
            let pointer_field = pointer_field_of(indirect);
            let primary = fold(field_value, limit);
            let pointer_addr = normalize(pc + primary, core);
            if is_predecrement(indirect) {
                let field = arena.field_mut(pointer_addr, pointer_field);
                *field = normalize(*field - 1, core);
            }
            let offset = arena.field(pointer_addr, pointer_field);
            let addr = normalize(pc + fold(primary + offset, limit), core);
            ResolvedSource {
                addr,
                value: arena.cell(addr),
                deferred: is_postincrement(indirect).then_some((pointer_addr, pointer_field)),
            }
        }
    }
}

/// Resolves the B-operand.
///
/// The write path folds with `write_limit`; the snapshot conditional
/// opcodes observe is read through a parallel address folded with
/// `read_limit`. The pointer cell for indirect modes is located on the
/// write path and its pre/post side effects happen exactly once there.
/// Immediate mode targets the executing cell itself and synthesizes the
/// snapshot from the B-field.
pub(crate) fn resolve_dest(
    arena: &mut Arena,
    pc: i32,
    mode: AddressMode,
    field_value: i32,
    read_limit: i32,
    write_limit: i32,
) -> ResolvedDest {
    let core = arena.size();
    match mode {
        AddressMode::Immediate => ResolvedDest {
            write_addr: pc,
            snapshot: immediate_operand(field_value),
            deferred: None,
        },
        AddressMode::Direct => {
            let write_addr = normalize(pc + fold(field_value, write_limit), core);
            let read_addr = normalize(pc + fold(field_value, read_limit), core);
            ResolvedDest {
                write_addr,
                snapshot: arena.cell(read_addr),
                deferred: None,
            }
        }
        indirect => {
            let pointer_field = pointer_field_of(indirect);
            let primary_write = fold(field_value, write_limit);
            let pointer_addr = normalize(pc + primary_write, core);
            if is_predecrement(indirect) {
                let field = arena.field_mut(pointer_addr, pointer_field);
                *field = normalize(*field - 1, core);
            }
            let offset = arena.field(pointer_addr, pointer_field);
            let write_addr = normalize(pc + fold(primary_write + offset, write_limit), core);
            let primary_read = fold(field_value, read_limit);
            let read_addr = normalize(pc + fold(primary_read + offset, read_limit), core);
            ResolvedDest {
                write_addr,
                snapshot: arena.cell(read_addr),
                deferred: is_postincrement(indirect).then_some((pointer_addr, pointer_field)),
            }
        }
    }
}

/// Applies a recorded post-increment.
pub(crate) fn commit_increment(arena: &mut Arena, deferred: DeferredIncrement) {
    if let Some((addr, field)) = deferred {
        let core = arena.size();
        let field = arena.field_mut(addr, field);
        *field = normalize(*field + 1, core);
    }
}
