//! Typed instruction model: opcode, modifier, addressing modes, fields.
//!
//! An [`Instruction`] is a plain value; two instructions are equal iff
//! all six components match. The engine never interprets an instruction
//! through pointers into the arena — it always works on copies and
//! explicit cell addresses.

use std::fmt;

use crate::math::normalize;

/// Executable operation selector.
///
/// `SEQ` is a source-level alias that canonicalizes to [`Opcode::Cmp`]
/// during parsing, so it has no variant of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Opcode {
    /// Kills the executing process.
    Dat,
    /// Copies fields or a whole instruction.
    Mov,
    /// Modular addition.
    Add,
    /// Modular subtraction.
    Sub,
    /// Modular multiplication.
    Mul,
    /// Signed division; a zero divisor kills the process.
    Div,
    /// Signed remainder; a zero divisor kills the process.
    Mod,
    /// Unconditional branch to the A-operand address.
    Jmp,
    /// Branch when the selected destination fields are all zero.
    Jmz,
    /// Branch when any selected destination field is nonzero.
    Jmn,
    /// Decrement the selected destination fields, then branch like JMN.
    Djn,
    /// Skip the next instruction when the selected fields are equal.
    Cmp,
    /// Skip when the selected source fields are strictly lower.
    Slt,
    /// Queue a second process for the executing warrior.
    Spl,
    /// Skip the next instruction when the selected fields differ.
    Sne,
    /// Falls through without touching the arena.
    Nop,
}

impl Opcode {
    /// Canonical upper-case mnemonic.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dat => "DAT",
            Self::Mov => "MOV",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::Mod => "MOD",
            Self::Jmp => "JMP",
            Self::Jmz => "JMZ",
            Self::Jmn => "JMN",
            Self::Djn => "DJN",
            Self::Cmp => "CMP",
            Self::Slt => "SLT",
            Self::Spl => "SPL",
            Self::Sne => "SNE",
            Self::Nop => "NOP",
        }
    }
}

/// Opcode suffix selecting which source and destination fields take part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Modifier {
    /// A-field to A-field.
    A,
    /// B-field to B-field.
    B,
    /// A-field to B-field.
    Ab,
    /// B-field to A-field.
    Ba,
    /// Both fields, pairwise.
    F,
    /// Both fields, crossed.
    X,
    /// The whole instruction for MOV; both fields elsewhere.
    I,
}

impl Modifier {
    /// Canonical upper-case suffix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::Ab => "AB",
            Self::Ba => "BA",
            Self::F => "F",
            Self::X => "X",
            Self::I => "I",
        }
    }
}

/// Operand prefix selecting how a field becomes an effective address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AddressMode {
    /// `#` — the field itself is the operand; no arena lookup.
    Immediate,
    /// `$` — relative address.
    Direct,
    /// `@` — indirect through the pointed-to cell's B-field.
    BIndirect,
    /// `<` — like `@`, decrementing the pointer field before use.
    BPredecrement,
    /// `>` — like `@`, incrementing the pointer field after use.
    BPostincrement,
    /// `*` — indirect through the pointed-to cell's A-field.
    AIndirect,
    /// `{` — like `*`, decrementing the pointer field before use.
    APredecrement,
    /// `}` — like `*`, incrementing the pointer field after use.
    APostincrement,
}

impl AddressMode {
    /// The source-text prefix character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Immediate => '#',
            Self::Direct => '$',
            Self::BIndirect => '@',
            Self::BPredecrement => '<',
            Self::BPostincrement => '>',
            Self::AIndirect => '*',
            Self::APredecrement => '{',
            Self::APostincrement => '}',
        }
    }

    /// Resolves a prefix character, if it is one of the eight legal modes.
    #[must_use]
    pub const fn from_char(prefix: char) -> Option<Self> {
        match prefix {
            '#' => Some(Self::Immediate),
            '$' => Some(Self::Direct),
            '@' => Some(Self::BIndirect),
            '<' => Some(Self::BPredecrement),
            '>' => Some(Self::BPostincrement),
            '*' => Some(Self::AIndirect),
            '{' => Some(Self::APredecrement),
            '}' => Some(Self::APostincrement),
            _ => None,
        }
    }
}

/// Names one of the two numeric fields of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum OperandField {
    /// The A-field.
    A,
    /// The B-field.
    B,
}

/// One Redcode instruction with value semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Instruction {
    /// Operation selector.
    pub opcode: Opcode,
    /// Field-selection suffix.
    pub modifier: Modifier,
    /// Addressing mode of the A-operand.
    pub a_mode: AddressMode,
    /// A-operand number, normalized into the core once loaded.
    pub a_field: i32,
    /// Addressing mode of the B-operand.
    pub b_mode: AddressMode,
    /// B-operand number, normalized into the core once loaded.
    pub b_field: i32,
}

impl Instruction {
    /// Reads the named field.
    #[must_use]
    pub const fn field(&self, field: OperandField) -> i32 {
        match field {
            OperandField::A => self.a_field,
            OperandField::B => self.b_field,
        }
    }

    /// Mutable handle to the named field.
    pub fn field_mut(&mut self, field: OperandField) -> &mut i32 {
        match field {
            OperandField::A => &mut self.a_field,
            OperandField::B => &mut self.b_field,
        }
    }

    /// Copy of this instruction with both fields normalized into
    /// `[0, core_size)`.
    #[must_use]
    pub const fn normalized(self, core_size: i32) -> Self {
        Self {
            opcode: self.opcode,
            modifier: self.modifier,
            a_mode: self.a_mode,
            a_field: normalize(self.a_field, core_size),
            b_mode: self.b_mode,
            b_field: normalize(self.b_field, core_size),
        }
    }
}

impl Default for Instruction {
    /// The canonical empty cell: `DAT.F $0, $0`.
    fn default() -> Self {
        Self {
            opcode: Opcode::Dat,
            modifier: Modifier::F,
            a_mode: AddressMode::Direct,
            a_field: 0,
            b_mode: AddressMode::Direct,
            b_field: 0,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} {}{}, {}{}",
            self.opcode.as_str(),
            self.modifier.as_str(),
            self.a_mode.as_char(),
            self.a_field,
            self.b_mode.as_char(),
            self.b_field
        )
    }
}
