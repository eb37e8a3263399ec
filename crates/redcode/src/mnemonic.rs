//! Mnemonic resolution and dialect allow-lists.

use mars_core::{AddressMode, Modifier, Opcode};

/// Which ICWS standard a warrior is validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// The full 1994 instruction set, the default.
    #[default]
    Icws94,
    /// The restricted 1988 set: no MUL/DIV/MOD/SEQ/SNE/NOP, no X or I
    /// modifiers, no A-side indirection.
    Icws88,
}

struct OpcodeEntry {
    name: &'static str,
    opcode: Opcode,
}

/// Source mnemonics in resolution order. `SEQ` canonicalizes to CMP and
/// is the one alias in the table.
const OPCODE_ENTRIES: &[OpcodeEntry] = &[
    OpcodeEntry {
        name: "DAT",
        opcode: Opcode::Dat,
    },
    OpcodeEntry {
        name: "MOV",
        opcode: Opcode::Mov,
    },
    OpcodeEntry {
        name: "ADD",
        opcode: Opcode::Add,
    },
    OpcodeEntry {
        name: "SUB",
        opcode: Opcode::Sub,
    },
    OpcodeEntry {
        name: "MUL",
        opcode: Opcode::Mul,
    },
    OpcodeEntry {
        name: "DIV",
        opcode: Opcode::Div,
    },
    OpcodeEntry {
        name: "MOD",
        opcode: Opcode::Mod,
    },
    OpcodeEntry {
        name: "JMP",
        opcode: Opcode::Jmp,
    },
    OpcodeEntry {
        name: "JMZ",
        opcode: Opcode::Jmz,
    },
    OpcodeEntry {
        name: "JMN",
        opcode: Opcode::Jmn,
    },
    OpcodeEntry {
        name: "DJN",
        opcode: Opcode::Djn,
    },
    OpcodeEntry {
        name: "CMP",
        opcode: Opcode::Cmp,
    },
    OpcodeEntry {
        name: "SEQ",
        opcode: Opcode::Cmp,
    },
    OpcodeEntry {
        name: "SNE",
        opcode: Opcode::Sne,
    },
    OpcodeEntry {
        name: "SLT",
        opcode: Opcode::Slt,
    },
    OpcodeEntry {
        name: "SPL",
        opcode: Opcode::Spl,
    },
    OpcodeEntry {
        name: "NOP",
        opcode: Opcode::Nop,
    },
];

/// Resolves an opcode token, ASCII case-insensitively.
#[must_use]
pub fn resolve_opcode(token: &str) -> Option<Opcode> {
    OPCODE_ENTRIES
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(token))
        .map(|entry| entry.opcode)
}

/// Resolves a modifier token, ASCII case-insensitively.
#[must_use]
pub fn resolve_modifier(token: &str) -> Option<Modifier> {
    const MODIFIERS: &[Modifier] = &[
        Modifier::A,
        Modifier::B,
        Modifier::Ab,
        Modifier::Ba,
        Modifier::F,
        Modifier::X,
        Modifier::I,
    ];
    MODIFIERS
        .iter()
        .find(|modifier| modifier.as_str().eq_ignore_ascii_case(token))
        .copied()
}

impl Dialect {
    /// Whether `opcode` may appear in this dialect.
    #[must_use]
    pub const fn allows_opcode(self, opcode: Opcode) -> bool {
        match self {
            Self::Icws94 => true,
            Self::Icws88 => matches!(
                opcode,
                Opcode::Dat
                    | Opcode::Mov
                    | Opcode::Add
                    | Opcode::Sub
                    | Opcode::Jmp
                    | Opcode::Jmz
                    | Opcode::Jmn
                    | Opcode::Djn
                    | Opcode::Cmp
                    | Opcode::Slt
                    | Opcode::Spl
            ),
        }
    }

    /// Whether `modifier` may appear in this dialect.
    #[must_use]
    pub const fn allows_modifier(self, modifier: Modifier) -> bool {
        match self {
            Self::Icws94 => true,
            Self::Icws88 => matches!(
                modifier,
                Modifier::A | Modifier::B | Modifier::Ab | Modifier::Ba | Modifier::F
            ),
        }
    }

    /// Whether the addressing `mode` may appear in this dialect.
    #[must_use]
    pub const fn allows_mode(self, mode: AddressMode) -> bool {
        match self {
            Self::Icws94 => true,
            Self::Icws88 => matches!(
                mode,
                AddressMode::Immediate
                    | AddressMode::Direct
                    | AddressMode::BIndirect
                    | AddressMode::BPredecrement
                    | AddressMode::BPostincrement
            ),
        }
    }
}
