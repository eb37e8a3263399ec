//! Structured parse errors.

use thiserror::Error;

/// A parse failure tied to its 1-indexed source line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-indexed line number in the warrior source.
    pub line: usize,
    /// What went wrong, naming the offending fragment.
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Pairs an error kind with its source line.
    #[must_use]
    pub const fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

/// Classification of parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A label stood alone with no instruction after it.
    #[error("missing opcode after label '{0}'")]
    MissingOpcode(String),
    /// The opcode token carried no `.MODIFIER` suffix.
    #[error("missing modifier for opcode '{0}'")]
    MissingModifier(String),
    /// The opcode token is not a known mnemonic.
    #[error("unknown opcode '{0}'")]
    UnknownOpcode(String),
    /// The modifier suffix is not one of A, B, AB, BA, F, X, I.
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
    /// Operand lacked one of the eight mode prefix characters.
    #[error("missing addressing mode prefix in {side}-field operand '{operand}'")]
    MissingModePrefix {
        /// `'A'` or `'B'`.
        side: char,
        /// The operand text as written.
        operand: String,
    },
    /// Operand value is not a signed decimal number.
    #[error("invalid numeric operand '{0}'")]
    InvalidNumber(String),
    /// The line had no comma-separated B-operand, or an operand was
    /// blank.
    #[error("missing {side}-field operand")]
    MissingOperand {
        /// `'A'` or `'B'`.
        side: char,
    },
    /// Operand had a mode prefix but no number after it.
    #[error("missing value for {side}-field operand")]
    MissingOperandValue {
        /// `'A'` or `'B'`.
        side: char,
    },
    /// The same label was defined twice.
    #[error("duplicate label '{0}'")]
    DuplicateLabel(String),
    /// `ORG` named a label no instruction carries.
    #[error("ORG references undefined label '{0}'")]
    UndefinedOrgLabel(String),
    /// `ORG` appeared after the first instruction.
    #[error("ORG must be the first non-comment line")]
    OrgNotAtStart,
    /// More than one `ORG` directive.
    #[error("duplicate ORG directive")]
    DuplicateOrg,
    /// `ORG` had no label argument, or a malformed one.
    #[error("ORG requires a single label argument")]
    MalformedOrg,
    /// The warrior is longer than the absolute engine cap.
    #[error("warrior exceeds maximum length of {0} instructions")]
    WarriorTooLong(i32),
    /// Opcode outside the 1988 instruction set.
    #[error("opcode '{0}' is not supported in 1988 arenas")]
    OpcodeNotIn1988(String),
    /// Modifier outside the 1988 set.
    #[error("modifier '{0}' is not supported in 1988 arenas")]
    ModifierNotIn1988(String),
    /// Addressing mode outside the 1988 set.
    #[error("addressing mode '{mode}' is not supported in 1988 arenas for {side}-field operand")]
    ModeNotIn1988 {
        /// The offending prefix character.
        mode: char,
        /// `'A'` or `'B'`.
        side: char,
    },
}
