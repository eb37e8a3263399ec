//! Redcode warrior source parser.
//!
//! Turns warrior source text into a [`mars_core::Warrior`]: a
//! line-oriented grammar with `;` comments, optional labels, an
//! optional leading `ORG <label>` entry-point directive, and mandatory
//! `OPCODE.MODIFIER` tokens with mode-prefixed numeric operands.

/// Structured parse errors with line context.
pub mod errors;
pub use errors::{ParseError, ParseErrorKind};

/// Mnemonic, modifier, and mode resolution plus dialect allow-lists.
pub mod mnemonic;
pub use mnemonic::{resolve_modifier, resolve_opcode, Dialect};

/// Single-line grammar.
pub mod parser;
pub use parser::{parse_line, ParsedLine};

/// Whole-warrior assembly: labels, `ORG`, length cap.
pub mod loader;
pub use loader::parse_warrior;

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
