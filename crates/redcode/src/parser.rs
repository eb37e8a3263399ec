//! Single-line grammar: comments, labels, `ORG`, instructions.

use mars_core::{AddressMode, Instruction};

use crate::errors::{ParseError, ParseErrorKind};
use crate::mnemonic::{resolve_modifier, resolve_opcode, Dialect};

/// One classified source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Empty or comment-only.
    Blank,
    /// `ORG <label>` entry-point directive.
    Org {
        /// The referenced label, as written.
        label: String,
    },
    /// An instruction, optionally labeled.
    Instruction {
        /// Leading label with any trailing `:` stripped.
        label: Option<String>,
        /// The parsed instruction with raw signed fields.
        instruction: Instruction,
    },
}

/// Parses one source line.
///
/// Keywords are ASCII case-insensitive; labels are kept as written. A
/// label is any leading token that contains no `.`.
///
/// # Errors
///
/// Every violation of the warrior grammar, tagged with `line_number`.
pub fn parse_line(
    line: &str,
    line_number: usize,
    dialect: Dialect,
) -> Result<ParsedLine, ParseError> {
    let code = strip_comment(line).trim();
    if code.is_empty() {
        return Ok(ParsedLine::Blank);
    }

    let (first, rest) = split_first_token(code);

    if first.eq_ignore_ascii_case("ORG") {
        return parse_org(rest, line_number);
    }

    let (label, body) = match label_token(first) {
        Some(label) => (Some(label.to_string()), rest.trim()),
        None => (None, code),
    };

    if body.is_empty() {
        let label = label.unwrap_or_default();
        return Err(ParseError::new(
            line_number,
            ParseErrorKind::MissingOpcode(label),
        ));
    }

    let instruction = parse_instruction(body, line_number, dialect)?;
    Ok(ParsedLine::Instruction { label, instruction })
}

fn strip_comment(line: &str) -> &str {
    line.find(';').map_or(line, |pos| &line[..pos])
}

fn split_first_token(text: &str) -> (&str, &str) {
    text.find(char::is_whitespace)
        .map_or((text, ""), |pos| (&text[..pos], &text[pos..]))
}

/// A leading token is a label when it contains no `.`; the optional
/// trailing `:` is not part of the name.
fn label_token(token: &str) -> Option<&str> {
    if token.contains('.') {
        return None;
    }
    let name = token.strip_suffix(':').unwrap_or(token);
    (!name.is_empty()).then_some(name)
}

fn parse_org(rest: &str, line_number: usize) -> Result<ParsedLine, ParseError> {
    let mut tokens = rest.split_whitespace();
    let label = tokens.next();
    match (label, tokens.next()) {
        (Some(label), None) if label_token(label) == Some(label) => Ok(ParsedLine::Org {
            label: label.to_string(),
        }),
        _ => Err(ParseError::new(line_number, ParseErrorKind::MalformedOrg)),
    }
}

fn parse_instruction(
    text: &str,
    line_number: usize,
    dialect: Dialect,
) -> Result<Instruction, ParseError> {
    let (head, operands) = split_first_token(text);

    let Some((opcode_token, modifier_token)) = head.split_once('.') else {
        let kind = if resolve_opcode(head).is_some() {
            ParseErrorKind::MissingModifier(head.to_string())
        } else {
            ParseErrorKind::UnknownOpcode(head.to_string())
        };
        return Err(ParseError::new(line_number, kind));
    };

    let opcode = resolve_opcode(opcode_token).ok_or_else(|| {
        ParseError::new(
            line_number,
            ParseErrorKind::UnknownOpcode(opcode_token.to_string()),
        )
    })?;
    if !dialect.allows_opcode(opcode) {
        return Err(ParseError::new(
            line_number,
            ParseErrorKind::OpcodeNotIn1988(opcode_token.to_string()),
        ));
    }

    if modifier_token.is_empty() {
        return Err(ParseError::new(
            line_number,
            ParseErrorKind::MissingModifier(opcode_token.to_string()),
        ));
    }
    let modifier = resolve_modifier(modifier_token).ok_or_else(|| {
        ParseError::new(
            line_number,
            ParseErrorKind::UnknownModifier(modifier_token.to_string()),
        )
    })?;
    if !dialect.allows_modifier(modifier) {
        return Err(ParseError::new(
            line_number,
            ParseErrorKind::ModifierNotIn1988(modifier_token.to_string()),
        ));
    }

    let operands = operands.trim();
    if operands.is_empty() {
        return Err(ParseError::new(
            line_number,
            ParseErrorKind::MissingOperand { side: 'A' },
        ));
    }
    let Some((a_text, b_text)) = operands.split_once(',') else {
        return Err(ParseError::new(
            line_number,
            ParseErrorKind::MissingOperand { side: 'B' },
        ));
    };

    let (a_mode, a_field) = parse_operand(a_text.trim(), 'A', line_number, dialect)?;
    let (b_mode, b_field) = parse_operand(b_text.trim(), 'B', line_number, dialect)?;

    Ok(Instruction {
        opcode,
        modifier,
        a_mode,
        a_field,
        b_mode,
        b_field,
    })
}

fn parse_operand(
    text: &str,
    side: char,
    line_number: usize,
    dialect: Dialect,
) -> Result<(AddressMode, i32), ParseError> {
    let Some(prefix) = text.chars().next() else {
        return Err(ParseError::new(
            line_number,
            ParseErrorKind::MissingOperand { side },
        ));
    };
    let Some(mode) = AddressMode::from_char(prefix) else {
        return Err(ParseError::new(
            line_number,
            ParseErrorKind::MissingModePrefix {
                side,
                operand: text.to_string(),
            },
        ));
    };
    if !dialect.allows_mode(mode) {
        return Err(ParseError::new(
            line_number,
            ParseErrorKind::ModeNotIn1988 { mode: prefix, side },
        ));
    }

    let value_text = text[1..].trim();
    if value_text.is_empty() {
        return Err(ParseError::new(
            line_number,
            ParseErrorKind::MissingOperandValue { side },
        ));
    }
    let value = value_text.parse::<i32>().map_err(|_| {
        ParseError::new(
            line_number,
            ParseErrorKind::InvalidNumber(value_text.to_string()),
        )
    })?;

    Ok((mode, value))
}
