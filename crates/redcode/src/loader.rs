//! Whole-warrior assembly: label table, `ORG` resolution, length cap.

use std::collections::HashMap;

use mars_core::{Warrior, MAX_WARRIOR_LENGTH};

use crate::errors::{ParseError, ParseErrorKind};
use crate::mnemonic::Dialect;
use crate::parser::{parse_line, ParsedLine};

/// Parses a complete warrior source blob.
///
/// The entry offset defaults to 0 and may be redirected by a single
/// `ORG <label>` directive on the first non-comment line. Fields are
/// left as written; the tournament normalizes them against its core
/// size.
///
/// An empty instruction list is *not* an error here — the battle
/// boundary rejects it with its own message, so that an all-comment
/// source and an all-DAT warrior stay distinguishable.
///
/// # Errors
///
/// The first [`ParseError`] encountered, in line order.
pub fn parse_warrior(source: &str, dialect: Dialect) -> Result<Warrior, ParseError> {
    let mut instructions = Vec::new();
    let mut labels: HashMap<String, usize> = HashMap::new();
    let mut org: Option<(String, usize)> = None;

    for (index, raw_line) in source.lines().enumerate() {
        let line_number = index + 1;
        match parse_line(raw_line, line_number, dialect)? {
            ParsedLine::Blank => {}
            ParsedLine::Org { label } => {
                if org.is_some() {
                    return Err(ParseError::new(line_number, ParseErrorKind::DuplicateOrg));
                }
                if !instructions.is_empty() {
                    return Err(ParseError::new(line_number, ParseErrorKind::OrgNotAtStart));
                }
                org = Some((label, line_number));
            }
            ParsedLine::Instruction { label, instruction } => {
                if let Some(label) = label {
                    if labels.insert(label.clone(), instructions.len()).is_some() {
                        return Err(ParseError::new(
                            line_number,
                            ParseErrorKind::DuplicateLabel(label),
                        ));
                    }
                }
                instructions.push(instruction);
                if instructions.len() > MAX_WARRIOR_LENGTH as usize {
                    return Err(ParseError::new(
                        line_number,
                        ParseErrorKind::WarriorTooLong(MAX_WARRIOR_LENGTH),
                    ));
                }
            }
        }
    }

    let entry_offset = match org {
        Some((label, line_number)) => *labels.get(&label).ok_or_else(|| {
            ParseError::new(line_number, ParseErrorKind::UndefinedOrgLabel(label.clone()))
        })?,
        None => 0,
    };

    Ok(Warrior::new(instructions, entry_offset))
}

#[cfg(test)]
mod tests {
    use super::parse_warrior;
    use crate::errors::ParseErrorKind;
    use crate::mnemonic::Dialect;
    use mars_core::Opcode;

    fn parse(source: &str) -> Result<mars_core::Warrior, crate::errors::ParseError> {
        parse_warrior(source, Dialect::Icws94)
    }

    #[test]
    fn parses_the_classic_dwarf() {
        let warrior = parse(
            "; Dwarf\n\
             ADD.AB #4, $3\n\
             MOV.I $2, @2\n\
             JMP.B $-2, $0\n\
             DAT.F #0, #0\n",
        )
        .expect("dwarf parses");
        assert_eq!(warrior.len(), 4);
        assert_eq!(warrior.entry_offset, 0);
        assert_eq!(warrior.instructions[0].opcode, Opcode::Add);
        assert_eq!(warrior.instructions[2].a_field, -2);
    }

    #[test]
    fn org_redirects_the_entry_offset() {
        let warrior = parse(
            "ORG start\n\
             DAT.F #0, #0\n\
             start: MOV.I $0, $1\n",
        )
        .expect("warrior parses");
        assert_eq!(warrior.entry_offset, 1);
    }

    #[test]
    fn entry_offset_defaults_to_zero() {
        let warrior = parse("MOV.I $0, $1\n").expect("warrior parses");
        assert_eq!(warrior.entry_offset, 0);
    }

    #[test]
    fn comment_lines_may_precede_org() {
        let warrior = parse(
            "; author line\n\
             \n\
             ORG loop\n\
             loop: MOV.I $0, $1\n",
        )
        .expect("warrior parses");
        assert_eq!(warrior.entry_offset, 0);
        assert_eq!(warrior.len(), 1);
    }

    #[test]
    fn org_after_an_instruction_is_rejected() {
        let error = parse(
            "MOV.I $0, $1\n\
             ORG start\n",
        )
        .expect_err("late ORG");
        assert_eq!(error.line, 2);
        assert_eq!(error.kind, ParseErrorKind::OrgNotAtStart);
    }

    #[test]
    fn duplicate_org_is_rejected() {
        let error = parse(
            "ORG a\n\
             ORG b\n\
             a: MOV.I $0, $1\n",
        )
        .expect_err("second ORG");
        assert_eq!(error.kind, ParseErrorKind::DuplicateOrg);
    }

    #[test]
    fn org_with_an_undefined_label_is_rejected() {
        let error = parse(
            "ORG nowhere\n\
             MOV.I $0, $1\n",
        )
        .expect_err("undefined label");
        assert_eq!(error.line, 1);
        assert_eq!(
            error.kind,
            ParseErrorKind::UndefinedOrgLabel("nowhere".into())
        );
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let error = parse(
            "here: MOV.I $0, $1\n\
             here: JMP.B $-1, $0\n",
        )
        .expect_err("duplicate label");
        assert_eq!(error.line, 2);
        assert_eq!(error.kind, ParseErrorKind::DuplicateLabel("here".into()));
    }

    #[test]
    fn labels_are_case_sensitive() {
        let warrior = parse(
            "ORG Loop\n\
             loop: DAT.F #0, #0\n\
             Loop: MOV.I $0, $1\n",
        )
        .expect("distinct labels");
        assert_eq!(warrior.entry_offset, 1);
    }

    #[test]
    fn errors_carry_the_offending_line_number() {
        let error = parse(
            "MOV.I $0, $1\n\
             ADD.AB #4, $3\n\
             BAD.I $0, $1\n",
        )
        .expect_err("unknown opcode");
        assert_eq!(error.line, 3);
        assert_eq!(error.kind, ParseErrorKind::UnknownOpcode("BAD".into()));
    }

    #[test]
    fn an_empty_source_yields_an_empty_warrior() {
        let warrior = parse("; nothing but comments\n\n").expect("empty warrior");
        assert!(warrior.is_empty());
    }

    #[test]
    fn icws88_violations_surface_with_line_numbers() {
        let error = parse_warrior(
            "MOV.AB #0, $1\n\
             NOP.F $0, $0\n",
            Dialect::Icws88,
        )
        .expect_err("NOP is 1994-only");
        assert_eq!(error.line, 2);
        assert_eq!(error.kind, ParseErrorKind::OpcodeNotIn1988("NOP".into()));
    }
}
