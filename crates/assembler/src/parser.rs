//! Parser for split assembly lines → instructions and label directives.

use crate::error::AsmError;
use crate::lexer::SourceLine;
use socratic_common::{Instruction, Opcode};

/// The `LABEL` directive keyword.
pub(crate) const LABEL_DIRECTIVE: &str = "LABEL";

/// Result of parsing a single assembly line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseResult {
    /// `LABEL <name>`: names the next instruction slot.
    Label(String),
    /// An executable instruction.
    Instruction(Instruction),
}

/// Parse one split line.
///
/// `PUSH_STR` keeps the whole rest of the line as its single operand so the
/// VM can decode the quoted literal later; a bare `PUSH_STR` gets an empty
/// operand and pushes empty text. Every other opcode takes its operands as
/// whitespace-separated tokens, uninterpreted.
pub(crate) fn parse_line(line: SourceLine<'_>, line_num: usize) -> Result<ParseResult, AsmError> {
    if line.head == LABEL_DIRECTIVE {
        return parse_label(line, line_num);
    }

    let opcode = Opcode::from_mnemonic(line.head);
    let instr = if opcode == Opcode::PushStr {
        Instruction::new(opcode, [line.rest])
    } else {
        Instruction::new(opcode, line.tokens())
    };
    Ok(ParseResult::Instruction(instr.at_line(line_num)))
}

/// Tokens after the name are ignored.
fn parse_label(line: SourceLine<'_>, line_num: usize) -> Result<ParseResult, AsmError> {
    let name = line
        .tokens()
        .next()
        .ok_or(AsmError::MissingLabelName { line: line_num })?;
    Ok(ParseResult::Label(name.to_string()))
}
