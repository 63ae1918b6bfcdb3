//! Socratic assembler: program text → instruction sequence + label table.
//!
//! Loading is a line-by-line translation. Operands are kept as raw text;
//! the VM interprets them when it executes each instruction.
//!
//! # Usage
//!
//! ```
//! use socratic_assembler::{assemble, disassemble};
//!
//! let text = "LABEL inicio\nPUSH_STR \"ola\"\nPRINT\nJUMP inicio\n";
//! let program = assemble(text).unwrap();
//! assert_eq!(program.len(), 3);
//! assert_eq!(program.label("inicio"), Some(0));
//! assert_eq!(disassemble(&program), text);
//! ```
//!
//! # Text format
//!
//! - One instruction or directive per line; surrounding whitespace is
//!   ignored, as are blank lines and lines starting with `;`.
//! - `LABEL <name>` names the next instruction slot and takes none itself.
//!   A later `LABEL` with the same name wins.
//! - `PUSH_STR` takes the rest of the line verbatim as a quoted literal.
//! - Every other line is a mnemonic followed by whitespace-separated
//!   operands. Unknown mnemonics load and are reported at run time.

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use error::AsmError;

use lexer::split_line;
use parser::{parse_line, ParseResult};
use socratic_common::Program;

/// Assemble text into a program.
///
/// Returns the first error encountered.
pub fn assemble(text: &str) -> Result<Program, AsmError> {
    let mut program = Program::default();

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let Some(line) = split_line(line) else {
            continue;
        };
        match parse_line(line, line_num)? {
            ParseResult::Label(name) => {
                let index = program.len();
                program.define_label(name, index);
            }
            ParseResult::Instruction(instr) => program.instructions.push(instr),
        }
    }

    Ok(program)
}

/// Disassemble a program into canonical assembly text.
///
/// The output is flat text: `LABEL` lines before the instruction they
/// name, one instruction per line, no comments.
pub fn disassemble(program: &Program) -> String {
    disassembler::disassemble(program)
}
