//! A single loaded instruction: opcode plus raw operand text.
//!
//! Operands stay as text. Their meaning (number, flag, quoted string, name,
//! label, count) is decided by the VM when the instruction executes.

use std::fmt;

use crate::opcode::Opcode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Operand tokens, in source order.
    pub operands: Vec<String>,
    /// 1-based source line, when loaded from text.
    pub line: Option<usize>,
}

impl Instruction {
    pub fn new<I, S>(opcode: Opcode, operands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            opcode,
            operands: operands.into_iter().map(Into::into).collect(),
            line: None,
        }
    }

    /// An instruction with no operands.
    pub fn bare(opcode: Opcode) -> Self {
        Self {
            opcode,
            operands: Vec::new(),
            line: None,
        }
    }

    /// Record the source line this instruction came from.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// The operand at `index`, if present.
    pub fn operand(&self, index: usize) -> Option<&str> {
        self.operands.get(index).map(String::as_str)
    }
}

// Trace format: mnemonic followed by the raw operands. An empty operand
// (a bare `PUSH_STR`) prints nothing.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode.mnemonic())?;
        for operand in self.operands.iter().filter(|o| !o.is_empty()) {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}
