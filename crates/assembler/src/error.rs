//! Error types for the Socratic assembler.

use thiserror::Error;

/// Errors that stop a program from loading.
///
/// Unknown mnemonics are not among them: they load as
/// [`Opcode::Unknown`](socratic_common::Opcode::Unknown) and are reported
/// when executed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// A `LABEL` directive without a name.
    #[error("line {line}: LABEL without a name")]
    MissingLabelName { line: usize },
}

impl AsmError {
    /// 1-based source line of the error.
    pub fn line(&self) -> usize {
        match self {
            AsmError::MissingLabelName { line } => *line,
        }
    }
}
