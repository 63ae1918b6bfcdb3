//! Runtime errors and warnings for the Socratic VM.
//!
//! Faults come in two tiers. A [`RuntimeError`] aborts the run on the spot.
//! A [`Warning`] is reported and worked around with a safe default, and the
//! run continues. Every variant carries the instruction index (`at`).

use thiserror::Error;

/// Conditions that abort execution immediately.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// An opcode needed more stack operands than were available.
    #[error("stack has fewer than {needed} elements at instruction {at}")]
    StackUnderflow { at: usize, needed: usize },

    /// A jump named a label the program does not define.
    #[error("label not found: {label} at instruction {at}")]
    UnknownLabel { at: usize, label: String },

    /// A control-flow or list-building opcode had no operand.
    #[error("{opcode} without operand at instruction {at}")]
    MissingOperand { at: usize, opcode: &'static str },

    /// `BUILD_LIST` was given a count that is not a non-negative integer.
    #[error("invalid element count '{token}' at instruction {at}")]
    InvalidCount { at: usize, token: String },
}

impl RuntimeError {
    /// Instruction index where the run stopped.
    pub fn at(&self) -> usize {
        match self {
            RuntimeError::StackUnderflow { at, .. }
            | RuntimeError::UnknownLabel { at, .. }
            | RuntimeError::MissingOperand { at, .. }
            | RuntimeError::InvalidCount { at, .. } => *at,
        }
    }
}

/// Conditions that are reported and then worked around.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    /// An opcode that needs a name or literal operand had none. Nothing was
    /// pushed or popped.
    #[error("{opcode} without operand at instruction {at}")]
    MissingOperand { at: usize, opcode: String },

    /// `PUSH_NUM` text did not parse. 0 was pushed instead.
    #[error("malformed number '{token}' at instruction {at}, using 0")]
    MalformedNumber { at: usize, token: String },

    /// `PUSH_BOOL` text was not an integer flag. Nothing was pushed.
    #[error("malformed boolean flag '{token}' at instruction {at}")]
    MalformedFlag { at: usize, token: String },

    /// `DIV` by zero. 0 was pushed instead.
    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: usize },

    /// `INDEX`/`STORE_INDEX` outside the list bounds.
    #[error("{opcode} index {index} out of range (length {length}) at instruction {at}")]
    IndexOutOfRange {
        at: usize,
        opcode: &'static str,
        index: i64,
        length: usize,
    },

    /// `INDEX`/`STORE_INDEX` with a NaN or infinite index.
    #[error("{opcode} index {index} is not a finite number at instruction {at}")]
    NonFiniteIndex {
        at: usize,
        opcode: &'static str,
        index: String,
    },

    /// `STORE_INDEX` into a variable that is unbound or not a list.
    #[error("STORE_INDEX into non-list variable '{name}' at instruction {at}")]
    StoreIndexNonList { at: usize, name: String },

    /// `INDEX` applied to a value that is not a list. Nil was pushed.
    #[error("INDEX applied to a {kind} at instruction {at}")]
    IndexNonList { at: usize, kind: String },

    /// The mnemonic names no opcode. The instruction was skipped.
    #[error("unknown instruction '{mnemonic}' at instruction {at}")]
    UnknownOpcode { at: usize, mnemonic: String },

    /// `READ_SENSOR` named no known sensor. Nil was pushed.
    #[error("unknown sensor '{name}' at instruction {at}")]
    UnknownSensor { at: usize, name: String },
}
