//! Program representation: the instruction sequence and its label table.

use std::collections::HashMap;

use crate::instruction::Instruction;

/// A loaded program.
///
/// The label table is complete before execution starts and the VM only
/// reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// The instruction stream.
    pub instructions: Vec<Instruction>,
    /// Label name → index into `instructions`.
    pub labels: HashMap<String, usize>,
}

impl Program {
    /// Create a program with no labels.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions,
            labels: HashMap::new(),
        }
    }

    /// Builder form of [`Program::define_label`].
    pub fn with_label(mut self, name: impl Into<String>, index: usize) -> Self {
        self.define_label(name, index);
        self
    }

    /// Bind `name` to `index`, replacing any earlier binding.
    pub fn define_label(&mut self, name: impl Into<String>, index: usize) {
        self.labels.insert(name.into(), index);
    }

    /// Resolve a label to its instruction index.
    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
