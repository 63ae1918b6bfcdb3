//! Opcode definitions for the Socratic instruction set.
//!
//! Mnemonics are resolved once, when a program is loaded. Text that names
//! no known opcode becomes [`Opcode::Unknown`] and is reported by the VM
//! when (and if) execution reaches it.

use std::fmt;
use std::str::FromStr;

/// Identifies the operation to perform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Literals
    /// Push the numeric literal operand.
    PushNum,
    /// Push the 0/1 flag operand as a boolean.
    PushBool,
    /// Push the quoted string operand.
    PushStr,
    /// Push nil.
    PushNil,

    // Variables
    /// Push the value bound to a name (nil if unbound).
    Load,
    /// Pop one value and bind it to a name.
    Store,
    /// Pop one value and append it to the list bound to a name.
    Append,
    /// Pop index, pop value, write into the list bound to a name.
    StoreIndex,
    /// Pop index, pop list, push the element.
    Index,

    // Arithmetic
    /// Pop two, push the sum (text concatenation if either is text).
    Add,
    /// Pop two, push (second_popped - first_popped).
    Sub,
    /// Pop two, push the product.
    Mul,
    /// Pop two, push the quotient.
    Div,
    /// Pop two, push the floating remainder.
    Mod,

    // Comparison
    CmpEq,
    CmpNeq,
    CmpLt,
    CmpLte,
    CmpGt,
    CmpGte,

    // Logic
    /// Pop two, push the conjunction of their truthiness.
    And,
    /// Pop two, push the disjunction of their truthiness.
    Or,

    // Collections
    /// Pop one, push its length.
    Len,
    /// Pop `count` values, push them as one list in push order.
    BuildList,

    // Console
    /// Pop and write `[?] <value>`.
    Question,
    /// Pop and write `>> <value>`.
    Print,
    /// Pop and write `! <value>`.
    PrintConcl,
    /// Read one console line into a name.
    Input,

    // Control flow
    /// Continue at a label.
    Jump,
    /// Pop one value, continue at a label if it is falsy.
    JumpIfFalse,
    /// Stop execution.
    Halt,

    // Registers
    MovTopR0,
    MovTopR1,
    PushR0,
    PushR1,

    // Sensors
    /// Push a reading from a named sensor (`time`, `rand`).
    ReadSensor,

    /// A mnemonic the instruction set does not define.
    Unknown(String),
}

/// All defined opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 36] = [
    Opcode::PushNum,
    Opcode::PushBool,
    Opcode::PushStr,
    Opcode::PushNil,
    Opcode::Load,
    Opcode::Store,
    Opcode::Append,
    Opcode::StoreIndex,
    Opcode::Index,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Mod,
    Opcode::CmpEq,
    Opcode::CmpNeq,
    Opcode::CmpLt,
    Opcode::CmpLte,
    Opcode::CmpGt,
    Opcode::CmpGte,
    Opcode::And,
    Opcode::Or,
    Opcode::Len,
    Opcode::BuildList,
    Opcode::Question,
    Opcode::Print,
    Opcode::PrintConcl,
    Opcode::Input,
    Opcode::Jump,
    Opcode::JumpIfFalse,
    Opcode::Halt,
    Opcode::MovTopR0,
    Opcode::MovTopR1,
    Opcode::PushR0,
    Opcode::PushR1,
    Opcode::ReadSensor,
];

impl Opcode {
    /// Resolve a mnemonic. Matching is case-sensitive; anything else is
    /// [`Opcode::Unknown`].
    pub fn from_mnemonic(mnemonic: &str) -> Self {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic() == mnemonic)
            .cloned()
            .unwrap_or_else(|| Opcode::Unknown(mnemonic.to_string()))
    }

    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &str {
        match self {
            Opcode::PushNum => "PUSH_NUM",
            Opcode::PushBool => "PUSH_BOOL",
            Opcode::PushStr => "PUSH_STR",
            Opcode::PushNil => "PUSH_NIL",
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
            Opcode::Append => "APPEND",
            Opcode::StoreIndex => "STORE_INDEX",
            Opcode::Index => "INDEX",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Mod => "MOD",
            Opcode::CmpEq => "CMP_EQ",
            Opcode::CmpNeq => "CMP_NEQ",
            Opcode::CmpLt => "CMP_LT",
            Opcode::CmpLte => "CMP_LTE",
            Opcode::CmpGt => "CMP_GT",
            Opcode::CmpGte => "CMP_GTE",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Len => "LEN",
            Opcode::BuildList => "BUILD_LIST",
            Opcode::Question => "QUESTION",
            Opcode::Print => "PRINT",
            Opcode::PrintConcl => "PRINT_CONCL",
            Opcode::Input => "INPUT",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfFalse => "JUMP_IF_FALSE",
            Opcode::Halt => "HALT",
            Opcode::MovTopR0 => "MOV_TOP_R0",
            Opcode::MovTopR1 => "MOV_TOP_R1",
            Opcode::PushR0 => "PUSH_R0",
            Opcode::PushR1 => "PUSH_R1",
            Opcode::ReadSensor => "READ_SENSOR",
            Opcode::Unknown(text) => text,
        }
    }

    /// Number of stack operands the opcode consumes. Checked before any pop.
    pub fn stack_inputs(&self) -> usize {
        match self {
            Opcode::Store
            | Opcode::Append
            | Opcode::Len
            | Opcode::Question
            | Opcode::Print
            | Opcode::PrintConcl
            | Opcode::JumpIfFalse
            | Opcode::MovTopR0
            | Opcode::MovTopR1 => 1,
            Opcode::StoreIndex
            | Opcode::Index
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Mod
            | Opcode::CmpEq
            | Opcode::CmpNeq
            | Opcode::CmpLt
            | Opcode::CmpLte
            | Opcode::CmpGt
            | Opcode::CmpGte
            | Opcode::And
            | Opcode::Or => 2,
            // BUILD_LIST takes its count from the operand.
            _ => 0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Opcode::Unknown(_))
    }
}

impl FromStr for Opcode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Opcode::from_mnemonic(s))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
