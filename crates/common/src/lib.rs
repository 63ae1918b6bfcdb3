//! Socratic VM common types.
//!
//! This crate provides the data structures shared by the loader and the
//! virtual machine:
//!
//! - [`Value`]: the five runtime value kinds
//! - [`Opcode`]: the closed opcode set, plus an unknown-mnemonic variant
//! - [`Instruction`]: an opcode with its raw operand text
//! - [`Program`]: an instruction sequence and its label table
//! - [`number`] and [`literal`]: rendering and lazy operand parsing
//!
//! # Dependencies
//!
//! None at runtime. `proptest` is used for property tests.

pub mod instruction;
pub mod literal;
pub mod number;
pub mod opcode;
pub mod program;
pub mod value;

// Re-export commonly used types at the crate root.
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use program::Program;
pub use value::{ListRef, Value, ValueKind};

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy that generates a random defined Opcode.
    fn arb_opcode() -> impl Strategy<Value = Opcode> {
        prop::sample::select(opcode::ALL_OPCODES.to_vec())
    }

    /// Finite numbers well inside the f64 range, so rounding to 15 digits
    /// cannot overflow to infinity.
    fn arb_number() -> impl Strategy<Value = f64> {
        (prop::num::f64::NORMAL | prop::num::f64::ZERO)
            .prop_filter("inside rendering range", |n| n.abs() < 1e300)
    }

    proptest! {
        /// Rendering a number and parsing it back agrees to 15 significant
        /// digits.
        #[test]
        fn number_render_roundtrip(n in arb_number()) {
            let text = number::format_number(n);
            let parsed = number::parse_number_literal(&text).unwrap();
            let tolerance = n.abs() * 1e-14;
            prop_assert!((parsed - n).abs() <= tolerance, "{n} -> {text} -> {parsed}");
        }

        /// Integers below 1e15 render exactly as integers.
        #[test]
        fn integers_render_exactly(i in -999_999_999_999_999i64..=999_999_999_999_999i64) {
            prop_assert_eq!(number::format_number(i as f64), i.to_string());
        }

        /// Any mnemonic resolves and renders back to the same text.
        #[test]
        fn mnemonic_text_roundtrip(text in "[A-Z_]{1,16}") {
            let op = Opcode::from_mnemonic(&text);
            prop_assert_eq!(op.mnemonic(), text.as_str());
        }

        /// Defined opcodes survive instruction display.
        #[test]
        fn instruction_display_starts_with_mnemonic(
            op in arb_opcode(),
            operands in prop::collection::vec("[a-z0-9]{1,8}", 0..3),
        ) {
            let instr = Instruction::new(op.clone(), operands.clone());
            let text = instr.to_string();
            let mut parts = text.split(' ');
            prop_assert_eq!(parts.next(), Some(op.mnemonic()));
            prop_assert_eq!(parts.map(str::to_string).collect::<Vec<_>>(), operands);
        }

        /// A string literal wrapped in quotes decodes to itself when it
        /// contains no quote or backslash.
        #[test]
        fn plain_string_literal_roundtrip(s in "[^\"\\\\]{0,32}") {
            let raw = format!("\"{s}\"");
            prop_assert_eq!(literal::parse_string_literal(&raw), s);
        }
    }
}
