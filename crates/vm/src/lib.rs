//! Socratic virtual machine: executes loaded Socratic assembly programs.
//!
//! The VM is a stack machine with:
//! - An operand stack of dynamically tagged [`Value`](socratic_common::Value)s
//! - Named variables and two single-value registers
//! - `time` and `rand` sensors
//! - A [`Console`] for `INPUT`, printed output and diagnostics
//!
//! Faults are split in two. Non-fatal ones ([`Warning`]) are reported on
//! the diagnostic channel and worked around; fatal ones ([`RuntimeError`])
//! stop the run.
//!
//! # Usage
//!
//! ```
//! use socratic_common::{Instruction, Opcode, Program};
//! use socratic_vm::{run, MemoryConsole, Termination};
//!
//! let program = Program::new(vec![
//!     Instruction::new(Opcode::PushNum, ["40"]),
//!     Instruction::new(Opcode::PushNum, ["2"]),
//!     Instruction::bare(Opcode::Add),
//!     Instruction::bare(Opcode::Print),
//!     Instruction::bare(Opcode::Halt),
//! ]);
//!
//! let mut console = MemoryConsole::new();
//! let outcome = run(&program, &mut console).unwrap();
//! assert_eq!(outcome, Termination::Halted { at: 4 });
//! assert_eq!(console.output, vec![">> 42"]);
//! ```

pub mod console;
pub mod error;
pub mod execute;
pub mod machine;
pub mod sensor;

pub use console::{Console, MemoryConsole, StdConsole};
pub use error::{RuntimeError, Warning};
pub use machine::{RunOptions, RuntimeState, Termination, VM};

use socratic_common::Program;

/// Execute a program with default options.
///
/// This is the primary entry point for the VM. A fresh runtime state is
/// built for the run and dropped when it ends.
///
/// # Errors
///
/// Returns [`RuntimeError`] if the run was aborted (stack underflow,
/// unknown jump label, missing jump or list-count operand).
pub fn run<C: Console>(program: &Program, console: C) -> Result<Termination, RuntimeError> {
    run_with_options(program, console, RunOptions::default())
}

/// Execute a program with explicit [`RunOptions`].
pub fn run_with_options<C: Console>(
    program: &Program,
    console: C,
    options: RunOptions,
) -> Result<Termination, RuntimeError> {
    let mut vm = VM::with_options(program, console, options);
    vm.execute()
}
