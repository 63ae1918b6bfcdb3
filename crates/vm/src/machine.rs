//! VM state management: operand stack, variables, registers, clock, random
//! source.

use std::collections::HashMap;
use std::time::Instant;

use crate::console::Console;
use crate::error::{RuntimeError, Warning};
use crate::sensor::XorShift64;
use socratic_common::{Program, Value};

/// Number of general-purpose registers.
pub const REGISTER_COUNT: usize = 2;

/// Engine configuration for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Write `[PC=<pc>] <instruction>` to the diagnostic channel before each
    /// dispatch.
    pub trace: bool,
    /// Seed for the `rand` sensor. `None` seeds from entropy.
    pub seed: Option<u64>,
}

/// How a run that was not aborted came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A `HALT` at the given instruction index.
    Halted { at: usize },
    /// The program counter moved past the last instruction.
    EndOfProgram,
}

/// Everything a program mutates while it runs. Built fresh for each run.
#[derive(Debug)]
pub struct RuntimeState {
    /// Operand stack. The top is the last element.
    pub stack: Vec<Value>,
    /// Variable bindings.
    pub variables: HashMap<String, Value>,
    /// `R0` and `R1`. Start as nil.
    pub registers: [Value; REGISTER_COUNT],
    /// Reference point of the `time` sensor.
    pub started: Instant,
    /// Source of the `rand` sensor.
    pub rng: XorShift64,
}

impl RuntimeState {
    pub fn new(rng: XorShift64) -> Self {
        Self {
            stack: Vec::new(),
            variables: HashMap::new(),
            registers: [Value::Nil, Value::Nil],
            started: Instant::now(),
            rng,
        }
    }

    /// Seconds since [`RuntimeState::started`].
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// The Socratic virtual machine.
pub struct VM<'a, C: Console> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    /// Mutable run state.
    pub(crate) state: RuntimeState,
    /// Input, output and diagnostic channels.
    pub(crate) console: C,
    pub(crate) options: RunOptions,
    /// Program counter (instruction index).
    pub(crate) pc: usize,
    /// Non-fatal conditions reported so far.
    pub(crate) warnings: Vec<Warning>,
}

impl<'a, C: Console> VM<'a, C> {
    /// Create a VM with default options.
    pub fn new(program: &'a Program, console: C) -> Self {
        Self::with_options(program, console, RunOptions::default())
    }

    pub fn with_options(program: &'a Program, console: C, options: RunOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => XorShift64::new(seed),
            None => XorShift64::from_entropy(),
        };
        Self {
            program,
            state: RuntimeState::new(rng),
            console,
            options,
            pc: 0,
            warnings: Vec::new(),
        }
    }

    /// Current program counter. After a run it marks where execution stopped.
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// The operand stack, bottom first.
    pub fn stack(&self) -> &[Value] {
        &self.state.stack
    }

    /// The value bound to `name`, if any.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.state.variables.get(name)
    }

    /// Register `index` (0 or 1).
    pub fn register(&self, index: usize) -> Option<&Value> {
        self.state.registers.get(index)
    }

    pub fn state(&self) -> &RuntimeState {
        &self.state
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.state.stack.push(value);
    }

    /// Pop a value. Callers check the stack depth first; an empty stack
    /// here is reported and yields nil.
    pub(crate) fn pop(&mut self) -> Value {
        match self.state.stack.pop() {
            Some(value) => value,
            None => {
                let line = format!("[VM] warning: pop on empty stack at instruction {}", self.pc);
                self.console.write_diagnostic(&line);
                Value::Nil
            }
        }
    }

    /// Fail the run unless at least `needed` values are on the stack.
    pub(crate) fn require(&self, needed: usize) -> Result<(), RuntimeError> {
        if self.state.stack.len() < needed {
            return Err(RuntimeError::StackUnderflow { at: self.pc, needed });
        }
        Ok(())
    }

    /// Report a non-fatal condition and keep going.
    pub(crate) fn report(&mut self, warning: Warning) {
        tracing::debug!(pc = self.pc, "{warning}");
        self.console.write_diagnostic(&format!("[VM] warning: {warning}"));
        self.warnings.push(warning);
    }

    /// Resolve a jump target.
    pub(crate) fn resolve_label(&self, label: &str) -> Result<usize, RuntimeError> {
        self.program
            .label(label)
            .ok_or_else(|| RuntimeError::UnknownLabel {
                at: self.pc,
                label: label.to_string(),
            })
    }
}
