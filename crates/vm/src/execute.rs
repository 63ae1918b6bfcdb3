//! Main execution loop and opcode dispatch for the Socratic VM.
//!
//! Operands pop right first: for `a b SUB` the VM pops `b`, then `a`, and
//! pushes `a - b`. Wherever an opcode reads a number from a value that is
//! not a [`Value::Number`], it reads 0 (see [`numeric`]).

use socratic_common::literal::{parse_flag_literal, parse_string_literal};
use socratic_common::number::{format_number, looks_numeric, parse_number_literal};
use socratic_common::value::{AFFIRMATIVE_WORDS, NEGATIVE_WORDS};
use socratic_common::{Instruction, Opcode, Value};

use crate::console::Console;
use crate::error::{RuntimeError, Warning};
use crate::machine::{Termination, VM};
use crate::sensor::Sensor;

/// Absolute tolerance of number equality in `CMP_EQ`/`CMP_NEQ`.
pub const EQ_TOLERANCE: f64 = 1e-9;

/// What the loop does after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Goto(usize),
    Halt,
}

impl<'a, C: Console> VM<'a, C> {
    /// Execute the program until HALT, the end of the instruction stream,
    /// or a fatal error.
    ///
    /// Fatal errors are written to the diagnostic channel before being
    /// returned; the program counter is left on the failing instruction.
    pub fn execute(&mut self) -> Result<Termination, RuntimeError> {
        self.state.started = std::time::Instant::now();
        tracing::debug!(
            instructions = self.program.len(),
            labels = self.program.labels.len(),
            "run started"
        );

        let result = self.dispatch_loop();
        match &result {
            Ok(termination) => {
                tracing::debug!(?termination, warnings = self.warnings.len(), "run finished");
            }
            Err(err) => {
                tracing::warn!(at = err.at(), "run aborted: {err}");
                self.console.write_diagnostic(&format!("[VM] error: {err}"));
            }
        }
        result
    }

    fn dispatch_loop(&mut self) -> Result<Termination, RuntimeError> {
        let program = self.program;

        while let Some(instr) = program.instructions.get(self.pc) {
            if self.options.trace {
                let line = format!("[PC={}] {instr}", self.pc);
                self.console.write_diagnostic(&line);
            }
            tracing::trace!(pc = self.pc, %instr, "dispatch");

            match self.step(instr)? {
                Flow::Next => self.pc += 1,
                Flow::Goto(target) => self.pc = target,
                Flow::Halt => return Ok(Termination::Halted { at: self.pc }),
            }
        }

        Ok(Termination::EndOfProgram)
    }

    fn step(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        match &instr.opcode {
            // Control flow
            Opcode::Halt => return Ok(Flow::Halt),
            Opcode::Jump => return self.exec_jump(instr),
            Opcode::JumpIfFalse => return self.exec_jump_if_false(instr),

            // Literals
            Opcode::PushNum => self.exec_push_num(instr),
            Opcode::PushBool => self.exec_push_bool(instr),
            Opcode::PushStr => self.exec_push_str(instr),
            Opcode::PushNil => self.push(Value::Nil),

            // Variables
            Opcode::Load => self.exec_load(instr),
            Opcode::Store => self.exec_store(instr)?,
            Opcode::Append => self.exec_append(instr)?,
            Opcode::StoreIndex => self.exec_store_index(instr)?,
            Opcode::Index => self.exec_index(instr)?,

            // Arithmetic
            Opcode::Add => self.exec_add(instr)?,
            Opcode::Sub => self.exec_numeric(instr, |a, b| a - b)?,
            Opcode::Mul => self.exec_numeric(instr, |a, b| a * b)?,
            Opcode::Div => self.exec_div(instr)?,
            // Floating remainder: the sign follows the left operand, and a
            // zero divisor gives NaN.
            Opcode::Mod => self.exec_numeric(instr, |a, b| a % b)?,

            // Comparison
            Opcode::CmpEq => self.exec_compare(instr, values_equal)?,
            Opcode::CmpNeq => self.exec_compare(instr, values_differ)?,
            Opcode::CmpLt => self.exec_compare(instr, |a, b| numeric(a) < numeric(b))?,
            Opcode::CmpLte => self.exec_compare(instr, |a, b| numeric(a) <= numeric(b))?,
            Opcode::CmpGt => self.exec_compare(instr, |a, b| numeric(a) > numeric(b))?,
            Opcode::CmpGte => self.exec_compare(instr, |a, b| numeric(a) >= numeric(b))?,

            // Logic (both sides are always evaluated)
            Opcode::And => self.exec_compare(instr, |a, b| a.is_truthy() && b.is_truthy())?,
            Opcode::Or => self.exec_compare(instr, |a, b| a.is_truthy() || b.is_truthy())?,

            // Collections
            Opcode::Len => self.exec_len(instr)?,
            Opcode::BuildList => self.exec_build_list(instr)?,

            // Console
            Opcode::Question => self.exec_write(instr, "[?]")?,
            Opcode::Print => self.exec_write(instr, ">>")?,
            Opcode::PrintConcl => self.exec_write(instr, "!")?,
            Opcode::Input => self.exec_input(instr),

            // Registers
            Opcode::MovTopR0 => self.exec_mov_top(instr, 0)?,
            Opcode::MovTopR1 => self.exec_mov_top(instr, 1)?,
            Opcode::PushR0 => self.push(self.state.registers[0].clone()),
            Opcode::PushR1 => self.push(self.state.registers[1].clone()),

            // Sensors
            Opcode::ReadSensor => self.exec_read_sensor(instr),

            Opcode::Unknown(mnemonic) => self.report(Warning::UnknownOpcode {
                at: self.pc,
                mnemonic: mnemonic.clone(),
            }),
        }
        Ok(Flow::Next)
    }

    /// Operand `0` of a non-control opcode. A missing operand is reported
    /// and the caller skips the instruction.
    fn operand_or_report<'i>(&mut self, instr: &'i Instruction) -> Option<&'i str> {
        let operand = instr.operand(0);
        if operand.is_none() {
            self.report(Warning::MissingOperand {
                at: self.pc,
                opcode: instr.opcode.mnemonic().to_string(),
            });
        }
        operand
    }

    /// Operand `0` of a control opcode. A missing operand is fatal.
    fn operand_or_fail<'i>(
        &self,
        instr: &'i Instruction,
        opcode: &'static str,
    ) -> Result<&'i str, RuntimeError> {
        instr
            .operand(0)
            .ok_or(RuntimeError::MissingOperand { at: self.pc, opcode })
    }

    /// Check the stack depth for `instr` and pop its two operands as
    /// `(left, right)`.
    fn pop_pair(&mut self, instr: &Instruction) -> Result<(Value, Value), RuntimeError> {
        self.require(instr.opcode.stack_inputs())?;
        let right = self.pop();
        let left = self.pop();
        Ok((left, right))
    }

    /// Position named by an index operand in a list of `length` elements.
    fn locate(&self, opcode: &'static str, index: &Value, length: usize) -> Result<usize, Warning> {
        let Some(position) = list_index(index) else {
            return Err(Warning::NonFiniteIndex {
                at: self.pc,
                opcode,
                index: format_number(numeric(index)),
            });
        };
        checked_index(position, length).ok_or(Warning::IndexOutOfRange {
            at: self.pc,
            opcode,
            index: position,
            length,
        })
    }

    // ---- Literals ----

    fn exec_push_num(&mut self, instr: &Instruction) {
        let Some(token) = self.operand_or_report(instr) else {
            return;
        };
        let n = match parse_number_literal(token) {
            Some(n) => n,
            None => {
                self.report(Warning::MalformedNumber {
                    at: self.pc,
                    token: token.to_string(),
                });
                0.0
            }
        };
        self.push(Value::Number(n));
    }

    fn exec_push_bool(&mut self, instr: &Instruction) {
        let Some(token) = self.operand_or_report(instr) else {
            return;
        };
        match parse_flag_literal(token) {
            Some(flag) => self.push(Value::Bool(flag)),
            None => self.report(Warning::MalformedFlag {
                at: self.pc,
                token: token.to_string(),
            }),
        }
    }

    fn exec_push_str(&mut self, instr: &Instruction) {
        if let Some(raw) = self.operand_or_report(instr) {
            self.push(Value::Text(parse_string_literal(raw)));
        }
    }

    // ---- Variables ----

    fn exec_load(&mut self, instr: &Instruction) {
        if let Some(name) = self.operand_or_report(instr) {
            let value = self.state.variables.get(name).cloned().unwrap_or_default();
            self.push(value);
        }
    }

    fn exec_store(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let Some(name) = self.operand_or_report(instr) else {
            return Ok(());
        };
        self.require(instr.opcode.stack_inputs())?;
        let value = self.pop();
        self.state.variables.insert(name.to_string(), value);
        Ok(())
    }

    /// Append to the list bound to the name. An unbound or non-list name is
    /// rebound to a fresh empty list first.
    fn exec_append(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let Some(name) = self.operand_or_report(instr) else {
            return Ok(());
        };
        self.require(instr.opcode.stack_inputs())?;
        let value = self.pop();

        if !matches!(self.state.variables.get(name), Some(Value::List(_))) {
            let fresh = Value::empty_list();
            self.state.variables.insert(name.to_string(), fresh);
        }
        if let Some(items) = self.state.variables.get(name).and_then(Value::as_list) {
            items.borrow_mut().push(value);
        }
        Ok(())
    }

    /// Pops the index (top of stack), then the value.
    fn exec_store_index(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let Some(name) = self.operand_or_report(instr) else {
            return Ok(());
        };
        self.require(instr.opcode.stack_inputs())?;
        let index = self.pop();
        let value = self.pop();

        let target = self.state.variables.get(name).and_then(Value::as_list);
        let Some(items) = target.cloned() else {
            self.report(Warning::StoreIndexNonList {
                at: self.pc,
                name: name.to_string(),
            });
            return Ok(());
        };

        let length = items.borrow().len();
        match self.locate("STORE_INDEX", &index, length) {
            Ok(i) => items.borrow_mut()[i] = value,
            Err(warning) => self.report(warning),
        }
        Ok(())
    }

    /// Pops the index (top of stack), then the list.
    fn exec_index(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let (list, index) = self.pop_pair(instr)?;

        let element = match &list {
            Value::List(items) => {
                let length = items.borrow().len();
                self.locate("INDEX", &index, length)
                    .map(|i| items.borrow()[i].clone())
            }
            other => Err(Warning::IndexNonList {
                at: self.pc,
                kind: other.kind().to_string(),
            }),
        };

        match element {
            Ok(value) => self.push(value),
            Err(warning) => {
                self.report(warning);
                self.push(Value::Nil);
            }
        }
        Ok(())
    }

    // ---- Arithmetic ----

    /// Text concatenation if either side is text, numeric addition otherwise.
    fn exec_add(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let (left, right) = self.pop_pair(instr)?;
        let sum = match (&left, &right) {
            (Value::Text(_), _) | (_, Value::Text(_)) => Value::Text(format!("{left}{right}")),
            _ => Value::Number(numeric(&left) + numeric(&right)),
        };
        self.push(sum);
        Ok(())
    }

    fn exec_numeric(
        &mut self,
        instr: &Instruction,
        op: fn(f64, f64) -> f64,
    ) -> Result<(), RuntimeError> {
        let (left, right) = self.pop_pair(instr)?;
        self.push(Value::Number(op(numeric(&left), numeric(&right))));
        Ok(())
    }

    fn exec_div(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let (left, right) = self.pop_pair(instr)?;
        let divisor = numeric(&right);
        if divisor == 0.0 {
            self.report(Warning::DivisionByZero { at: self.pc });
            self.push(Value::Number(0.0));
        } else {
            self.push(Value::Number(numeric(&left) / divisor));
        }
        Ok(())
    }

    // ---- Comparison & logic ----

    fn exec_compare(
        &mut self,
        instr: &Instruction,
        test: fn(&Value, &Value) -> bool,
    ) -> Result<(), RuntimeError> {
        let (left, right) = self.pop_pair(instr)?;
        self.push(Value::Bool(test(&left, &right)));
        Ok(())
    }

    // ---- Collections ----

    fn exec_len(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        self.require(instr.opcode.stack_inputs())?;
        let length = match self.pop() {
            Value::List(items) => items.borrow().len(),
            Value::Text(s) => s.chars().count(),
            _ => 0,
        };
        self.push(Value::Number(length as f64));
        Ok(())
    }

    /// Pops `count` values and pushes them as one list, first pushed first.
    fn exec_build_list(&mut self, instr: &Instruction) -> Result<(), RuntimeError> {
        let token = self.operand_or_fail(instr, "BUILD_LIST")?;
        let count: usize = token.parse().map_err(|_| RuntimeError::InvalidCount {
            at: self.pc,
            token: token.to_string(),
        })?;
        self.require(count)?;

        let start = self.state.stack.len() - count;
        let items = self.state.stack.split_off(start);
        self.push(Value::list(items));
        Ok(())
    }

    // ---- Console ----

    fn exec_write(&mut self, instr: &Instruction, prefix: &str) -> Result<(), RuntimeError> {
        self.require(instr.opcode.stack_inputs())?;
        let value = self.pop();
        self.console.write_output(&format!("{prefix} {value}"));
        Ok(())
    }

    fn exec_input(&mut self, instr: &Instruction) {
        let Some(name) = self.operand_or_report(instr) else {
            return;
        };
        let value = match self.console.read_line() {
            Some(line) => classify_input(&line),
            None => Value::Nil,
        };
        self.state.variables.insert(name.to_string(), value);
    }

    // ---- Control flow ----

    fn exec_jump(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let label = self.operand_or_fail(instr, "JUMP")?;
        Ok(Flow::Goto(self.resolve_label(label)?))
    }

    /// The label is resolved before the branch, so an unknown label fails
    /// the run whichever way the condition goes.
    fn exec_jump_if_false(&mut self, instr: &Instruction) -> Result<Flow, RuntimeError> {
        let label = self.operand_or_fail(instr, "JUMP_IF_FALSE")?;
        self.require(instr.opcode.stack_inputs())?;
        let condition = self.pop();
        let target = self.resolve_label(label)?;

        if condition.is_truthy() {
            Ok(Flow::Next)
        } else {
            Ok(Flow::Goto(target))
        }
    }

    // ---- Registers ----

    fn exec_mov_top(&mut self, instr: &Instruction, register: usize) -> Result<(), RuntimeError> {
        self.require(instr.opcode.stack_inputs())?;
        self.state.registers[register] = self.pop();
        Ok(())
    }

    // ---- Sensors ----

    fn exec_read_sensor(&mut self, instr: &Instruction) {
        let Some(name) = self.operand_or_report(instr) else {
            return;
        };
        let reading = match Sensor::from_name(name) {
            Some(Sensor::Time) => Value::Number(self.state.elapsed_secs()),
            Some(Sensor::Rand) => Value::Number(self.state.rng.next_f64()),
            None => {
                self.report(Warning::UnknownSensor {
                    at: self.pc,
                    name: name.to_string(),
                });
                Value::Nil
            }
        };
        self.push(reading);
    }
}

/// The number an opcode reads from `value`: its payload for a number, 0 for
/// every other kind.
pub fn numeric(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        _ => 0.0,
    }
}

/// `CMP_EQ`: numbers within [`EQ_TOLERANCE`], anything else by rendering.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => (a - b).abs() < EQ_TOLERANCE,
        _ => left.to_string() == right.to_string(),
    }
}

/// `CMP_NEQ`: numbers at least [`EQ_TOLERANCE`] apart, anything else by
/// rendering.
pub fn values_differ(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => (a - b).abs() >= EQ_TOLERANCE,
        _ => left.to_string() != right.to_string(),
    }
}

/// Classify one line of console input.
///
/// Blank input is nil; numbers become numbers; the affirmative and
/// negative words become booleans; anything else is text.
pub fn classify_input(line: &str) -> Value {
    let line = line.trim();
    if line.is_empty() {
        return Value::Nil;
    }
    if looks_numeric(line) {
        if let Some(n) = parse_number_literal(line) {
            return Value::Number(n);
        }
    }
    if AFFIRMATIVE_WORDS.contains(&line) {
        Value::Bool(true)
    } else if NEGATIVE_WORDS.contains(&line) {
        Value::Bool(false)
    } else {
        Value::text(line)
    }
}

/// Index operand, truncated toward zero. NaN and the infinities name no
/// position.
fn list_index(value: &Value) -> Option<i64> {
    let n = numeric(value);
    n.is_finite().then(|| n as i64)
}

fn checked_index(index: i64, length: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|&i| i < length)
}
