//! CLI command implementations.

use std::fs;

use socratic_common::{Opcode, Program};
use socratic_vm::{RunOptions, StdConsole, Termination};

/// Options of the `run` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    pub path: String,
    pub options: RunOptions,
}

/// Parse `<program.asm> [--trace] [--seed N]`.
pub fn parse_run_args(args: &[String]) -> Result<RunArgs, String> {
    let mut path = None;
    let mut options = RunOptions::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--trace" => options.trace = true,
            "--seed" => {
                let value = iter.next().ok_or("--seed requires a value")?;
                let seed = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid seed '{value}'"))?;
                options.seed = Some(seed);
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option '{flag}'")),
            file => {
                if path.is_some() {
                    return Err(format!("unexpected argument '{file}'"));
                }
                path = Some(file.to_string());
            }
        }
    }

    let path = path.ok_or("run requires an input file")?;
    Ok(RunArgs { path, options })
}

/// Assemble and execute a program against the process console.
pub fn run(args: &[String]) -> Result<(), i32> {
    let run_args = parse_run_args(args).map_err(|msg| {
        eprintln!("error: {msg}");
        eprintln!("Usage: socratic run <program.asm> [--trace] [--seed N]");
        1
    })?;

    let program = load(&run_args.path)?;
    tracing::debug!(path = %run_args.path, instructions = program.len(), "loaded");

    // The VM has already written the fatal error to stderr.
    match socratic_vm::run_with_options(&program, StdConsole::new(), run_args.options) {
        Ok(Termination::Halted { at }) => {
            tracing::debug!(at, "halted");
            Ok(())
        }
        Ok(Termination::EndOfProgram) => Ok(()),
        Err(_) => Err(3),
    }
}

/// Assemble a program without running it and report what was loaded.
///
/// Unknown mnemonics and jumps to undefined labels are listed as warnings;
/// they only fail once the program runs. `--listing` prints the canonical
/// text of the program.
pub fn check(args: &[String]) -> Result<(), i32> {
    let mut listing = false;
    let mut path = None;
    for arg in args {
        match arg.as_str() {
            "--listing" => listing = true,
            other if path.is_none() && !other.starts_with("--") => path = Some(other),
            other => {
                eprintln!("error: unexpected argument '{other}'");
                eprintln!("Usage: socratic check <program.asm> [--listing]");
                return Err(1);
            }
        }
    }
    let Some(path) = path else {
        eprintln!("error: check requires an input file");
        eprintln!("Usage: socratic check <program.asm> [--listing]");
        return Err(1);
    };

    let program = load(path)?;
    for warning in lint(&program) {
        eprintln!("warning: {warning}");
    }

    if listing {
        print!("{}", socratic_assembler::disassemble(&program));
    } else {
        println!(
            "OK: {path} ({} instructions, {} labels)",
            program.len(),
            program.labels.len()
        );
    }
    Ok(())
}

/// Problems that will surface at run time, in program order.
pub fn lint(program: &Program) -> Vec<String> {
    let mut warnings = Vec::new();
    for (index, instr) in program.instructions.iter().enumerate() {
        let place = match instr.line {
            Some(line) => format!("line {line}"),
            None => format!("instruction {index}"),
        };
        match &instr.opcode {
            Opcode::Unknown(mnemonic) => {
                warnings.push(format!("{place}: unknown instruction '{mnemonic}'"));
            }
            Opcode::Jump | Opcode::JumpIfFalse => match instr.operand(0) {
                Some(label) if program.label(label).is_none() => {
                    warnings.push(format!("{place}: label '{label}' is not defined"));
                }
                Some(_) => {}
                None => warnings.push(format!("{place}: {} without a label", instr.opcode)),
            },
            _ => {}
        }
    }
    warnings
}

fn load(path: &str) -> Result<Program, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;

    socratic_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {e}");
        1
    })
}
