//! Console ports: where `INPUT` reads and where output and diagnostics go.
//!
//! The VM only talks to the [`Console`] trait, so tests and embedders can
//! script input and capture everything the program writes.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// The three channels a running program touches.
pub trait Console {
    /// Block for one line of input. `None` means end of input.
    fn read_line(&mut self) -> Option<String>;

    /// Write one line to the primary output channel.
    fn write_output(&mut self, line: &str);

    /// Write one line to the diagnostic channel.
    fn write_diagnostic(&mut self, line: &str);
}

impl<C: Console + ?Sized> Console for &mut C {
    fn read_line(&mut self) -> Option<String> {
        (**self).read_line()
    }

    fn write_output(&mut self, line: &str) {
        (**self).write_output(line)
    }

    fn write_diagnostic(&mut self, line: &str) {
        (**self).write_diagnostic(line)
    }
}

/// Process console: stdin, stdout and stderr.
///
/// Each read prints a `> ` prompt on stdout first.
#[derive(Debug, Default)]
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for StdConsole {
    fn read_line(&mut self) -> Option<String> {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }

    fn write_output(&mut self, line: &str) {
        println!("{line}");
    }

    fn write_diagnostic(&mut self, line: &str) {
        eprintln!("{line}");
    }
}

/// In-memory console with scripted input and captured output.
#[derive(Debug, Clone, Default)]
pub struct MemoryConsole {
    /// Lines returned by successive reads.
    pub input: VecDeque<String>,
    /// Everything written to the output channel.
    pub output: Vec<String>,
    /// Everything written to the diagnostic channel.
    pub diagnostics: Vec<String>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// A console whose reads return `lines` in order, then end of input.
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// True if any diagnostic line contains `needle`.
    pub fn diagnosed(&self, needle: &str) -> bool {
        self.diagnostics.iter().any(|line| line.contains(needle))
    }
}

impl Console for MemoryConsole {
    fn read_line(&mut self) -> Option<String> {
        self.input.pop_front()
    }

    fn write_output(&mut self, line: &str) {
        self.output.push(line.to_string());
    }

    fn write_diagnostic(&mut self, line: &str) {
        self.diagnostics.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_console_reads_in_order_then_ends() {
        let mut console = MemoryConsole::with_input(["um", "dois"]);
        assert_eq!(console.read_line().as_deref(), Some("um"));
        assert_eq!(console.read_line().as_deref(), Some("dois"));
        assert_eq!(console.read_line(), None);
    }

    #[test]
    fn memory_console_captures_channels_separately() {
        let mut console = MemoryConsole::new();
        console.write_output(">> 1");
        console.write_diagnostic("[VM] warning: x");
        assert_eq!(console.output, vec![">> 1"]);
        assert_eq!(console.diagnostics, vec!["[VM] warning: x"]);
        assert!(console.diagnosed("warning"));
        assert!(!console.diagnosed("error"));
    }

    #[test]
    fn mutable_reference_is_a_console() {
        fn write_through<C: Console>(mut console: C) {
            console.write_output("via ref");
        }
        let mut console = MemoryConsole::new();
        write_through(&mut console);
        assert_eq!(console.output, vec!["via ref"]);
    }
}
