//! Socratic CLI: load, check and run Socratic assembly programs.
//!
//! Exit codes:
//! - 0: Success (the program halted or ran off its end)
//! - 1: Usage, read or assembly error
//! - 3: Run aborted by a fatal runtime error

pub mod commands;
pub mod logging;
