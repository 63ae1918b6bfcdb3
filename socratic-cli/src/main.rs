//! Socratic CLI entry point.

use std::process;

use socratic_cli::{commands, logging};

fn main() {
    logging::maybe_init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "check" => commands::check(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: socratic <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <program.asm> [--trace] [--seed N]   Assemble and execute a program");
    eprintln!("  check <program.asm> [--listing]          Assemble only and report the result");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SOCRATIC_LOG=<filter>   Enable engine logging on stderr");
}
