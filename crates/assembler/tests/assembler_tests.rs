//! Integration tests for the Socratic assembler.
//!
//! Tests cover:
//! - Dialogue programs of the kind the Socratic compiler emits (assemble,
//!   execute, check the console)
//! - Roundtrip properties (assemble → disassemble → assemble)
//! - Loader errors and comment/whitespace handling

use socratic_assembler::{assemble, disassemble, AsmError};
use socratic_common::Opcode;
use socratic_vm::{
    run, run_with_options, MemoryConsole, RunOptions, RuntimeError, Termination,
};

// ---- Test helpers ----

/// Assemble and execute with scripted input. Return the outcome and console.
fn run_text(
    text: &str,
    input: &[&str],
) -> (Result<Termination, RuntimeError>, MemoryConsole) {
    let program = assemble(text).unwrap_or_else(|err| panic!("Assembly failed: {err}"));
    let mut console = MemoryConsole::with_input(input.iter().copied());
    let result = run(&program, &mut console);
    (result, console)
}

/// Assemble and execute; the run must complete. Return the printed lines.
fn run_ok(text: &str, input: &[&str]) -> Vec<String> {
    let (result, console) = run_text(text, input);
    result.unwrap_or_else(|err| panic!("Execution failed: {err}"));
    console.output
}

const IF_ELSE: &str = "\
PUSH_STR \"Voce sabe que nada sabe?\"
QUESTION
INPUT resposta
LOAD resposta
JUMP_IF_FALSE L_else_0
PUSH_STR \"Entao voce e sabio\"
PRINT_CONCL
JUMP L_endif_0
LABEL L_else_0
PUSH_STR \"Examine-se\"
PRINT_CONCL
LABEL L_endif_0
HALT
";

const FACTORIAL: &str = "\
PUSH_NUM 5
STORE n
PUSH_NUM 1
STORE acc
LABEL L_while_0
LOAD n
PUSH_NUM 1
CMP_GT
JUMP_IF_FALSE L_end_0
LOAD acc
LOAD n
MUL
STORE acc
LOAD n
PUSH_NUM 1
SUB
STORE n
JUMP L_while_0
LABEL L_end_0
LOAD acc
PRINT
";

const LIST_WALK: &str = "\
PUSH_STR \"Justica\"
PUSH_STR \"Coragem\"
PUSH_STR \"Sabedoria\"
BUILD_LIST 3
STORE virtudes
PUSH_NUM 0
STORE i
LABEL L_while_0
LOAD i
LOAD virtudes
LEN
CMP_LT
JUMP_IF_FALSE L_end_0
LOAD virtudes
LOAD i
INDEX
PRINT
LOAD i
PUSH_NUM 1
ADD
STORE i
JUMP L_while_0
LABEL L_end_0
HALT
";

// ---- Program tests ----

#[test]
fn hello_world() {
    let output = run_ok("PUSH_STR \"Ola, mundo\"\nPRINT\nHALT\n", &[]);
    assert_eq!(output, vec![">> Ola, mundo"]);
}

#[test]
fn greeting_concatenates_input() {
    let text = "\
INPUT nome
PUSH_STR \"Ola, \"
LOAD nome
ADD
PRINT
";
    assert_eq!(run_ok(text, &["Socrates"]), vec![">> Ola, Socrates"]);
}

#[test]
fn numeric_input_is_a_number() {
    let text = "INPUT x\nLOAD x\nPUSH_NUM 2\nMUL\nPRINT\n";
    assert_eq!(run_ok(text, &["21"]), vec![">> 42"]);
}

#[test]
fn if_else_takes_then_branch() {
    assert_eq!(
        run_ok(IF_ELSE, &["Sim"]),
        vec!["[?] Voce sabe que nada sabe?", "! Entao voce e sabio"]
    );
}

#[test]
fn if_else_takes_else_branch() {
    assert_eq!(
        run_ok(IF_ELSE, &["Nao"]),
        vec!["[?] Voce sabe que nada sabe?", "! Examine-se"]
    );
}

#[test]
fn if_else_at_end_of_input_is_false() {
    let output = run_ok(IF_ELSE, &[]);
    assert_eq!(output.last().map(String::as_str), Some("! Examine-se"));
}

#[test]
fn while_loop_factorial() {
    assert_eq!(run_ok(FACTORIAL, &[]), vec![">> 120"]);
}

#[test]
fn list_walk_with_index() {
    assert_eq!(
        run_ok(LIST_WALK, &[]),
        vec![">> Justica", ">> Coragem", ">> Sabedoria"]
    );
}

#[test]
fn append_accumulates() {
    let text = "\
PUSH_NUM 1
APPEND xs
PUSH_NUM 2
APPEND xs
PUSH_STR \"tres\"
APPEND xs
LOAD xs
PRINT
LOAD xs
LEN
PRINT
";
    assert_eq!(run_ok(text, &[]), vec![">> [1, 2, tres]", ">> 3"]);
}

#[test]
fn store_index_updates_element() {
    let text = "\
PUSH_NUM 10
PUSH_NUM 20
BUILD_LIST 2
STORE xs
PUSH_NUM 99
PUSH_NUM 1
STORE_INDEX xs
LOAD xs
PRINT
";
    assert_eq!(run_ok(text, &[]), vec![">> [10, 99]"]);
}

#[test]
fn registers_swap() {
    let text = "\
PUSH_NUM 1
PUSH_NUM 2
MOV_TOP_R0
MOV_TOP_R1
PUSH_R0
PUSH_R1
SUB
PRINT
";
    assert_eq!(run_ok(text, &[]), vec![">> 1"]);
}

#[test]
fn rand_sensor_below_one() {
    let text = "READ_SENSOR rand\nPUSH_NUM 1\nCMP_LT\nPRINT\n";
    assert_eq!(run_ok(text, &[]), vec![">> Verdadeiro"]);
}

#[test]
fn string_escapes_decode_at_run_time() {
    let text = "PUSH_STR \"ele disse \\\"conhece-te\\\"\"\nPRINT\n";
    assert_eq!(run_ok(text, &[]), vec![">> ele disse \"conhece-te\""]);
}

#[test]
fn unquoted_push_str_is_taken_verbatim() {
    assert_eq!(run_ok("PUSH_STR sem aspas\nPRINT\n", &[]), vec![">> sem aspas"]);
}

#[test]
fn division_by_zero_keeps_running() {
    let (result, console) = run_text("PUSH_NUM 1\nPUSH_NUM 0\nDIV\nPRINT\nHALT\n", &[]);
    assert_eq!(result, Ok(Termination::Halted { at: 4 }));
    assert_eq!(console.output, vec![">> 0"]);
    assert!(console.diagnosed("[VM] warning: division by zero"));
}

#[test]
fn unknown_opcode_is_reported_at_run_time() {
    let (result, console) = run_text("DANCAR\nPUSH_NUM 1\nPRINT\n", &[]);
    assert_eq!(result, Ok(Termination::EndOfProgram));
    assert_eq!(console.output, vec![">> 1"]);
    assert!(console.diagnosed("unknown instruction 'DANCAR' at instruction 0"));
}

#[test]
fn jump_to_missing_label_aborts() {
    let text = "\
PUSH_STR \"antes\"
PRINT
JUMP lugar_nenhum
PUSH_STR \"depois\"
PRINT
";
    let (result, console) = run_text(text, &[]);
    assert_eq!(
        result,
        Err(RuntimeError::UnknownLabel {
            at: 2,
            label: "lugar_nenhum".to_string()
        })
    );
    assert_eq!(console.output, vec![">> antes"]);
    assert!(console.diagnosed("[VM] error: label not found: lugar_nenhum"));
}

#[test]
fn stack_underflow_aborts() {
    let (result, console) = run_text("PUSH_NUM 1\nADD\nPRINT\n", &[]);
    assert_eq!(result, Err(RuntimeError::StackUnderflow { at: 1, needed: 2 }));
    assert!(console.output.is_empty());
}

#[test]
fn trace_lines_follow_jumps() {
    let text = "\
JUMP fim
PUSH_NUM 1
LABEL fim
HALT
";
    let program = assemble(text).unwrap();
    let mut console = MemoryConsole::new();
    let options = RunOptions {
        trace: true,
        seed: None,
    };
    let result = run_with_options(&program, &mut console, options);
    assert_eq!(result, Ok(Termination::Halted { at: 2 }));
    assert_eq!(console.diagnostics, vec!["[PC=0] JUMP fim", "[PC=2] HALT"]);
}

// ---- Roundtrip tests ----

#[test]
fn roundtrip_programs() {
    for text in [IF_ELSE, FACTORIAL, LIST_WALK] {
        let first = assemble(text).unwrap();
        let canonical = disassemble(&first);
        assert_eq!(canonical, text);
        let second = assemble(&canonical).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn canonical_text_drops_comments_and_indentation() {
    let text = "\
; fatorial
  PUSH_NUM 5
\tSTORE   n

LABEL   fim
";
    let canonical = disassemble(&assemble(text).unwrap());
    assert_eq!(canonical, "PUSH_NUM 5\nSTORE n\nLABEL fim\n");
}

#[test]
fn canonical_text_is_stable() {
    let once = disassemble(&assemble(LIST_WALK).unwrap());
    let twice = disassemble(&assemble(&once).unwrap());
    assert_eq!(once, twice);
}

// ---- Error tests ----

#[test]
fn error_label_without_name_with_line() {
    let text = "PUSH_NUM 1\n\n; nada\nLABEL   \n";
    let err = assemble(text).unwrap_err();
    assert_eq!(err, AsmError::MissingLabelName { line: 4 });
    assert_eq!(err.to_string(), "line 4: LABEL without a name");
}

#[test]
fn first_error_wins() {
    let err = assemble("PUSH_NUM 1\nLABEL\nLABEL\n").unwrap_err();
    assert_eq!(err.line(), 2);
}

#[test]
fn label_with_trailing_comment_loads_and_runs() {
    let text = "\
JUMP fim ; pula
PUSH_STR \"pulado\"
PRINT
LABEL fim ; fim do laco
PUSH_STR \"chegou\"
PRINT
";
    assert_eq!(run_ok(text, &[]), vec![">> chegou"]);
}

#[test]
fn bare_push_str_pushes_empty_text() {
    let output = run_ok("PUSH_STR\nPRINT\nPUSH_STR\nLEN\nPRINT\n", &[]);
    assert_eq!(output, vec![">> ", ">> 0"]);
}

// ---- Comment and whitespace handling ----

#[test]
fn comments_and_blank_lines_take_no_slot() {
    let text = "\
; cabecalho
PUSH_NUM 1

   ; indentado
LABEL depois
PRINT
";
    let program = assemble(text).unwrap();
    assert_eq!(program.len(), 2);
    assert_eq!(program.label("depois"), Some(1));
    assert_eq!(program.instructions[1].opcode, Opcode::Print);
    assert_eq!(program.instructions[1].line, Some(6));
}

#[test]
fn crlf_line_endings() {
    let program = assemble("PUSH_NUM 1\r\nLABEL fim\r\nPRINT\r\n").unwrap();
    assert_eq!(program.len(), 2);
    assert_eq!(program.instructions[0].operands, vec!["1"]);
    assert_eq!(program.label("fim"), Some(1));
}
