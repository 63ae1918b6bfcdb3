//! Disassembler: loaded program → canonical assembly text.
//!
//! Output format is flat text, one line per instruction. Each label is
//! written as a `LABEL` line directly before the instruction it names;
//! labels at the same index are sorted by name, and labels past the last
//! instruction come at the end. No indentation, no comments.

use std::collections::BTreeMap;

use socratic_common::Program;

use crate::parser::LABEL_DIRECTIVE;

/// Disassemble a program into canonical assembly text.
///
/// Reassembling the output yields the same instructions and labels.
pub fn disassemble(program: &Program) -> String {
    let mut by_index: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
    for (name, &index) in &program.labels {
        by_index.entry(index).or_default().push(name);
    }
    for names in by_index.values_mut() {
        names.sort_unstable();
    }

    let mut out = String::new();
    for (index, instr) in program.instructions.iter().enumerate() {
        if let Some(names) = by_index.remove(&index) {
            write_labels(&mut out, &names);
        }
        out.push_str(&instr.to_string());
        out.push('\n');
    }
    // Labels at or past the end, in index order.
    for names in by_index.values() {
        write_labels(&mut out, names);
    }
    out
}

fn write_labels(out: &mut String, names: &[&str]) {
    for name in names {
        out.push_str(LABEL_DIRECTIVE);
        out.push(' ');
        out.push_str(name);
        out.push('\n');
    }
}
