//! Line splitter for Socratic assembly text.

/// One significant source line, split at its first whitespace run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SourceLine<'a> {
    /// The first token: a mnemonic or the `LABEL` directive.
    pub head: &'a str,
    /// Everything after the first token, trimmed. Empty when there is none.
    pub rest: &'a str,
}

impl<'a> SourceLine<'a> {
    /// The rest of the line as whitespace-separated tokens.
    pub fn tokens(&self) -> impl Iterator<Item = &'a str> {
        self.rest.split_whitespace()
    }
}

/// Split a single line of assembly text.
///
/// Returns `None` for blank lines and for lines whose first non-blank
/// character is `;`. A `;` later in the line is not a comment.
pub(crate) fn split_line(line: &str) -> Option<SourceLine<'_>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(';') {
        return None;
    }

    let (head, rest) = match line.find(char::is_whitespace) {
        Some(pos) => (&line[..pos], line[pos..].trim()),
        None => (line, ""),
    };
    Some(SourceLine { head, rest })
}
