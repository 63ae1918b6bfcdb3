//! Lazily parsed literal operands (`PUSH_STR`, `PUSH_BOOL`).

/// Decode a `PUSH_STR` operand.
///
/// The literal is the text between the first and the last `"`. Inside it a
/// backslash escapes the next character, whatever it is (`\"` is `"`, `\n`
/// is a plain `n`). Text without a quoted section is returned trimmed but
/// otherwise untouched.
pub fn parse_string_literal(raw: &str) -> String {
    let raw = raw.trim();
    let (Some(first), Some(last)) = (raw.find('"'), raw.rfind('"')) else {
        return raw.to_string();
    };
    if last <= first {
        return raw.to_string();
    }

    let mut out = String::with_capacity(last - first);
    let mut escaped = false;
    for c in raw[first + 1..last].chars() {
        if escaped {
            out.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else {
            out.push(c);
        }
    }
    out
}

/// Decode a `PUSH_BOOL` operand: an integer flag, non-zero meaning true.
pub fn parse_flag_literal(raw: &str) -> Option<bool> {
    raw.trim().parse::<i64>().ok().map(|flag| flag != 0)
}
