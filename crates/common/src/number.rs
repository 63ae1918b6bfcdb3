//! Number rendering and numeric literal parsing.
//!
//! Numbers print like C's `%.15g`: at most 15 significant digits, no
//! trailing zeros, scientific notation outside `1e-4 ..= 1e15`.

/// Significant digits kept when rendering a number.
pub const SIGNIFICANT_DIGITS: usize = 15;

/// Render a number with `%.15g` semantics.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Round to the target precision first; the exponent of the rounded
    // value decides between fixed and scientific notation.
    let sci = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, n);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return n.to_string();
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return n.to_string();
    };

    if exp < -4 || exp >= SIGNIFICANT_DIGITS as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exp) as usize;
        trim_fraction(&format!("{n:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Parse the operand of `PUSH_NUM`.
pub fn parse_number_literal(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Whether console input has the shape of a number.
///
/// Accepts an optional sign, digits with at most one decimal point, and an
/// optional exponent. The non-finite words are accepted only in their
/// rendered spelling (`inf`, `-inf`, `nan`); `Infinity` or `NaN` stay text.
pub fn looks_numeric(text: &str) -> bool {
    if let Ok(n) = text.parse::<f64>() {
        if !n.is_finite() {
            return format_number(n) == text;
        }
    }

    let bytes = text.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let mut digits = 0;
    let mut seen_point = false;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_point => seen_point = true,
            _ => break,
        }
        i += 1;
    }
    if digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == start {
            return false;
        }
    }

    i == bytes.len()
}
