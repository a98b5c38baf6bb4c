//! Literal and identifier escaping, plus the name guard.
//!
//! Everything here is a total string transform except [`validate_name`],
//! which is the one place the crate rejects input.

use crate::{Error, Result};

/// Wrap `s` in `delimiter`, escaping backslashes first and then the delimiter.
///
/// Backslashes must go first: escaping the delimiter first would introduce
/// new backslashes that the second pass would then double.
pub fn escape_literal(s: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delimiter);
    for c in s.chars() {
        if c == '\\' || c == delimiter {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(delimiter);
    out
}

/// Single-quoted Cypher string literal.
///
/// ```
/// # use age_rs::cypher::escape_string;
/// assert_eq!(escape_string("it's"), r"'it\'s'");
/// ```
pub fn escape_string(s: &str) -> String {
    escape_literal(s, '\'')
}

/// Double-quoted literal, as used for string values inside property maps.
pub fn escape_double_quoted(s: &str) -> String {
    escape_literal(s, '"')
}

/// Backtick-quoted identifier with embedded backticks doubled.
///
/// Labels and graph names are never passed through this; they are checked
/// with [`validate_name`] instead.
pub fn escape_name(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('`');
    for c in s.chars() {
        if c == '`' {
            out.push('`');
        }
        out.push(c);
    }
    out.push('`');
    out
}

/// True iff `name` matches `^[A-Za-z_][A-Za-z0-9_]*$`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Guard for graph and label names before they are embedded unescaped.
pub fn validate_name(name: &str) -> Result<&str> {
    if is_valid_name(name) {
        Ok(name)
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}
