//! Structural fragments: property maps, vertex/edge/path patterns and
//! function-call expressions.

use crate::model::{Direction, PropertyMap, Value};
use super::escape::escape_double_quoted;

/// Format a single property value.
///
/// Strings become double-quoted literals; everything else is rendered as
/// JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => escape_double_quoted(s),
        other => other.to_json(),
    }
}

/// Format a property map as `{key1: v1, key2: v2}` in insertion order.
///
/// Keys are emitted as given.
pub fn format_properties(props: &PropertyMap) -> String {
    if props.is_empty() {
        return "{}".to_string();
    }
    let parts: Vec<String> = props
        .iter()
        .map(|(key, value)| format!("{key}: {}", format_value(value)))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

/// `(var[:Label][ {props}])`
///
/// An empty property map is treated the same as no map.
pub fn vertex(var: &str, label: Option<&str>, props: Option<&PropertyMap>) -> String {
    let mut out = String::from("(");
    out.push_str(var);
    if let Some(label) = label {
        out.push(':');
        out.push_str(label);
    }
    if let Some(props) = props.filter(|p| !p.is_empty()) {
        out.push(' ');
        out.push_str(&format_properties(props));
    }
    out.push(')');
    out
}

/// Edge pattern with its arrow, e.g. `-[r:KNOWS{since: 2020}]->`.
pub fn edge(
    var: &str,
    label: Option<&str>,
    props: Option<&PropertyMap>,
    direction: Direction,
) -> String {
    let mut body = String::from("[");
    body.push_str(var);
    if let Some(label) = label {
        body.push(':');
        body.push_str(label);
    }
    if let Some(props) = props.filter(|p| !p.is_empty()) {
        body.push_str(&format_properties(props));
    }
    body.push(']');

    match direction {
        Direction::Left => format!("<-{body}-"),
        Direction::Right => format!("-{body}->"),
        Direction::Both => format!("-{body}-"),
    }
}

/// Concatenate pre-built vertex and edge fragments verbatim.
pub fn path<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments.iter().map(|f| f.as_ref()).collect::<Vec<&str>>().concat()
}

/// `name(arg1, arg2, ...)`. Arguments are expressions and are not escaped.
pub fn function_call<S: AsRef<str>>(name: &str, args: &[S]) -> String {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    format!("{name}({})", args.join(", "))
}
