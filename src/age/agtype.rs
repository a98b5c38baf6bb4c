//! agtype decoder — turns one column of AGE output text into values.
//!
//! agtype text is JSON plus `::annotation` suffixes:
//!
//! ```text
//! {"id": 844424930131969, "label": "Person", "properties": {"name": "Ada"}}::vertex
//! {"id": 1125899906842625, "label": "KNOWS", "end_id": 2, "start_id": 1, "properties": {}}::edge
//! [{...}::vertex, {...}::edge, {...}::vertex]::path
//! 2.75::numeric
//! ```
//!
//! Floats may also be spelled `NaN`, `Infinity` or `-Infinity`.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::model::{Edge, GraphId, Path, PropertyMap, Value, Vertex};
use crate::{Error, Result};

/// Deepest list/map nesting accepted, matching `serde_json`'s recursion limit.
const MAX_DEPTH: usize = 128;

/// A decoded agtype value.
///
/// Unlike [`Value`], lists and maps here may hold graph entities
/// (e.g. `collect(n)` returns a list of vertices).
#[derive(Debug, Clone, PartialEq)]
pub enum AgValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<AgValue>),
    Map(Vec<(String, AgValue)>),
    Vertex(Vertex),
    Edge(Edge),
    Path(Path),
}

impl AgValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            AgValue::Null => "NULL",
            AgValue::Bool(_) => "BOOLEAN",
            AgValue::Int(_) => "INTEGER",
            AgValue::Float(_) => "FLOAT",
            AgValue::String(_) => "STRING",
            AgValue::List(_) => "LIST",
            AgValue::Map(_) => "MAP",
            AgValue::Vertex(_) => "VERTEX",
            AgValue::Edge(_) => "EDGE",
            AgValue::Path(_) => "PATH",
        }
    }

    /// Plain data view. `None` if a graph entity is nested anywhere inside.
    pub fn to_value(&self) -> Option<Value> {
        Some(match self {
            AgValue::Null => Value::Null,
            AgValue::Bool(b) => Value::Bool(*b),
            AgValue::Int(i) => Value::Int(*i),
            AgValue::Float(f) => Value::Float(*f),
            AgValue::String(s) => Value::String(s.clone()),
            AgValue::List(items) => {
                Value::List(items.iter().map(AgValue::to_value).collect::<Option<Vec<_>>>()?)
            }
            AgValue::Map(entries) => {
                let mut map = PropertyMap::new();
                for (k, v) in entries {
                    map.insert(k.clone(), v.to_value()?);
                }
                Value::Map(map)
            }
            AgValue::Vertex(_) | AgValue::Edge(_) | AgValue::Path(_) => return None,
        })
    }

    fn get(&self, key: &str) -> Option<&AgValue> {
        match self {
            AgValue::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

/// Decode a complete agtype text. Trailing non-whitespace is an error.
pub fn parse(input: &str) -> Result<AgValue> {
    let mut parser = Parser { input, chars: input.char_indices().peekable(), depth: 0 };
    let value = parser.value()?;
    parser.skip_ws();
    if let Some(&(pos, c)) = parser.chars.peek() {
        return Err(syntax(pos, format!("Unexpected trailing character: '{c}'")));
    }
    Ok(value)
}

fn syntax(position: usize, message: impl Into<String>) -> Error {
    Error::AgtypeSyntax { position, message: message.into() }
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn pos(&mut self) -> usize {
        self.chars.peek().map_or(self.input.len(), |&(p, _)| p)
    }

    fn skip_ws(&mut self) {
        while self.chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn expect(&mut self, want: char) -> Result<()> {
        match self.chars.next() {
            Some((_, c)) if c == want => Ok(()),
            Some((pos, c)) => Err(syntax(pos, format!("Expected '{want}', found '{c}'"))),
            None => Err(syntax(self.input.len(), format!("Expected '{want}', found end of input"))),
        }
    }

    fn keyword(&mut self, word: &str) -> Result<()> {
        let start = self.pos();
        for want in word.chars() {
            match self.chars.next() {
                Some((_, c)) if c == want => {}
                _ => return Err(syntax(start, format!("Invalid literal, expected '{word}'"))),
            }
        }
        Ok(())
    }

    /// A value with an optional `::annotation`.
    fn value(&mut self) -> Result<AgValue> {
        self.skip_ws();
        let start = self.pos();
        let raw = match self.chars.peek().map(|&(_, c)| c) {
            Some('{') | Some('[') => self.nested(start)?,
            Some('"') => AgValue::String(self.string()?),
            Some('t') => { self.keyword("true")?; AgValue::Bool(true) }
            Some('f') => { self.keyword("false")?; AgValue::Bool(false) }
            Some('n') => { self.keyword("null")?; AgValue::Null }
            Some('N') => { self.keyword("NaN")?; AgValue::Float(f64::NAN) }
            Some('I') => { self.keyword("Infinity")?; AgValue::Float(f64::INFINITY) }
            Some(c) if c == '-' || c.is_ascii_digit() => self.number()?,
            Some(c) => return Err(syntax(start, format!("Unexpected character: '{c}'"))),
            None => return Err(syntax(start, "Unexpected end of input")),
        };

        self.skip_ws();
        if self.chars.peek().map(|&(_, c)| c) != Some(':') {
            return Ok(raw);
        }
        let colon = self.pos();
        self.expect(':')?;
        self.expect(':')?;
        let annotation = self.ident();
        annotate(raw, &annotation, colon)
    }

    fn ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        ident
    }

    fn nested(&mut self, start: usize) -> Result<AgValue> {
        if self.depth >= MAX_DEPTH {
            return Err(syntax(start, "nesting too deep"));
        }
        self.depth += 1;
        let value = if self.chars.peek().map(|&(_, c)| c) == Some('{') {
            self.object()
        } else {
            self.array()
        };
        self.depth -= 1;
        value
    }

    fn object(&mut self) -> Result<AgValue> {
        self.expect('{')?;
        let mut entries = Vec::new();
        self.skip_ws();
        if self.chars.peek().map(|&(_, c)| c) == Some('}') {
            self.chars.next();
            return Ok(AgValue::Map(entries));
        }
        loop {
            self.skip_ws();
            let key = self.string()?;
            self.skip_ws();
            self.expect(':')?;
            let value = self.value()?;
            entries.push((key, value));
            self.skip_ws();
            match self.chars.next() {
                Some((_, ',')) => continue,
                Some((_, '}')) => break,
                Some((pos, c)) => return Err(syntax(pos, format!("Expected ',' or '}}', found '{c}'"))),
                None => return Err(syntax(self.input.len(), "Unterminated object")),
            }
        }
        Ok(AgValue::Map(entries))
    }

    fn array(&mut self) -> Result<AgValue> {
        self.expect('[')?;
        let mut items = Vec::new();
        self.skip_ws();
        if self.chars.peek().map(|&(_, c)| c) == Some(']') {
            self.chars.next();
            return Ok(AgValue::List(items));
        }
        loop {
            items.push(self.value()?);
            self.skip_ws();
            match self.chars.next() {
                Some((_, ',')) => continue,
                Some((_, ']')) => break,
                Some((pos, c)) => return Err(syntax(pos, format!("Expected ',' or ']', found '{c}'"))),
                None => return Err(syntax(self.input.len(), "Unterminated array")),
            }
        }
        Ok(AgValue::List(items))
    }

    fn string(&mut self) -> Result<String> {
        let start = self.pos();
        self.expect('"')?;
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some((_, '"')) => return Ok(s),
                Some((pos, '\\')) => match self.chars.next() {
                    Some((_, '"')) => s.push('"'),
                    Some((_, '\\')) => s.push('\\'),
                    Some((_, '/')) => s.push('/'),
                    Some((_, 'b')) => s.push('\u{0008}'),
                    Some((_, 'f')) => s.push('\u{000C}'),
                    Some((_, 'n')) => s.push('\n'),
                    Some((_, 'r')) => s.push('\r'),
                    Some((_, 't')) => s.push('\t'),
                    Some((_, 'u')) => s.push(self.unicode_escape(pos)?),
                    Some((_, c)) => return Err(syntax(pos, format!("Invalid escape: '\\{c}'"))),
                    None => return Err(syntax(start, "Unterminated string literal")),
                },
                Some((_, c)) => s.push(c),
                None => return Err(syntax(start, "Unterminated string literal")),
            }
        }
    }

    fn hex4(&mut self, pos: usize) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .chars
                .next()
                .and_then(|(_, c)| c.to_digit(16))
                .ok_or_else(|| syntax(pos, "Invalid \\u escape"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn unicode_escape(&mut self, pos: usize) -> Result<char> {
        let hi = self.hex4(pos)?;
        let code = if (0xD800..0xDC00).contains(&hi) {
            self.expect('\\')?;
            self.expect('u')?;
            let lo = self.hex4(pos)?;
            if !(0xDC00..0xE000).contains(&lo) {
                return Err(syntax(pos, "Invalid low surrogate"));
            }
            0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00)
        } else {
            hi
        };
        char::from_u32(code).ok_or_else(|| syntax(pos, "Invalid unicode scalar"))
    }

    fn number(&mut self) -> Result<AgValue> {
        let start = self.pos();
        let mut text = String::new();
        if self.chars.peek().map(|&(_, c)| c) == Some('-') {
            text.push('-');
            self.chars.next();
            if self.chars.peek().map(|&(_, c)| c) == Some('I') {
                self.keyword("Infinity")?;
                return Ok(AgValue::Float(f64::NEG_INFINITY));
            }
        }
        let mut is_float = false;
        while let Some(&(_, c)) = self.chars.peek() {
            match c {
                '0'..='9' => {}
                '.' | 'e' | 'E' => is_float = true,
                '+' | '-' if matches!(text.chars().last(), Some('e' | 'E')) => {}
                _ => break,
            }
            text.push(c);
            self.chars.next();
        }
        if !is_float {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(AgValue::Int(i));
            }
        }
        text.parse::<f64>()
            .map(AgValue::Float)
            .map_err(|_| syntax(start, format!("Invalid number: '{text}'")))
    }
}

// ============================================================================
// Annotations
// ============================================================================

fn annotate(raw: AgValue, annotation: &str, pos: usize) -> Result<AgValue> {
    match annotation {
        "vertex" => vertex_from(&raw, pos).map(AgValue::Vertex),
        "edge" => edge_from(&raw, pos).map(AgValue::Edge),
        "path" => path_from(raw, pos).map(AgValue::Path),
        "numeric" => match raw {
            AgValue::Int(_) | AgValue::Float(_) => Ok(raw),
            other => Err(syntax(pos, format!("::numeric on {}", other.type_name()))),
        },
        "float" => match raw {
            AgValue::Int(i) => Ok(AgValue::Float(i as f64)),
            AgValue::Float(_) => Ok(raw),
            other => Err(syntax(pos, format!("::float on {}", other.type_name()))),
        },
        "integer" => match raw {
            AgValue::Int(_) => Ok(raw),
            other => Err(syntax(pos, format!("::integer on {}", other.type_name()))),
        },
        other => Err(syntax(pos, format!("Unknown annotation: '::{other}'"))),
    }
}

fn graph_id(raw: &AgValue, key: &str, pos: usize) -> Result<GraphId> {
    match raw.get(key) {
        Some(AgValue::Int(i)) if *i >= 0 => Ok(GraphId(*i as u64)),
        Some(other) => Err(syntax(pos, format!("'{key}' must be a graph id, got {}", other.type_name()))),
        None => Err(syntax(pos, format!("Missing '{key}'"))),
    }
}

fn label(raw: &AgValue, pos: usize) -> Result<String> {
    match raw.get("label") {
        Some(AgValue::String(s)) => Ok(s.clone()),
        Some(other) => Err(syntax(pos, format!("'label' must be a string, got {}", other.type_name()))),
        None => Err(syntax(pos, "Missing 'label'")),
    }
}

fn properties(raw: &AgValue, pos: usize) -> Result<PropertyMap> {
    match raw.get("properties") {
        None | Some(AgValue::Null) => Ok(PropertyMap::new()),
        Some(props @ AgValue::Map(_)) => match props.to_value() {
            Some(Value::Map(map)) => Ok(map),
            _ => Err(syntax(pos, "'properties' may only hold plain values")),
        },
        Some(other) => Err(syntax(pos, format!("'properties' must be a map, got {}", other.type_name()))),
    }
}

fn vertex_from(raw: &AgValue, pos: usize) -> Result<Vertex> {
    if !matches!(raw, AgValue::Map(_)) {
        return Err(syntax(pos, format!("::vertex on {}", raw.type_name())));
    }
    Ok(Vertex::new(label(raw, pos)?)
        .with_id(graph_id(raw, "id", pos)?)
        .with_properties(properties(raw, pos)?))
}

fn edge_from(raw: &AgValue, pos: usize) -> Result<Edge> {
    if !matches!(raw, AgValue::Map(_)) {
        return Err(syntax(pos, format!("::edge on {}", raw.type_name())));
    }
    Ok(Edge::new(label(raw, pos)?, graph_id(raw, "start_id", pos)?, graph_id(raw, "end_id", pos)?)
        .with_id(graph_id(raw, "id", pos)?)
        .with_properties(properties(raw, pos)?))
}

/// Vertices at even positions, edges at odd positions.
fn path_from(raw: AgValue, pos: usize) -> Result<Path> {
    let items = match raw {
        AgValue::List(items) => items,
        other => return Err(syntax(pos, format!("::path on {}", other.type_name()))),
    };
    let mut path = Path::default();
    for (i, item) in items.into_iter().enumerate() {
        match (i % 2, item) {
            (0, AgValue::Vertex(v)) => path.vertices.push(v),
            (1, AgValue::Edge(e)) => path.edges.push(e),
            (_, other) => {
                return Err(syntax(pos, format!("Unexpected {} at path position {i}", other.type_name())));
            }
        }
    }
    if path.vertices.len() != path.edges.len() + 1 {
        return Err(syntax(pos, "A path must start and end with a vertex"));
    }
    Ok(path)
}
