//! Query results.
//!
//! Decodes the raw rows an `AgeClient` returns into agtype values, keyed
//! by the column names declared in the host query.

use std::collections::HashMap;
use crate::age::agtype::{self, AgValue};
use crate::client::RawRow;
use crate::model::*;
use crate::{Error, Result};

/// Query execution result.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<ResultRow>,
}

/// A single row in the result set.
#[derive(Debug, Clone, Default)]
pub struct ResultRow {
    pub values: HashMap<String, AgValue>,
}

impl ResultRow {
    /// Get a typed value from the row.
    pub fn get<T: FromAgtype>(&self, key: &str) -> Result<T> {
        let val = self.values.get(key)
            .ok_or_else(|| Error::NotFound(format!("Column '{key}'")))?;
        T::from_agtype(val)
    }
}

impl QueryResult {
    /// Decode raw rows. Each row must have exactly one text per column.
    pub fn decode(columns: Vec<String>, raw: Vec<RawRow>) -> Result<Self> {
        let mut rows = Vec::with_capacity(raw.len());
        for raw_row in raw {
            if raw_row.len() != columns.len() {
                return Err(Error::Client(format!(
                    "expected {} columns, got {}",
                    columns.len(),
                    raw_row.len()
                )));
            }
            let mut values = HashMap::with_capacity(columns.len());
            for (column, text) in columns.iter().zip(raw_row) {
                values.insert(column.clone(), agtype::parse(&text)?);
            }
            rows.push(ResultRow { values });
        }
        Ok(Self { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Typed values of one column, in row order.
    pub fn column<T: FromAgtype>(&self, key: &str) -> Result<Vec<T>> {
        self.rows.iter().map(|row| row.get(key)).collect()
    }

    /// Typed value of one column in the first row.
    pub fn single<T: FromAgtype>(&self, key: &str) -> Result<T> {
        self.rows
            .first()
            .ok_or_else(|| Error::NotFound("empty result".into()))?
            .get(key)
    }
}

/// Convert from an agtype value to concrete types.
pub trait FromAgtype: Sized {
    fn from_agtype(val: &AgValue) -> Result<Self>;
}

fn type_error(expected: &str, val: &AgValue) -> Error {
    Error::TypeError {
        expected: expected.into(),
        got: val.type_name().into(),
    }
}

impl FromAgtype for AgValue {
    fn from_agtype(val: &AgValue) -> Result<Self> {
        Ok(val.clone())
    }
}

impl FromAgtype for Vertex {
    fn from_agtype(val: &AgValue) -> Result<Self> {
        match val {
            AgValue::Vertex(v) => Ok(v.clone()),
            _ => Err(type_error("Vertex", val)),
        }
    }
}

impl FromAgtype for Edge {
    fn from_agtype(val: &AgValue) -> Result<Self> {
        match val {
            AgValue::Edge(e) => Ok(e.clone()),
            _ => Err(type_error("Edge", val)),
        }
    }
}

impl FromAgtype for Path {
    fn from_agtype(val: &AgValue) -> Result<Self> {
        match val {
            AgValue::Path(p) => Ok(p.clone()),
            _ => Err(type_error("Path", val)),
        }
    }
}

impl FromAgtype for Value {
    fn from_agtype(val: &AgValue) -> Result<Self> {
        val.to_value().ok_or_else(|| type_error("Value", val))
    }
}

impl FromAgtype for String {
    fn from_agtype(val: &AgValue) -> Result<Self> {
        match val {
            AgValue::String(s) => Ok(s.clone()),
            _ => Err(type_error("String", val)),
        }
    }
}

impl FromAgtype for i64 {
    fn from_agtype(val: &AgValue) -> Result<Self> {
        match val {
            AgValue::Int(i) => Ok(*i),
            _ => Err(type_error("Integer", val)),
        }
    }
}

impl FromAgtype for f64 {
    fn from_agtype(val: &AgValue) -> Result<Self> {
        match val {
            AgValue::Float(f) => Ok(*f),
            AgValue::Int(i) => Ok(*i as f64),
            _ => Err(type_error("Float", val)),
        }
    }
}

impl FromAgtype for bool {
    fn from_agtype(val: &AgValue) -> Result<Self> {
        match val {
            AgValue::Bool(b) => Ok(*b),
            _ => Err(type_error("Boolean", val)),
        }
    }
}

impl<T: FromAgtype> FromAgtype for Option<T> {
    fn from_agtype(val: &AgValue) -> Result<Self> {
        match val {
            AgValue::Null => Ok(None),
            other => T::from_agtype(other).map(Some),
        }
    }
}

impl<T: FromAgtype> FromAgtype for Vec<T> {
    fn from_agtype(val: &AgValue) -> Result<Self> {
        match val {
            AgValue::List(items) => items.iter().map(T::from_agtype).collect(),
            _ => Err(type_error("List", val)),
        }
    }
}
