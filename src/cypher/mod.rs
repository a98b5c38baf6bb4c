//! # Cypher Text
//!
//! Escaping primitives, pattern fragments and the clause builder.
//! Pure functions — no I/O, no state, no host dependency.

pub mod escape;
pub mod pattern;
pub mod builder;

pub use escape::{
    escape_literal, escape_string, escape_double_quoted, escape_name,
    is_valid_name, validate_name,
};
pub use pattern::{format_value, format_properties, vertex, edge, path, function_call};
pub use builder::{QueryBuilder, Fragment, ClauseKind, Subquery};

/// Start a new, empty query.
pub fn query_builder() -> QueryBuilder {
    QueryBuilder::new()
}
