//! # AGE Host Queries
//!
//! Wraps finished Cypher text in the SQL call Apache AGE executes, and
//! produces the handful of graph-management statements around it.
//!
//! ```text
//! QueryBuilder::build() → build_host_query() → AgeClient::query() → agtype::parse()
//! ```
//!
//! Graph names are embedded as-is. Callers validate them first
//! (see [`crate::cypher::validate_name`]); nothing here checks.

pub mod agtype;

/// Result type annotation for every returned column.
pub const AGTYPE: &str = "ag_catalog.agtype";

/// Default column name for single-column queries.
pub const RESULT_COLUMN: &str = "result";

/// Double every single quote.
pub fn escape_cypher(cypher: &str) -> String {
    cypher.replace('\'', "''")
}

/// `SELECT * FROM ag_catalog.cypher('<graph>', $$ <cypher> $$) as (result ag_catalog.agtype);`
///
/// ```
/// use age_rs::age::build_host_query;
///
/// let sql = build_host_query("my_graph", "MATCH (n) RETURN n");
/// assert_eq!(
///     sql,
///     "SELECT * FROM ag_catalog.cypher('my_graph', $$ MATCH (n) RETURN n $$) as (result ag_catalog.agtype);"
/// );
/// ```
pub fn build_host_query(graph_name: &str, cypher: &str) -> String {
    build_host_query_with_columns(graph_name, cypher, &[RESULT_COLUMN])
}

/// Like [`build_host_query`] but declares one agtype column per name.
///
/// An empty column list falls back to the single `result` column.
pub fn build_host_query_with_columns<S: AsRef<str>>(
    graph_name: &str,
    cypher: &str,
    columns: &[S],
) -> String {
    let columns: Vec<String> = if columns.is_empty() {
        vec![format!("{RESULT_COLUMN} {AGTYPE}")]
    } else {
        columns.iter().map(|c| format!("{} {AGTYPE}", c.as_ref())).collect()
    };
    tracing::debug!(graph = graph_name, cypher_len = cypher.len(), "wrapping cypher");
    format!(
        "SELECT * FROM ag_catalog.cypher('{graph_name}', $$ {} $$) as ({});",
        escape_cypher(cypher),
        columns.join(", "),
    )
}

/// `SELECT * FROM ag_catalog.create_graph('<name>');`
pub fn create_graph_sql(graph_name: &str) -> String {
    format!("SELECT * FROM ag_catalog.create_graph('{graph_name}');")
}

/// `SELECT * FROM ag_catalog.drop_graph('<name>', <cascade>);`
pub fn drop_graph_sql(graph_name: &str, cascade: bool) -> String {
    format!("SELECT * FROM ag_catalog.drop_graph('{graph_name}', {cascade});")
}

/// Loads the extension into the session.
pub const LOAD_AGE: &str = "LOAD 'age';";

/// Puts `ag_catalog` first on the search path.
pub const SET_SEARCH_PATH: &str = r#"SET search_path = ag_catalog, "$user", public;"#;

/// Per-session setup statements, in execution order.
pub fn setup_statements(load_extension: bool, set_search_path: bool) -> Vec<&'static str> {
    let mut stmts = Vec::new();
    if load_extension {
        stmts.push(LOAD_AGE);
    }
    if set_search_path {
        stmts.push(SET_SEARCH_PATH);
    }
    stmts
}
