//! # age-rs — Cypher for PostgreSQL-hosted Graphs
//!
//! Builds Cypher text from a chainable API and wraps it in the SQL call
//! Apache AGE executes inside PostgreSQL.
//!
//! ## Design Principles
//!
//! 1. **Text in, text out**: the builder, escaping primitives and host
//!    wrapper are pure string transforms — no I/O, no locks, never fail
//! 2. **Clean DTOs**: `Vertex`, `Edge`, `Path`, `Value` are plain records
//! 3. **Trait-first I/O**: `AgeClient` is the only contract with the database
//! 4. **Names are guarded, not escaped**: graph and label names must pass
//!    `validate_name` before they are embedded
//!
//! ## Quick Start
//!
//! ```rust
//! use age_rs::cypher::{query_builder, vertex};
//! use age_rs::age::build_host_query;
//!
//! let cypher = query_builder()
//!     .match_(vertex("n", Some("Person"), None))
//!     .where_("n.age > 25")
//!     .return_("n")
//!     .build();
//! assert_eq!(cypher, "MATCH (n:Person) WHERE n.age > 25 RETURN n");
//!
//! let sql = build_host_query("social", &cypher);
//! assert!(sql.starts_with("SELECT * FROM ag_catalog.cypher('social', $$"));
//! ```
//!
//! ## Executing
//!
//! ```rust,no_run
//! use age_rs::{Graph, PropertyMap, RecordingClient};
//!
//! # async fn example() -> age_rs::Result<()> {
//! let graph = Graph::new(RecordingClient::new(), "social")?;
//! graph.setup().await?;
//! let ada = graph
//!     .create_vertex("Person", &PropertyMap::new().with("name", "Ada"))
//!     .await?;
//! println!("{:?}", ada.id);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod cypher;
pub mod age;
pub mod client;
pub mod execution;
pub mod tx;
pub mod config;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Vertex, Edge, Path, Value, PropertyMap,
    GraphId, Direction,
};

// ============================================================================
// Re-exports: Builder, wrapper, client
// ============================================================================

pub use cypher::{QueryBuilder, query_builder};
pub use age::{build_host_query, agtype::AgValue};
pub use client::{AgeClient, RecordingClient};
pub use execution::{QueryResult, ResultRow, FromAgtype};
pub use tx::{TxMode, TxState};
pub use config::AgeConfig;

use cypher::{edge, function_call, path, validate_name, vertex};

// ============================================================================
// Top-level Graph handle
// ============================================================================

/// The primary entry point. A `Graph` pairs a client with one named graph.
pub struct Graph<C: AgeClient> {
    client: C,
    config: AgeConfig,
}

/// Wrap, send and decode one Cypher query. Column names are guarded like
/// graph names, since they land in the SQL column list.
async fn run_cypher<C: AgeClient, S: AsRef<str>>(
    client: &C,
    graph_name: &str,
    cypher: &str,
    columns: &[S],
) -> Result<QueryResult> {
    for column in columns {
        validate_name(column.as_ref())?;
    }
    let sql = age::build_host_query_with_columns(graph_name, cypher, columns);
    let names: Vec<String> = if columns.is_empty() {
        vec![age::RESULT_COLUMN.to_string()]
    } else {
        columns.iter().map(|c| c.as_ref().to_string()).collect()
    };
    tracing::debug!(graph = graph_name, %cypher, "executing cypher");
    let raw = client.query(&sql).await?;
    QueryResult::decode(names, raw)
}

impl<C: AgeClient> Graph<C> {
    /// Create a Graph for `graph_name`, using default session settings.
    pub fn new(client: C, graph_name: impl Into<String>) -> Result<Self> {
        Self::from_config(client, AgeConfig::new(graph_name))
    }

    pub fn from_config(client: C, config: AgeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { client, config })
    }

    pub fn name(&self) -> &str {
        &self.config.graph_name
    }

    pub fn config(&self) -> &AgeConfig {
        &self.config
    }

    /// Access the underlying client (for advanced use).
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run the session setup statements the config asks for.
    pub async fn setup(&self) -> Result<()> {
        for stmt in age::setup_statements(self.config.load_extension, self.config.set_search_path) {
            tracing::debug!(sql = stmt, "session setup");
            self.client.execute(stmt).await?;
        }
        if self.config.create_graph {
            self.create_graph().await?;
        }
        Ok(())
    }

    pub async fn create_graph(&self) -> Result<()> {
        let sql = age::create_graph_sql(self.name());
        tracing::debug!(graph = self.name(), "creating graph");
        self.client.execute(&sql).await
    }

    pub async fn drop_graph(&self, cascade: bool) -> Result<()> {
        let sql = age::drop_graph_sql(self.name(), cascade);
        tracing::debug!(graph = self.name(), cascade, "dropping graph");
        self.client.execute(&sql).await
    }

    /// Execute Cypher returning a single `result` column.
    pub async fn query(&self, cypher: &str) -> Result<QueryResult> {
        run_cypher::<C, &str>(&self.client, self.name(), cypher, &[]).await
    }

    /// Execute Cypher returning the named columns.
    pub async fn query_columns<S: AsRef<str>>(&self, cypher: &str, columns: &[S]) -> Result<QueryResult> {
        run_cypher(&self.client, self.name(), cypher, columns).await
    }

    /// Build and execute.
    pub async fn run(&self, query: &QueryBuilder) -> Result<QueryResult> {
        self.query(&query.build()).await
    }

    // ========================================================================
    // Vertex / edge helpers
    // ========================================================================

    /// `CREATE (v:Label {props}) RETURN v`
    pub async fn create_vertex(&self, label: &str, props: &PropertyMap) -> Result<Vertex> {
        let q = vertex_create_query(label, props)?;
        self.run(&q).await?.single(age::RESULT_COLUMN)
    }

    /// Connect two existing vertices by id.
    pub async fn create_edge(
        &self,
        label: &str,
        start: GraphId,
        end: GraphId,
        props: &PropertyMap,
    ) -> Result<Edge> {
        let q = edge_create_query(label, start, end, props)?;
        self.run(&q).await?.single(age::RESULT_COLUMN)
    }

    /// `MATCH (v:Label {props}) RETURN v`
    pub async fn find_vertices(&self, label: &str, props: Option<&PropertyMap>) -> Result<Vec<Vertex>> {
        validate_name(label)?;
        let q = query_builder()
            .match_(vertex("v", Some(label), props))
            .return_("v");
        self.run(&q).await?.column(age::RESULT_COLUMN)
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Begin an explicit transaction.
    pub async fn begin(&self, mode: TxMode) -> Result<ExplicitTx<'_, C>> {
        self.client.execute(mode.begin_statement()).await?;
        Ok(ExplicitTx { graph: self, mode, state: TxState::Active })
    }
}

fn vertex_create_query(label: &str, props: &PropertyMap) -> Result<QueryBuilder> {
    validate_name(label)?;
    Ok(query_builder()
        .create(vertex("v", Some(label), Some(props)))
        .return_("v"))
}

fn edge_create_query(label: &str, start: GraphId, end: GraphId, props: &PropertyMap) -> Result<QueryBuilder> {
    validate_name(label)?;
    let pattern = path(&[
        vertex("a", None, None),
        edge("e", Some(label), Some(props), Direction::Right),
        vertex("b", None, None),
    ]);
    Ok(query_builder()
        .match_("(a)")
        .match_("(b)")
        .where_(format!("{} = {start}", function_call("id", &["a"])))
        .where_(format!("{} = {end}", function_call("id", &["b"])))
        .create(pattern)
        .return_("e"))
}

/// Explicit transaction handle.
///
/// Finish with [`commit`](Self::commit) or [`rollback`](Self::rollback).
/// Dropping an active handle cannot roll back (no async in `Drop`); it
/// logs a warning and leaves the session to the client.
pub struct ExplicitTx<'g, C: AgeClient> {
    graph: &'g Graph<C>,
    mode: TxMode,
    state: TxState,
}

impl<'g, C: AgeClient> ExplicitTx<'g, C> {
    pub fn mode(&self) -> TxMode {
        self.mode
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    fn ensure_active(&self) -> Result<()> {
        match self.state {
            TxState::Active => Ok(()),
            other => Err(Error::TxError(format!("transaction is {other:?}"))),
        }
    }

    pub async fn query(&mut self, cypher: &str) -> Result<QueryResult> {
        self.ensure_active()?;
        run_cypher::<C, &str>(&self.graph.client, self.graph.name(), cypher, &[]).await
    }

    pub async fn run(&mut self, query: &QueryBuilder) -> Result<QueryResult> {
        self.query(&query.build()).await
    }

    pub async fn create_vertex(&mut self, label: &str, props: &PropertyMap) -> Result<Vertex> {
        let q = vertex_create_query(label, props)?;
        self.run(&q).await?.single(age::RESULT_COLUMN)
    }

    pub async fn create_edge(
        &mut self,
        label: &str,
        start: GraphId,
        end: GraphId,
        props: &PropertyMap,
    ) -> Result<Edge> {
        let q = edge_create_query(label, start, end, props)?;
        self.run(&q).await?.single(age::RESULT_COLUMN)
    }

    pub async fn commit(mut self) -> Result<()> {
        self.ensure_active()?;
        self.state = TxState::Committed;
        self.graph.client.execute(tx::COMMIT).await
    }

    pub async fn rollback(mut self) -> Result<()> {
        self.ensure_active()?;
        self.state = TxState::RolledBack;
        self.graph.client.execute(tx::ROLLBACK).await
    }
}

impl<'g, C: AgeClient> Drop for ExplicitTx<'g, C> {
    fn drop(&mut self) {
        if self.state == TxState::Active {
            tracing::warn!(graph = self.graph.name(), mode = ?self.mode, "transaction dropped while active");
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid graph or label name: {0:?}")]
    InvalidName(String),

    #[error("agtype syntax error at position {position}: {message}")]
    AgtypeSyntax { position: usize, message: String },

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Client error: {0}")]
    Client(String),

    #[error("Transaction error: {0}")]
    TxError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
