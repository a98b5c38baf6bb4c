//! # Database Client Seam
//!
//! This is the contract between age-rs and whatever actually talks to
//! PostgreSQL. The crate only ever hands it finished SQL text; pooling,
//! authentication and wire protocol live on the other side.
//!
//! ## Implementations
//!
//! | Client | Module | Description |
//! |--------|--------|-------------|
//! | `RecordingClient` | `recording` | In-memory, logs statements and replays scripted rows |

pub mod recording;

use async_trait::async_trait;
use crate::Result;

pub use recording::RecordingClient;

/// One result row: the raw text of each selected column, in order.
pub type RawRow = Vec<String>;

/// The universal client contract.
///
/// Implementations should map driver failures to `Error::Client`.
#[async_trait]
pub trait AgeClient: Send + Sync + 'static {
    /// Run a statement whose rows (if any) are discarded.
    async fn execute(&self, sql: &str) -> Result<()>;

    /// Run a query and return every row as column text.
    async fn query(&self, sql: &str) -> Result<Vec<RawRow>>;
}

#[async_trait]
impl<C: AgeClient> AgeClient for std::sync::Arc<C> {
    async fn execute(&self, sql: &str) -> Result<()> {
        (**self).execute(sql).await
    }

    async fn query(&self, sql: &str) -> Result<Vec<RawRow>> {
        (**self).query(sql).await
    }
}
