//! Transaction management.

use serde::{Deserialize, Serialize};

/// Transaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxMode {
    ReadOnly,
    ReadWrite,
}

/// Lifecycle of an explicit transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxState {
    Active,
    Committed,
    RolledBack,
}

impl TxMode {
    /// Statement that opens a transaction in this mode.
    pub fn begin_statement(self) -> &'static str {
        match self {
            TxMode::ReadOnly => "BEGIN TRANSACTION READ ONLY;",
            TxMode::ReadWrite => "BEGIN;",
        }
    }
}

pub const COMMIT: &str = "COMMIT;";
pub const ROLLBACK: &str = "ROLLBACK;";
