//! In-memory reference client.
//!
//! Nothing is executed. Every statement is appended to a log, queries pop
//! the next scripted response (or return no rows), and a statement
//! containing a configured substring fails with `Error::Client`.
//!
//! Use this client for:
//! - Asserting on the exact SQL a `Graph` emits
//! - Feeding canned agtype rows through the result decoder

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{AgeClient, RawRow};
use crate::{Error, Result};

/// Cloning shares the same log and script.
#[derive(Clone, Default)]
pub struct RecordingClient {
    inner: Arc<RecordingInner>,
}

#[derive(Default)]
struct RecordingInner {
    log: Mutex<Vec<String>>,
    responses: Mutex<VecDeque<Vec<RawRow>>>,
    fail_on: Mutex<Option<String>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows returned by the next `query` call.
    pub fn push_response(&self, rows: Vec<RawRow>) {
        self.inner.responses.lock().push_back(rows);
    }

    /// Queue a single-column response, one row per item.
    pub fn push_single_column<S: Into<String>>(&self, values: impl IntoIterator<Item = S>) {
        self.push_response(values.into_iter().map(|v| vec![v.into()]).collect());
    }

    /// Fail any statement containing `needle`.
    pub fn fail_on(&self, needle: impl Into<String>) {
        *self.inner.fail_on.lock() = Some(needle.into());
    }

    /// Every statement received so far, in order.
    pub fn statements(&self) -> Vec<String> {
        self.inner.log.lock().clone()
    }

    pub fn last_statement(&self) -> Option<String> {
        self.inner.log.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.inner.log.lock().clear();
    }

    fn record(&self, sql: &str) -> Result<()> {
        self.inner.log.lock().push(sql.to_string());
        match self.inner.fail_on.lock().as_deref() {
            Some(needle) if sql.contains(needle) => {
                Err(Error::Client(format!("statement rejected: {sql}")))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl AgeClient for RecordingClient {
    async fn execute(&self, sql: &str) -> Result<()> {
        self.record(sql)
    }

    async fn query(&self, sql: &str) -> Result<Vec<RawRow>> {
        self.record(sql)?;
        Ok(self.inner.responses.lock().pop_front().unwrap_or_default())
    }
}
