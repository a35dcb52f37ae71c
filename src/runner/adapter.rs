// src/runner/adapter.rs

//! Pluggable execution adapter abstraction.
//!
//! The orchestrator never talks to storage directly. Each worker opens its
//! own [`AdapterSession`] from the shared [`ExecutionAdapter`] and drops it
//! when the node is done, so no session is ever used by two nodes at once.
//!
//! - [`crate::runner::local::LocalSeedAdapter`] is the file-backed adapter used
//!   by the `seedrun` binary.
//! - Tests provide their own adapter that scripts outcomes per node.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::graph::ResourceNode;
use crate::results::Table;

/// Boxed future returned by adapter and runner methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What the storage layer reported for one execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterResponse {
    /// Short status text, e.g. `INSERT 42`.
    pub message: String,
    pub rows_affected: Option<u64>,
    /// `false` when the adapter completed but signalled failure.
    pub success: bool,
}

impl AdapterResponse {
    pub fn ok(message: impl Into<String>, rows_affected: Option<u64>) -> Self {
        Self {
            message: message.into(),
            rows_affected,
            success: true,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            rows_affected: None,
            success: false,
        }
    }
}

/// Raw outcome of executing a node: the response plus any produced data.
#[derive(Debug, Clone)]
pub struct Materialized {
    pub response: AdapterResponse,
    pub table: Option<Table>,
}

/// Factory for per-worker sessions.
pub trait ExecutionAdapter: Send + Sync + Debug {
    fn name(&self) -> &str;

    /// Open an independent session. Called once per node execution.
    fn open_session(&self) -> Result<Box<dyn AdapterSession>>;
}

/// One connection-like handle, owned by a single worker.
pub trait AdapterSession: Send {
    /// Perform the node's effect. Timeouts, if any, are the adapter's
    /// business and surface as errors here.
    fn execute<'a>(&'a mut self, node: &'a ResourceNode) -> BoxFuture<'a, Result<Materialized>>;
}
