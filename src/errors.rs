// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::runner::LifecycleState;

#[derive(Error, Debug)]
pub enum SeedrunError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Raised before any node is scheduled; fatal to the whole run.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Resource not found: {0}")]
    NodeNotFound(String),

    #[error("Cycle detected in resource graph: {0}")]
    DagCycle(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// Failure signalled by an execution adapter. The message is carried
    /// verbatim into the node's result.
    #[error("{0}")]
    Adapter(String),

    /// A node's execute or build-result step failed.
    #[error("{message}")]
    Execution { node: String, message: String },

    /// An event could not be delivered to the sink.
    #[error("Reporting failure: {0}")]
    Reporting(String),

    #[error("invalid lifecycle transition for '{node}': {from:?} -> {to:?}")]
    Lifecycle {
        node: String,
        from: LifecycleState,
        to: LifecycleState,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SeedrunError>;
