// src/runner/mod.rs

//! Execution of individual nodes.
//!
//! - [`adapter`] is the seam to the storage layer (`ExecutionAdapter`,
//!   `AdapterSession`).
//! - [`capability`] holds the per-resource-type `NodeRunner` trait.
//! - [`seed`] implements it for seeds.
//! - [`lifecycle`] drives one node through announce / compile / execute /
//!   report.
//! - [`local`] is the file-backed adapter used by the binary.

pub mod adapter;
pub mod capability;
pub mod lifecycle;
pub mod local;
pub mod seed;

pub use adapter::{
    AdapterResponse, AdapterSession, BoxFuture, ExecutionAdapter, Materialized,
};
pub use capability::{NodeRunner, base_result};
pub use lifecycle::{ItemRunner, LifecycleState};
pub use local::LocalSeedAdapter;
pub use seed::SeedRunner;
