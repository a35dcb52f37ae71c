// src/graph/mod.rs

//! Resource graph, node store and selection.
//!
//! - [`node`] defines [`ResourceNode`].
//! - [`manifest`] stores nodes by id.
//! - [`graph`] holds dependency edges and the topological order.
//! - [`selector`] filters the graph for one task invocation.
//! - [`state`] persists what the previous run produced.

pub mod graph;
pub mod manifest;
pub mod node;
pub mod selector;
pub mod state;

pub use graph::ResourceGraph;
pub use manifest::Manifest;
pub use node::{NodeId, ResourceNode};
pub use selector::{SelectionCriteria, select};
pub use state::PreviousState;
