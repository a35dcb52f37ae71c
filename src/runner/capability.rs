// src/runner/capability.rs

//! Per-resource-type behaviour behind a single trait.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::Result;
use crate::events::Event;
use crate::graph::{Manifest, ResourceNode};
use crate::results::ExecutionResult;
use crate::runner::adapter::{AdapterSession, BoxFuture, Materialized};
use crate::types::{NodeStatus, ResourceType};

/// What the orchestrator needs to know about running one resource type.
///
/// The orchestrator and [`crate::runner::ItemRunner`] only ever see this
/// trait; they never branch on the concrete resource type.
pub trait NodeRunner: Send + Sync + Debug {
    fn resource_type(&self) -> ResourceType;

    /// Human description used in start lines and failure listings.
    fn describe_node(&self, node: &ResourceNode) -> String;

    /// Turn a node into its executable form.
    fn compile(&self, node: Arc<ResourceNode>, manifest: &Manifest) -> Result<Arc<ResourceNode>>;

    fn execute<'a>(
        &'a self,
        node: &'a ResourceNode,
        session: &'a mut dyn AdapterSession,
    ) -> BoxFuture<'a, Result<Materialized>> {
        session.execute(node)
    }

    /// Wrap a raw outcome into a result. The default is the shared base
    /// builder; resource types layer extra data on top of it.
    fn build_result(
        &self,
        node: Arc<ResourceNode>,
        raw: Materialized,
        elapsed: Duration,
    ) -> Result<ExecutionResult> {
        Ok(base_result(node, &raw, elapsed))
    }

    /// Completion event for a finished (or skipped) node.
    fn result_event(&self, result: &ExecutionResult, index: usize, total: usize) -> Event;
}

/// Status, message and timing from an adapter response.
pub fn base_result(node: Arc<ResourceNode>, raw: &Materialized, elapsed: Duration) -> ExecutionResult {
    let status = if raw.response.success {
        NodeStatus::Success
    } else {
        NodeStatus::Error
    };
    ExecutionResult::new(node, status, raw.response.message.clone(), elapsed)
}
