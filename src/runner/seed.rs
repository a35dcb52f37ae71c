// src/runner/seed.rs

use std::sync::Arc;
use std::time::Duration;

use crate::errors::Result;
use crate::events::Event;
use crate::graph::{Manifest, ResourceNode};
use crate::results::ExecutionResult;
use crate::runner::adapter::Materialized;
use crate::runner::capability::{NodeRunner, base_result};
use crate::types::ResourceType;

/// Runner for seed resources.
///
/// Seeds have nothing to compile, and their result carries the loaded table
/// so it can be sampled at the end of the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedRunner;

impl NodeRunner for SeedRunner {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Seed
    }

    fn describe_node(&self, node: &ResourceNode) -> String {
        format!("seed file {}", node.relation())
    }

    fn compile(&self, node: Arc<ResourceNode>, _manifest: &Manifest) -> Result<Arc<ResourceNode>> {
        Ok(node)
    }

    fn build_result(
        &self,
        node: Arc<ResourceNode>,
        raw: Materialized,
        elapsed: Duration,
    ) -> Result<ExecutionResult> {
        let result = base_result(node, &raw, elapsed);
        Ok(match raw.table {
            Some(table) => result.with_payload(table),
            None => result,
        })
    }

    fn result_event(&self, result: &ExecutionResult, index: usize, total: usize) -> Event {
        Event::SeedResult {
            status: result.status,
            message: result.message.clone(),
            index,
            total,
            execution_time: result.execution_time,
            schema: result.node.schema.clone(),
            relation: result.node.alias.clone(),
        }
    }
}
