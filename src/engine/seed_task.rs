// src/engine/seed_task.rs

use std::sync::Arc;

use crate::engine::TaskOptions;
use crate::engine::hooks::SampleReporter;
use crate::engine::orchestrator::Orchestrator;
use crate::errors::Result;
use crate::events::EventSink;
use crate::graph::{Manifest, ResourceGraph, SelectionCriteria};
use crate::results::RunSummary;
use crate::runner::{ExecutionAdapter, SeedRunner};
use crate::types::ResourceType;

/// The seed task: selects seed resources only, continues past errors unless
/// fail-fast is requested, and optionally prints table samples at the end.
#[derive(Debug)]
pub struct SeedTask {
    orchestrator: Orchestrator,
    criteria: SelectionCriteria,
}

impl SeedTask {
    pub fn new(
        graph: Option<Arc<ResourceGraph>>,
        manifest: Option<Arc<Manifest>>,
        adapter: Arc<dyn ExecutionAdapter>,
        sink: Arc<dyn EventSink>,
        options: TaskOptions,
    ) -> Self {
        let mut orchestrator =
            Orchestrator::new(graph, manifest, adapter, Arc::new(SeedRunner), sink, options);
        if options.show {
            orchestrator = orchestrator.with_hook(Arc::new(SampleReporter::default()));
        }
        Self {
            orchestrator,
            criteria: Self::default_criteria(),
        }
    }

    pub fn default_criteria() -> SelectionCriteria {
        SelectionCriteria::for_types([ResourceType::Seed])
    }

    /// Narrow the selection (names, previous state). The resource type set
    /// is always reset to seeds.
    pub fn with_criteria(mut self, mut criteria: SelectionCriteria) -> Self {
        criteria.resource_types = [ResourceType::Seed].into_iter().collect();
        self.criteria = criteria;
        self
    }

    pub fn criteria(&self) -> &SelectionCriteria {
        &self.criteria
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub async fn run(&self) -> Result<RunSummary> {
        self.orchestrator.run(&self.criteria).await
    }
}
