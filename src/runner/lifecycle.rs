// src/runner/lifecycle.rs

//! Lifecycle of one node: announce, compile, execute + build result, report.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::errors::{Result, SeedrunError};
use crate::events::{Event, EventSink, fire_event};
use crate::graph::{Manifest, ResourceNode};
use crate::results::ExecutionResult;
use crate::runner::adapter::AdapterSession;
use crate::runner::capability::NodeRunner;
use crate::types::EventLevel;

/// Where an [`ItemRunner`] is in its lifecycle.
///
/// Transitions only move forward. A failing compile or execute step leaves
/// the runner in its current state; the error result is then reported
/// directly, and `Reported` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    Pending,
    Announced,
    Compiled,
    Executed,
    Reported,
}

/// Drives one node through its lifecycle.
///
/// `index` is 1-based within the batch of `total` selected nodes.
#[derive(Debug)]
pub struct ItemRunner {
    runner: Arc<dyn NodeRunner>,
    node: Arc<ResourceNode>,
    index: usize,
    total: usize,
    sink: Arc<dyn EventSink>,
    state: LifecycleState,
}

impl ItemRunner {
    pub fn new(
        runner: Arc<dyn NodeRunner>,
        node: Arc<ResourceNode>,
        index: usize,
        total: usize,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            runner,
            node,
            index,
            total,
            sink,
            state: LifecycleState::Pending,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn node(&self) -> &Arc<ResourceNode> {
        &self.node
    }

    pub fn describe_node(&self) -> String {
        self.runner.describe_node(&self.node)
    }

    /// Emit the start line.
    pub fn before_execute(&mut self) -> Result<()> {
        self.transition(LifecycleState::Pending, LifecycleState::Announced)?;
        fire_event(
            self.sink.as_ref(),
            EventLevel::Info,
            Event::StartLine {
                description: self.describe_node(),
                index: self.index,
                total: self.total,
            },
        );
        Ok(())
    }

    pub fn compile(&mut self, manifest: &Manifest) -> Result<Arc<ResourceNode>> {
        self.expect_state(LifecycleState::Announced, LifecycleState::Compiled)?;
        let compiled = self.runner.compile(Arc::clone(&self.node), manifest)?;
        self.state = LifecycleState::Compiled;
        Ok(compiled)
    }

    /// Execute the compiled node on `session` and build its result.
    ///
    /// Errors are returned untouched; classifying them is the caller's job.
    pub async fn execute(
        &mut self,
        compiled: Arc<ResourceNode>,
        session: &mut dyn AdapterSession,
    ) -> Result<ExecutionResult> {
        self.expect_state(LifecycleState::Compiled, LifecycleState::Executed)?;

        let started = Instant::now();
        let raw = self.runner.execute(&compiled, session).await?;
        let elapsed = started.elapsed();
        debug!(
            node = %self.node.unique_id,
            success = raw.response.success,
            elapsed_ms = elapsed.as_millis() as u64,
            "adapter returned"
        );

        let result = self.runner.build_result(compiled, raw, elapsed)?;
        self.state = LifecycleState::Executed;
        Ok(result)
    }

    /// Compile, then execute: everything between announcing and reporting.
    pub async fn run(
        &mut self,
        manifest: &Manifest,
        session: &mut dyn AdapterSession,
    ) -> Result<ExecutionResult> {
        let compiled = self.compile(manifest)?;
        self.execute(compiled, session).await
    }

    /// Emit the completion line. Error results are reported at error level.
    pub fn print_result_line(&mut self, result: &ExecutionResult) -> Result<()> {
        if self.state == LifecycleState::Pending || self.state == LifecycleState::Reported {
            return Err(self.invalid(LifecycleState::Reported));
        }
        self.state = LifecycleState::Reported;

        let level = if result.is_error() {
            EventLevel::Error
        } else {
            EventLevel::Info
        };
        fire_event(
            self.sink.as_ref(),
            level,
            self.runner.result_event(result, self.index, self.total),
        );
        Ok(())
    }

    fn transition(&mut self, from: LifecycleState, to: LifecycleState) -> Result<()> {
        self.expect_state(from, to)?;
        self.state = to;
        Ok(())
    }

    fn expect_state(&self, from: LifecycleState, to: LifecycleState) -> Result<()> {
        if self.state == from {
            Ok(())
        } else {
            Err(self.invalid(to))
        }
    }

    fn invalid(&self, to: LifecycleState) -> SeedrunError {
        SeedrunError::Lifecycle {
            node: self.node.unique_id.clone(),
            from: self.state,
            to,
        }
    }
}
