// src/results/mod.rs

//! Per-node results and the run summary built from them.

pub mod table;

use std::sync::Arc;
use std::time::Duration;

use crate::graph::ResourceNode;
use crate::types::NodeStatus;

pub use table::Table;

/// Outcome of one node's lifecycle. Immutable once built.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub status: NodeStatus,
    pub message: String,
    pub execution_time: Duration,
    pub node: Arc<ResourceNode>,
    /// Data produced by the execution (for seeds: the loaded table).
    pub payload: Option<Arc<Table>>,
}

impl ExecutionResult {
    pub fn new(
        node: Arc<ResourceNode>,
        status: NodeStatus,
        message: impl Into<String>,
        execution_time: Duration,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            execution_time,
            node,
            payload: None,
        }
    }

    pub fn skipped(node: Arc<ResourceNode>, reason: impl Into<String>) -> Self {
        Self::new(node, NodeStatus::Skipped, reason, Duration::ZERO)
    }

    pub fn with_payload(mut self, table: Table) -> Self {
        self.payload = Some(Arc::new(table));
        self
    }

    pub fn is_error(&self) -> bool {
        self.status.is_error()
    }
}

/// Per-status counts of a [`RunSummary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounts {
    pub success: usize,
    pub error: usize,
    pub skipped: usize,
}

impl RunCounts {
    pub fn total(&self) -> usize {
        self.success + self.error + self.skipped
    }
}

/// Ordered results of one invocation.
///
/// Results appear in the order the selector produced the nodes, not in
/// completion order. The summary is only built once every scheduled node has
/// a result, and cannot be modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    results: Vec<ExecutionResult>,
    elapsed: Duration,
}

impl RunSummary {
    pub fn finalize(results: Vec<ExecutionResult>, elapsed: Duration) -> Self {
        Self { results, elapsed }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[ExecutionResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn counts(&self) -> RunCounts {
        let mut counts = RunCounts::default();
        for r in &self.results {
            match r.status {
                NodeStatus::Success => counts.success += 1,
                NodeStatus::Error => counts.error += 1,
                NodeStatus::Skipped => counts.skipped += 1,
            }
        }
        counts
    }

    /// A run succeeds when no node ended in `Error`.
    pub fn success(&self) -> bool {
        !self.results.iter().any(ExecutionResult::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ExecutionResult> {
        self.results.iter().filter(|r| r.is_error())
    }

    pub fn exit_code(&self) -> i32 {
        if self.success() { 0 } else { 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResourceType;

    fn result(name: &str, status: NodeStatus) -> ExecutionResult {
        let node = Arc::new(ResourceNode::new(ResourceType::Seed, name, "main"));
        ExecutionResult::new(node, status, "", Duration::ZERO)
    }

    #[test]
    fn empty_summary_succeeds() {
        let summary = RunSummary::empty();
        assert!(summary.success());
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(summary.counts().total(), 0);
    }

    #[test]
    fn any_error_fails_the_run() {
        let summary = RunSummary::finalize(
            vec![
                result("a", NodeStatus::Success),
                result("b", NodeStatus::Error),
                result("c", NodeStatus::Skipped),
            ],
            Duration::from_millis(5),
        );
        assert!(!summary.success());
        assert_eq!(summary.exit_code(), 1);
        assert_eq!(
            summary.counts(),
            RunCounts { success: 1, error: 1, skipped: 1 }
        );
        assert_eq!(summary.errors().count(), 1);
    }

    #[test]
    fn skips_alone_do_not_fail_the_run() {
        let summary = RunSummary::finalize(vec![result("a", NodeStatus::Skipped)], Duration::ZERO);
        assert!(summary.success());
    }
}
