// src/engine/orchestrator.rs

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::{self, JoinSet};
use tracing::{debug, info, warn};

use crate::engine::TaskOptions;
use crate::engine::hooks::{RunEndHook, print_run_end_messages};
use crate::engine::scheduler::RunScheduler;
use crate::engine::slots::ResultSlots;
use crate::errors::{Result, SeedrunError};
use crate::events::{Event, EventSink, fire_event};
use crate::graph::{Manifest, ResourceGraph, ResourceNode, SelectionCriteria, select};
use crate::results::{ExecutionResult, RunSummary};
use crate::runner::{ExecutionAdapter, ItemRunner, NodeRunner};
use crate::types::{EventLevel, NodeStatus};

/// Runs the selected nodes of one task invocation.
///
/// Selection happens up front. Nodes are then handed to a pool of at most
/// `options.threads` workers, each with its own adapter session. Results are
/// collected into index-stable slots, so the summary follows selection order
/// regardless of completion order.
pub struct Orchestrator {
    graph: Option<Arc<ResourceGraph>>,
    manifest: Option<Arc<Manifest>>,
    adapter: Arc<dyn ExecutionAdapter>,
    runner: Arc<dyn NodeRunner>,
    sink: Arc<dyn EventSink>,
    options: TaskOptions,
    hooks: Vec<Arc<dyn RunEndHook>>,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("runner", &self.runner)
            .field("adapter", &self.adapter.name())
            .field("options", &self.options)
            .field("hooks", &self.hooks.iter().map(|h| h.name()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(
        graph: Option<Arc<ResourceGraph>>,
        manifest: Option<Arc<Manifest>>,
        adapter: Arc<dyn ExecutionAdapter>,
        runner: Arc<dyn NodeRunner>,
        sink: Arc<dyn EventSink>,
        options: TaskOptions,
    ) -> Self {
        Self {
            graph,
            manifest,
            adapter,
            runner,
            sink,
            options,
            hooks: Vec::new(),
        }
    }

    pub fn with_hook(mut self, hook: Arc<dyn RunEndHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Whether the first error stops scheduling.
    pub fn raise_on_first_error(&self) -> bool {
        self.options.fail_fast
    }

    pub fn get_selected_nodes(&self, criteria: &SelectionCriteria) -> Result<Vec<Arc<ResourceNode>>> {
        select(self.graph.as_deref(), self.manifest.as_deref(), criteria)
    }

    /// Deferral to a previous manifest is disabled: the freshly selected
    /// node is always the one that runs.
    pub fn defer_to_manifest(&self, node: &ResourceNode) {
        debug!(node = %node.unique_id, "deferral disabled; using current node");
    }

    /// Select, execute and summarize.
    ///
    /// Only precondition failures are returned as errors. Everything that
    /// goes wrong while a node runs ends up as an `Error` result instead.
    pub async fn run(&self, criteria: &SelectionCriteria) -> Result<RunSummary> {
        let started = Instant::now();
        let nodes = self.get_selected_nodes(criteria)?;

        if nodes.is_empty() {
            fire_event(
                self.sink.as_ref(),
                EventLevel::Warn,
                Event::Formatting("Nothing to do. Try checking your selection.".to_string()),
            );
            return Ok(RunSummary::empty());
        }

        let (Some(graph), Some(manifest)) = (self.graph.as_ref(), self.manifest.as_ref()) else {
            return Err(SeedrunError::Precondition(
                "graph and manifest must be set to perform node selection".to_string(),
            ));
        };

        for node in &nodes {
            self.defer_to_manifest(node);
        }

        info!(
            nodes = nodes.len(),
            threads = self.options.threads.max(1),
            fail_fast = self.options.fail_fast,
            "starting run"
        );

        let results = self.execute_nodes(&nodes, graph, manifest).await;
        let summary = RunSummary::finalize(results, started.elapsed());
        self.task_end_messages(&summary);

        let counts = summary.counts();
        info!(
            success = counts.success,
            error = counts.error,
            skipped = counts.skipped,
            elapsed_ms = summary.elapsed().as_millis() as u64,
            "run finished"
        );
        Ok(summary)
    }

    async fn execute_nodes(
        &self,
        nodes: &[Arc<ResourceNode>],
        graph: &ResourceGraph,
        manifest: &Arc<Manifest>,
    ) -> Vec<ExecutionResult> {
        let total = nodes.len();
        let threads = self.options.threads.max(1);

        let mut scheduler = RunScheduler::new(nodes, graph);
        let mut slots = ResultSlots::new(total);
        let mut workers: JoinSet<ExecutionResult> = JoinSet::new();
        let mut running: HashMap<task::Id, usize> = HashMap::new();
        let mut aborted = false;

        loop {
            while !aborted && workers.len() < threads {
                let Some(idx) = scheduler.next_ready() else {
                    break;
                };
                let job = NodeJob {
                    runner: Arc::clone(&self.runner),
                    adapter: Arc::clone(&self.adapter),
                    sink: Arc::clone(&self.sink),
                    manifest: Arc::clone(manifest),
                    node: Arc::clone(&nodes[idx]),
                    index: idx + 1,
                    total,
                };
                let handle = workers.spawn(job.run());
                running.insert(handle.id(), idx);
                debug!(node = %nodes[idx].unique_id, index = idx + 1, total, "node scheduled");
            }

            let Some(joined) = workers.join_next_with_id().await else {
                break;
            };

            let (id, result) = match joined {
                Ok(finished) => finished,
                Err(err) => {
                    let id = err.id();
                    let Some(&idx) = running.get(&id) else {
                        warn!(task_id = %id, "unknown worker finished");
                        continue;
                    };
                    let message = if err.is_panic() {
                        "worker panicked while running node".to_string()
                    } else {
                        format!("worker cancelled: {err}")
                    };
                    warn!(node = %nodes[idx].unique_id, error = %err, "worker failed");
                    let result = ExecutionResult::new(
                        Arc::clone(&nodes[idx]),
                        NodeStatus::Error,
                        message,
                        Duration::ZERO,
                    );
                    fire_event(
                        self.sink.as_ref(),
                        EventLevel::Error,
                        self.runner.result_event(&result, idx + 1, total),
                    );
                    (id, result)
                }
            };

            let Some(idx) = running.remove(&id) else {
                warn!(task_id = %id, "unknown worker finished");
                continue;
            };

            let status = result.status;
            if let Err(err) = slots.fill(idx, result) {
                warn!(error = %err, "dropping duplicate result");
            }

            scheduler.complete(idx, status);

            if status.is_error() && self.raise_on_first_error() && !aborted {
                info!(node = %nodes[idx].unique_id, "fail-fast: no further nodes will be scheduled");
                aborted = true;
            }
        }

        for skipped in scheduler.abort() {
            self.record_skipped(&mut slots, nodes, skipped, "skipped due to fail-fast".to_string());
        }

        slots.into_results(|idx| {
            warn!(node = %nodes[idx].unique_id, "no result recorded for node");
            ExecutionResult::new(
                Arc::clone(&nodes[idx]),
                NodeStatus::Error,
                "internal error: no result recorded",
                Duration::ZERO,
            )
        })
    }

    fn record_skipped(
        &self,
        slots: &mut ResultSlots,
        nodes: &[Arc<ResourceNode>],
        idx: usize,
        reason: String,
    ) {
        debug!(node = %nodes[idx].unique_id, reason = %reason, "node skipped");
        let result = ExecutionResult::skipped(Arc::clone(&nodes[idx]), reason);
        fire_event(
            self.sink.as_ref(),
            EventLevel::Info,
            self.runner.result_event(&result, idx + 1, nodes.len()),
        );
        if let Err(err) = slots.fill(idx, result) {
            warn!(error = %err, "dropping duplicate result");
        }
    }

    fn task_end_messages(&self, summary: &RunSummary) {
        for hook in &self.hooks {
            if let Err(err) = hook.on_run_end(summary, self.sink.as_ref()) {
                warn!(hook = hook.name(), error = %err, "run-end hook failed; continuing");
            }
        }
        print_run_end_messages(summary, self.runner.as_ref(), self.sink.as_ref());
    }
}

/// Everything one worker needs to take a node through its lifecycle.
struct NodeJob {
    runner: Arc<dyn NodeRunner>,
    adapter: Arc<dyn ExecutionAdapter>,
    sink: Arc<dyn EventSink>,
    manifest: Arc<Manifest>,
    node: Arc<ResourceNode>,
    index: usize,
    total: usize,
}

impl NodeJob {
    async fn run(self) -> ExecutionResult {
        let NodeJob {
            runner,
            adapter,
            sink,
            manifest,
            node,
            index,
            total,
        } = self;

        let mut item = ItemRunner::new(runner, Arc::clone(&node), index, total, sink);
        let started = Instant::now();

        let outcome = match item.before_execute() {
            Ok(()) => match adapter.open_session() {
                Ok(mut session) => item.run(&manifest, session.as_mut()).await,
                Err(err) => Err(err),
            },
            Err(err) => Err(err),
        };

        let result = outcome.unwrap_or_else(|err| {
            warn!(node = %node.unique_id, index, total, error = %err, "node failed");
            ExecutionResult::new(
                Arc::clone(&node),
                NodeStatus::Error,
                err.to_string(),
                started.elapsed(),
            )
        });

        if let Err(err) = item.print_result_line(&result) {
            warn!(node = %node.unique_id, error = %err, "could not report result");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::mock::MemorySink;
    use crate::results::Table;
    use crate::runner::{AdapterResponse, AdapterSession, BoxFuture, Materialized, SeedRunner};
    use crate::types::ResourceType;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted outcome per node name.
    #[derive(Debug, Clone, Copy)]
    enum Script {
        Ok { delay_ms: u64 },
        Raise(&'static str),
        Panic,
    }

    #[derive(Debug, Default)]
    struct ScriptedAdapter {
        scripts: BTreeMap<String, Script>,
        sessions: AtomicUsize,
    }

    impl ScriptedAdapter {
        fn with(mut self, name: &str, script: Script) -> Self {
            self.scripts.insert(name.to_string(), script);
            self
        }
    }

    struct ScriptedSession {
        scripts: BTreeMap<String, Script>,
    }

    impl ExecutionAdapter for ScriptedAdapter {
        fn name(&self) -> &str {
            "scripted"
        }

        fn open_session(&self) -> Result<Box<dyn AdapterSession>> {
            self.sessions.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(ScriptedSession {
                scripts: self.scripts.clone(),
            }))
        }
    }

    impl AdapterSession for ScriptedSession {
        fn execute<'a>(&'a mut self, node: &'a ResourceNode) -> BoxFuture<'a, Result<Materialized>> {
            let script = self
                .scripts
                .get(&node.name)
                .copied()
                .unwrap_or(Script::Ok { delay_ms: 0 });
            Box::pin(async move {
                match script {
                    Script::Ok { delay_ms } => {
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        Ok(Materialized {
                            response: AdapterResponse::ok("INSERT 1", Some(1)),
                            table: Some(Table::from_delimited("id\n1\n", ',')),
                        })
                    }
                    Script::Raise(msg) => Err(SeedrunError::Adapter(msg.to_string())),
                    Script::Panic => panic!("adapter blew up"),
                }
            })
        }
    }

    fn project(names: &[&str]) -> (Arc<ResourceGraph>, Arc<Manifest>) {
        let manifest = Manifest::from_nodes(
            names
                .iter()
                .map(|n| ResourceNode::new(ResourceType::Seed, *n, "main")),
        );
        let graph = ResourceGraph::from_manifest(&manifest).unwrap();
        (Arc::new(graph), Arc::new(manifest))
    }

    fn orchestrator(
        adapter: ScriptedAdapter,
        sink: Arc<MemorySink>,
        options: TaskOptions,
    ) -> (Orchestrator, Arc<ScriptedAdapter>) {
        let (graph, manifest) = project(&["a", "b", "c"]);
        let adapter = Arc::new(adapter);
        let orch = Orchestrator::new(
            Some(graph),
            Some(manifest),
            adapter.clone(),
            Arc::new(SeedRunner),
            sink,
            options,
        );
        (orch, adapter)
    }

    fn statuses(summary: &RunSummary) -> Vec<NodeStatus> {
        summary.results().iter().map(|r| r.status).collect()
    }

    fn seeds() -> SelectionCriteria {
        SelectionCriteria::for_types([ResourceType::Seed])
    }

    #[tokio::test]
    async fn order_follows_selection_not_completion() {
        let adapter = ScriptedAdapter::default()
            .with("a", Script::Ok { delay_ms: 60 })
            .with("b", Script::Ok { delay_ms: 30 });
        let options = TaskOptions {
            threads: 3,
            ..TaskOptions::default()
        };
        let (orch, adapter) = orchestrator(adapter, Arc::new(MemorySink::new()), options);

        let summary = orch.run(&seeds()).await.unwrap();
        let names: Vec<&str> = summary.results().iter().map(|r| r.node.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(summary.success());
        assert_eq!(adapter.sessions.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn worker_panic_becomes_error_result() {
        let adapter = ScriptedAdapter::default().with("b", Script::Panic);
        let (orch, _) = orchestrator(adapter, Arc::new(MemorySink::new()), TaskOptions::default());

        let summary = orch.run(&seeds()).await.unwrap();
        assert_eq!(
            statuses(&summary),
            vec![NodeStatus::Success, NodeStatus::Error, NodeStatus::Success]
        );
        assert_eq!(summary.results()[1].message, "worker panicked while running node");
    }

    #[tokio::test]
    async fn fail_fast_skips_unscheduled_nodes() {
        let adapter = ScriptedAdapter::default().with("a", Script::Raise("boom"));
        let options = TaskOptions {
            fail_fast: true,
            ..TaskOptions::default()
        };
        let (orch, adapter) = orchestrator(adapter, Arc::new(MemorySink::new()), options);

        let summary = orch.run(&seeds()).await.unwrap();
        assert_eq!(
            statuses(&summary),
            vec![NodeStatus::Error, NodeStatus::Skipped, NodeStatus::Skipped]
        );
        assert_eq!(summary.results()[1].message, "skipped due to fail-fast");
        assert_eq!(adapter.sessions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_graph_is_a_precondition_error() {
        let (_, manifest) = project(&["a"]);
        let orch = Orchestrator::new(
            None,
            Some(manifest),
            Arc::new(ScriptedAdapter::default()),
            Arc::new(SeedRunner),
            Arc::new(MemorySink::new()),
            TaskOptions::default(),
        );
        let err = orch.run(&seeds()).await.unwrap_err();
        assert!(matches!(err, SeedrunError::Precondition(_)));
    }

    #[tokio::test]
    async fn empty_selection_is_a_successful_noop() {
        let sink = Arc::new(MemorySink::new());
        let (orch, adapter) = orchestrator(ScriptedAdapter::default(), sink.clone(), TaskOptions::default());

        let summary = orch
            .run(&SelectionCriteria::for_types([ResourceType::Model]))
            .await
            .unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(adapter.sessions.load(Ordering::SeqCst), 0);
        assert_eq!(sink.events().len(), 1);
    }
}
