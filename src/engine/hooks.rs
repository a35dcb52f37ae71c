// src/engine/hooks.rs

//! End-of-run reporting.

use std::fmt::Debug;

use tracing::debug;

use crate::errors::Result;
use crate::events::{Event, EventSink, fire_event};
use crate::results::{ExecutionResult, RunSummary, Table};
use crate::runner::NodeRunner;
use crate::types::EventLevel;

/// Maximum rows shown per table by [`SampleReporter`].
pub const DEFAULT_SAMPLE_ROWS: usize = 10;

/// Postprocessing step run once all nodes finished.
///
/// Hooks only observe the summary. A hook error is logged by the
/// orchestrator and never changes the outcome of the run.
pub trait RunEndHook: Send + Sync + Debug {
    fn name(&self) -> &str;

    fn on_run_end(&self, summary: &RunSummary, sink: &dyn EventSink) -> Result<()>;
}

/// Prints a random sample of every table loaded without error.
#[derive(Debug, Clone)]
pub struct SampleReporter {
    max_rows: usize,
}

impl Default for SampleReporter {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_SAMPLE_ROWS,
        }
    }
}

impl SampleReporter {
    /// Random sample of `table`: at most `max_rows` rows, every column.
    pub fn sample(&self, table: &Table) -> Table {
        table.sample(self.max_rows, &mut rand::thread_rng())
    }

    fn show_table(&self, result: &ExecutionResult, table: &Table, sink: &dyn EventSink) {
        let header = format!("Random sample of table: {}", result.node.relation());
        let rule = "-".repeat(header.chars().count());

        fire_event(sink, EventLevel::Info, Event::Formatting(String::new()));
        fire_event(sink, EventLevel::Info, Event::Header(header));
        fire_event(sink, EventLevel::Info, Event::Formatting(rule));
        fire_event(
            sink,
            EventLevel::Info,
            Event::Formatting(self.sample(table).render()),
        );
        fire_event(sink, EventLevel::Info, Event::Formatting(String::new()));
    }
}

impl RunEndHook for SampleReporter {
    fn name(&self) -> &str {
        "sample"
    }

    fn on_run_end(&self, summary: &RunSummary, sink: &dyn EventSink) -> Result<()> {
        for result in summary.results().iter().filter(|r| !r.is_error()) {
            match &result.payload {
                Some(table) => self.show_table(result, table, sink),
                None => debug!(node = %result.node.unique_id, "no table to sample"),
            }
        }
        Ok(())
    }
}

/// Standard end-of-run output: totals, per-failure details and the
/// PASS/ERROR/SKIP tally.
pub fn print_run_end_messages(summary: &RunSummary, runner: &dyn NodeRunner, sink: &dyn EventSink) {
    let counts = summary.counts();
    let total = counts.total();
    let noun = format!(
        "{}{}",
        runner.resource_type(),
        if total == 1 { "" } else { "s" }
    );

    fire_event(sink, EventLevel::Info, Event::Formatting(String::new()));
    fire_event(
        sink,
        EventLevel::Info,
        Event::RunFinished {
            total,
            noun,
            elapsed: summary.elapsed(),
        },
    );
    fire_event(sink, EventLevel::Info, Event::Formatting(String::new()));

    if summary.success() {
        fire_event(
            sink,
            EventLevel::Info,
            Event::Formatting("Completed successfully".to_string()),
        );
    } else {
        let plural = if counts.error == 1 { "" } else { "s" };
        fire_event(
            sink,
            EventLevel::Error,
            Event::Formatting(format!("Completed with {} error{plural}:", counts.error)),
        );
        for result in summary.errors() {
            fire_event(
                sink,
                EventLevel::Error,
                Event::NodeFailure {
                    description: runner.describe_node(&result.node),
                    message: result.message.clone(),
                },
            );
        }
    }

    fire_event(sink, EventLevel::Info, Event::Stats(counts));
}
