// src/events/mod.rs

//! Structured notifications emitted while a task runs.
//!
//! Nothing here is global: an [`EventSink`] is handed to the orchestrator and
//! every item runner explicitly. Production uses [`ConsoleSink`]; tests use
//! [`mock::MemorySink`] to capture what was emitted.

pub mod console;
pub mod mock;

use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::errors::Result;
use crate::results::RunCounts;
use crate::types::{EventLevel, NodeStatus};

pub use console::ConsoleSink;

/// Total width of a padded status line.
const LINE_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A node is about to run.
    StartLine {
        description: String,
        index: usize,
        total: usize,
    },
    /// A seed finished (successfully or not) or was skipped.
    SeedResult {
        status: NodeStatus,
        message: String,
        index: usize,
        total: usize,
        execution_time: Duration,
        schema: String,
        relation: String,
    },
    /// Section header, e.g. above a table sample.
    Header(String),
    /// Free-form output line.
    Formatting(String),
    /// "Finished running N ... in Xs."
    RunFinished {
        total: usize,
        noun: String,
        elapsed: Duration,
    },
    /// One failed node, listed at the end of the run.
    NodeFailure { description: String, message: String },
    /// Final PASS/ERROR/SKIP tally.
    Stats(RunCounts),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::StartLine {
                description,
                index,
                total,
            } => f.write_str(&padded(
                &format!("{index} of {total} START {description}"),
                "[RUN]",
            )),
            Event::SeedResult {
                status,
                message,
                index,
                total,
                execution_time,
                schema,
                relation,
            } => {
                let secs = execution_time.as_secs_f64();
                let (prefix, tail) = match status {
                    NodeStatus::Success => (
                        format!("{index} of {total} OK loaded seed file {schema}.{relation}"),
                        format!("[{message} in {secs:.2}s]"),
                    ),
                    NodeStatus::Error => (
                        format!("{index} of {total} ERROR loading seed file {schema}.{relation}"),
                        format!("[ERROR in {secs:.2}s]"),
                    ),
                    NodeStatus::Skipped => (
                        format!("{index} of {total} SKIP seed file {schema}.{relation}"),
                        "[SKIP]".to_string(),
                    ),
                };
                f.write_str(&padded(&prefix, &tail))
            }
            Event::Header(h) => f.write_str(h),
            Event::Formatting(s) => f.write_str(s),
            Event::RunFinished {
                total,
                noun,
                elapsed,
            } => write!(
                f,
                "Finished running {total} {noun} in {:.2}s.",
                elapsed.as_secs_f64()
            ),
            Event::NodeFailure {
                description,
                message,
            } => write!(f, "Failure in {description}\n  {message}"),
            Event::Stats(c) => write!(
                f,
                "Done. PASS={} ERROR={} SKIP={} TOTAL={}",
                c.success,
                c.error,
                c.skipped,
                c.total()
            ),
        }
    }
}

/// `prefix ..... tail`, dot-padded to [`LINE_WIDTH`].
fn padded(prefix: &str, tail: &str) -> String {
    let used = prefix.chars().count() + tail.chars().count() + 2;
    let dots = LINE_WIDTH.saturating_sub(used).max(3);
    format!("{prefix} {} {tail}", ".".repeat(dots))
}

/// Receiver of structured notifications.
pub trait EventSink: Send + Sync + fmt::Debug {
    /// Deliver one event. Errors are reporting failures and must never change
    /// the outcome of a run; callers go through [`fire_event`].
    fn emit(&self, level: EventLevel, event: &Event) -> Result<()>;
}

/// Emit an event, logging and swallowing delivery failures.
pub fn fire_event(sink: &dyn EventSink, level: EventLevel, event: Event) {
    if let Err(err) = sink.emit(level, &event) {
        warn!(error = %err, ?level, "failed to emit event; continuing");
    }
}
