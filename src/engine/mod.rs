// src/engine/mod.rs

//! Task orchestration.
//!
//! - [`scheduler`] is the pure per-run state machine deciding which selected
//!   node may start next.
//! - [`slots`] stores results by selection index.
//! - [`orchestrator`] drives item runners over a worker pool.
//! - [`hooks`] holds end-of-run reporting (summary, table samples).
//! - [`seed_task`] wires the orchestrator up for seeds.

pub mod hooks;
pub mod orchestrator;
pub mod scheduler;
pub mod seed_task;
pub mod slots;

pub use hooks::{RunEndHook, SampleReporter, print_run_end_messages};
pub use orchestrator::Orchestrator;
pub use scheduler::{RunScheduler, SlotState};
pub use seed_task::SeedTask;
pub use slots::ResultSlots;

/// Per-invocation behaviour of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskOptions {
    /// Maximum number of nodes executing at once (values below 1 act as 1).
    pub threads: usize,
    /// Stop scheduling new nodes after the first error.
    pub fail_fast: bool,
    /// Print a random sample of every loaded table at the end of the run.
    pub show: bool,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            threads: 1,
            fail_fast: false,
            show: false,
        }
    }
}
