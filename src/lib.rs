// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod events;
pub mod fs;
pub mod graph;
pub mod logging;
pub mod results;
pub mod runner;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::model::ProjectFile;
use crate::engine::{SeedTask, TaskOptions};
use crate::events::ConsoleSink;
use crate::fs::{FileSystem, RealFileSystem};
use crate::graph::{
    Manifest, PreviousState, ResourceGraph, ResourceNode, SelectionCriteria, select,
};
use crate::results::RunSummary;
use crate::runner::LocalSeedAdapter;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - project loading and validation
/// - manifest + resource graph
/// - previous-run state (for `--modified`)
/// - the seed task with the local file adapter and a console sink
///
/// Returns the run summary; the caller turns it into an exit code.
pub async fn run(args: CliArgs) -> Result<RunSummary> {
    let project_path = args.project.clone();
    let project = load_and_validate(&project_path)
        .with_context(|| format!("loading project file {:?}", project_path))?;
    let root = project_root_dir(&project_path);
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let manifest = Arc::new(Manifest::from_project(&project, &root, fs.as_ref()));
    let graph = Arc::new(ResourceGraph::from_manifest(&manifest)?);
    debug!(nodes = manifest.len(), "manifest built");

    let state_path = root.join(
        args.state
            .clone()
            .unwrap_or_else(|| project.config.state_path.clone()),
    );
    let previous = load_previous_state(fs.as_ref(), &state_path)?;

    let options = task_options(&args, &project);
    let criteria = selection_criteria(&args, previous.clone());

    if args.dry_run {
        let nodes = select(Some(graph.as_ref()), Some(manifest.as_ref()), &criteria)?;
        print_dry_run(&project, &options, &nodes);
        return Ok(RunSummary::empty());
    }

    let adapter = Arc::new(LocalSeedAdapter::new(
        Arc::clone(&fs),
        root.join(&project.config.target_dir),
        project.config.delimiter,
    ));
    let sink = Arc::new(ConsoleSink::stdout());

    let task = SeedTask::new(Some(graph), Some(manifest), adapter, sink, options)
        .with_criteria(criteria);
    let summary = task.run().await?;

    let mut state = previous.map(|s| (*s).clone()).unwrap_or_default();
    state.record(&summary);
    if let Err(err) = state.save(fs.as_ref(), &state_path) {
        warn!(path = ?state_path, error = %err, "failed to save run state");
    } else {
        info!(path = ?state_path, recorded = state.checksums.len(), "run state saved");
    }

    Ok(summary)
}

/// CLI values win over `[config]`.
pub fn task_options(args: &CliArgs, project: &ProjectFile) -> TaskOptions {
    TaskOptions {
        threads: args.threads.unwrap_or(project.config.threads).max(1),
        fail_fast: args.fail_fast || project.config.fail_fast,
        show: args.show,
    }
}

fn selection_criteria(args: &CliArgs, previous: Option<Arc<PreviousState>>) -> SelectionCriteria {
    let mut criteria = SeedTask::default_criteria();
    if !args.select.is_empty() {
        criteria = criteria.with_names(args.select.iter().cloned());
    }
    match previous {
        Some(state) => criteria.with_previous_state(state, args.modified),
        None => {
            if args.modified {
                warn!("no previous run state found; every seed counts as modified");
            }
            criteria.modified_only = args.modified;
            criteria
        }
    }
}

fn load_previous_state(fs: &dyn FileSystem, path: &Path) -> Result<Option<Arc<PreviousState>>> {
    if !fs.is_file(path) {
        debug!(path = ?path, "no previous run state");
        return Ok(None);
    }
    let state = PreviousState::load(fs, path)
        .with_context(|| format!("reading run state {:?}", path))?;
    Ok(Some(Arc::new(state)))
}

/// Directory relative paths in the project file are resolved against.
///
/// - If the project path has a non-empty parent (e.g. "proj/Seedrun.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Seedrun.toml" (parent = ""),
///   we fall back to the current working directory "."
fn project_root_dir(project_path: &Path) -> PathBuf {
    match project_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Simple dry-run output: print settings and the selected seeds.
fn print_dry_run(
    project: &ProjectFile,
    options: &TaskOptions,
    nodes: &[Arc<ResourceNode>],
) {
    println!("seedrun dry-run");
    println!("  threads = {}", options.threads);
    println!("  fail_fast = {}", options.fail_fast);
    println!("  target_dir = {}", project.config.target_dir);
    println!();

    println!("selected seeds ({}):", nodes.len());
    for node in nodes {
        println!("  - {} ({})", node.unique_id, node.relation());
        if let Some(path) = &node.path {
            println!("      path: {}", path.display());
        }
        if !node.depends_on.is_empty() {
            println!("      after: {:?}", node.depends_on);
        }
    }

    debug!("dry-run complete (no execution)");
}
