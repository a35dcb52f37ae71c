// tests/project_options.rs

use std::path::Path;

use clap::Parser;

use seedrun::cli::CliArgs;
use seedrun::config::ProjectFile;
use seedrun::engine::TaskOptions;
use seedrun::errors::SeedrunError;
use seedrun::fs::mock::MockFileSystem;
use seedrun::graph::{Manifest, ResourceGraph};
use seedrun::task_options;
use seedrun_test_utils::builders::{ProjectBuilder, ResourceConfigBuilder};

fn cli(extra: &[&str]) -> CliArgs {
    CliArgs::parse_from(std::iter::once("seedrun").chain(extra.iter().copied()))
}

#[test]
fn project_config_applies_without_flags() {
    let project = ProjectBuilder::new()
        .threads(3)
        .fail_fast(true)
        .with_seed("a")
        .build();

    assert_eq!(
        task_options(&cli(&[]), &project),
        TaskOptions {
            threads: 3,
            fail_fast: true,
            show: false,
        }
    );
}

#[test]
fn cli_flags_override_project_config() {
    let project = ProjectBuilder::new().threads(3).with_seed("a").build();

    let options = task_options(&cli(&["--threads", "8", "--fail-fast", "--show"]), &project);

    assert_eq!(options.threads, 8);
    assert!(options.fail_fast);
    assert!(options.show);
}

#[test]
fn fail_fast_defaults_to_off() {
    let project = ProjectBuilder::new().with_seed("a").build();
    let options = task_options(&cli(&[]), &project);

    assert_eq!(options, TaskOptions::default());
}

#[test]
fn zero_threads_on_the_cli_acts_as_one() {
    let project = ProjectBuilder::new().threads(4).with_seed("a").build();
    assert_eq!(task_options(&cli(&["--threads", "0"]), &project).threads, 1);
}

#[test]
fn self_dependency_fails_validation() {
    let raw = ProjectBuilder::new()
        .with_resource("a", ResourceConfigBuilder::seed().after("a").build())
        .build_raw();

    assert!(matches!(
        ProjectFile::try_from(raw),
        Err(SeedrunError::ConfigError(msg)) if msg.contains("itself")
    ));
}

#[test]
fn built_project_yields_manifest_and_graph() {
    let project = ProjectBuilder::new()
        .with_resource(
            "raw_orders",
            ResourceConfigBuilder::seed()
                .path("data/orders.csv")
                .alias("orders")
                .schema("staging")
                .build(),
        )
        .with_resource("report", ResourceConfigBuilder::model().after("raw_orders").build())
        .build();

    let fs = MockFileSystem::new();
    fs.add_file("proj/data/orders.csv", "id\n1\n");
    let manifest = Manifest::from_project(&project, Path::new("proj"), &fs);
    let graph = ResourceGraph::from_manifest(&manifest).unwrap();

    let seed = manifest.get("seed.raw_orders").unwrap();
    assert_eq!(seed.relation(), "staging.orders");
    assert_eq!(seed.path.as_deref(), Some(Path::new("proj/data/orders.csv")));
    assert_eq!(graph.topological_order(), ["seed.raw_orders", "model.report"]);
}
