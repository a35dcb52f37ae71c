// tests/end_to_end.rs

use std::fs;
use std::path::Path;

use clap::Parser;
use tempfile::TempDir;

use seedrun::cli::CliArgs;
use seedrun::graph::PreviousState;
use seedrun::fs::RealFileSystem;
use seedrun::types::NodeStatus;
use seedrun_test_utils::{init_tracing, with_timeout};

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn project() -> TempDir {
    project_with_config("threads = 2")
}

fn project_with_config(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let contents = format!("[config]\n{config}\n{RESOURCES}");
    write(dir.path(), "Seedrun.toml", &contents);
    write(dir.path(), "seeds/customers.csv", "id,name\n1,ann\n2,bo\n");
    write(dir.path(), "seeds/orders.csv", "id,customer_id\n10,1\n11,2\n12,1\n");
    write(dir.path(), "data/countries.csv", "code\nNO\nSE\n");
    dir
}

const RESOURCES: &str = r#"

[resource.customers]

[resource.orders]
alias = "raw_orders"
after = ["customers"]

[resource.countries]
path = "data/countries.csv"
schema = "ref"

[resource.report]
type = "model"
after = ["orders"]
"#;

fn args(dir: &TempDir, extra: &[&str]) -> CliArgs {
    let project = dir.path().join("Seedrun.toml");
    let mut argv = vec![
        "seedrun".to_string(),
        "--project".to_string(),
        project.to_string_lossy().into_owned(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    CliArgs::parse_from(argv)
}

#[tokio::test]
async fn loads_every_seed_and_records_state() {
    init_tracing();
    let dir = project();

    let summary = with_timeout(seedrun::run(args(&dir, &[]))).await.unwrap();

    assert!(summary.success());
    let ids: Vec<_> = summary.results().iter().map(|r| r.node.unique_id.as_str()).collect();
    assert_eq!(ids, vec!["seed.countries", "seed.customers", "seed.orders"]);
    assert_eq!(summary.results()[2].message, "INSERT 3");

    let target = dir.path().join("target");
    assert_eq!(
        fs::read_to_string(target.join("main/raw_orders.csv")).unwrap(),
        "id,customer_id\n10,1\n11,2\n12,1\n"
    );
    assert!(target.join("ref/countries.csv").is_file());

    let state = PreviousState::load(&RealFileSystem, &target.join("seedrun_state.toml")).unwrap();
    assert_eq!(state.checksums.len(), 3);
}

#[tokio::test]
async fn modified_only_reruns_changed_seeds() {
    init_tracing();
    let dir = project();
    with_timeout(seedrun::run(args(&dir, &[]))).await.unwrap();

    let unchanged = with_timeout(seedrun::run(args(&dir, &["--modified"])))
        .await
        .unwrap();
    assert!(unchanged.is_empty());
    assert_eq!(unchanged.exit_code(), 0);

    write(dir.path(), "seeds/customers.csv", "id,name\n1,ann\n2,bo\n3,cy\n");
    let changed = with_timeout(seedrun::run(args(&dir, &["--modified"])))
        .await
        .unwrap();
    let ids: Vec<_> = changed.results().iter().map(|r| r.node.unique_id.as_str()).collect();
    assert_eq!(ids, vec!["seed.customers"]);
    assert_eq!(changed.results()[0].message, "INSERT 3");
}

#[tokio::test]
async fn missing_seed_file_fails_the_run() {
    init_tracing();
    let dir = project();
    fs::remove_file(dir.path().join("seeds/customers.csv")).unwrap();

    let summary = with_timeout(seedrun::run(args(&dir, &[]))).await.unwrap();

    // orders depends on customers but is still attempted.
    let statuses: Vec<_> = summary.results().iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![NodeStatus::Success, NodeStatus::Error, NodeStatus::Success]
    );
    assert_eq!(summary.exit_code(), 1);
}

#[tokio::test]
async fn fail_fast_from_project_file_skips_the_rest() {
    init_tracing();
    let dir = project_with_config("threads = 1\nfail_fast = true");
    fs::remove_file(dir.path().join("seeds/customers.csv")).unwrap();

    let summary = with_timeout(seedrun::run(args(&dir, &[]))).await.unwrap();

    let statuses: Vec<_> = summary.results().iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![NodeStatus::Success, NodeStatus::Error, NodeStatus::Skipped]
    );
    assert_eq!(summary.results()[2].message, "skipped due to fail-fast");
    assert!(!dir.path().join("target/main/raw_orders.csv").exists());
}

#[tokio::test]
async fn dry_run_loads_nothing() {
    init_tracing();
    let dir = project();

    let summary = with_timeout(seedrun::run(args(&dir, &["--dry-run", "--select", "orders"])))
        .await
        .unwrap();

    assert!(summary.is_empty());
    assert!(!dir.path().join("target").exists());
}
