// tests/property_failures.rs

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;

use seedrun::engine::{SeedTask, TaskOptions};
use seedrun::events::mock::MemorySink;
use seedrun::graph::{SelectionCriteria, select};
use seedrun::types::{NodeStatus, ResourceType};
use seedrun_test_utils::builders::GraphBuilder;
use seedrun_test_utils::fake_adapter::FakeAdapter;

fn seed_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("seed_{i:02}")).collect()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn k_of_n_failures_without_fail_fast(
        n in 1usize..12,
        mask in proptest::collection::vec(any::<bool>(), 12),
        threads in 1usize..4,
    ) {
        let names = seed_names(n);
        let failing: BTreeSet<usize> = (0..n).filter(|&i| mask[i]).collect();

        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut adapter = FakeAdapter::new();
        for &i in &failing {
            adapter = adapter.raise(&names[i], "boom");
        }

        let (graph, manifest) = GraphBuilder::seeds(&refs).build();
        let task = SeedTask::new(
            Some(graph),
            Some(manifest),
            Arc::new(adapter.clone()),
            Arc::new(MemorySink::new()),
            TaskOptions { threads, ..TaskOptions::default() },
        );
        let summary = runtime().block_on(task.run()).unwrap();

        prop_assert_eq!(summary.len(), n);
        prop_assert_eq!(summary.counts().error, failing.len());
        prop_assert_eq!(adapter.sessions_opened(), n);
        for (i, result) in summary.results().iter().enumerate() {
            let expected = if failing.contains(&i) { NodeStatus::Error } else { NodeStatus::Success };
            prop_assert_eq!(result.status, expected);
            prop_assert_eq!(&result.node.name, &names[i]);
        }
    }

    #[test]
    fn fail_fast_never_starts_work_after_an_error(
        n in 1usize..10,
        first_failure in 0usize..10,
    ) {
        let names = seed_names(n);
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let first_failure = first_failure % n;
        let adapter = FakeAdapter::new().raise(&names[first_failure], "boom");

        let (graph, manifest) = GraphBuilder::seeds(&refs).build();
        let task = SeedTask::new(
            Some(graph),
            Some(manifest),
            Arc::new(adapter.clone()),
            Arc::new(MemorySink::new()),
            TaskOptions { threads: 1, fail_fast: true, show: false },
        );
        let summary = runtime().block_on(task.run()).unwrap();

        prop_assert_eq!(summary.len(), n);
        prop_assert_eq!(adapter.executed().len(), first_failure + 1);
        for (i, result) in summary.results().iter().enumerate() {
            let expected = match i.cmp(&first_failure) {
                std::cmp::Ordering::Less => NodeStatus::Success,
                std::cmp::Ordering::Equal => NodeStatus::Error,
                std::cmp::Ordering::Greater => NodeStatus::Skipped,
            };
            prop_assert_eq!(result.status, expected);
        }
    }

    #[test]
    fn selection_returns_exactly_the_matching_nodes(
        seeds in 0usize..8,
        models in 0usize..8,
    ) {
        let mut builder = GraphBuilder::new();
        for i in 0..seeds {
            builder = builder.seed(&format!("s{i}"));
        }
        for i in 0..models {
            builder = builder.model(&format!("m{i}"));
        }
        let (graph, manifest) = builder.build();

        let criteria = SelectionCriteria::for_types([ResourceType::Seed]);
        let nodes = select(Some(graph.as_ref()), Some(manifest.as_ref()), &criteria).unwrap();

        prop_assert_eq!(nodes.len(), seeds);
        prop_assert!(nodes.iter().all(|n| n.resource_type == ResourceType::Seed));
    }
}
