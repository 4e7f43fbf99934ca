//! Worker pool runs with in-memory resolvers.

use std::sync::Arc;
use std::time::Duration;

use v2b_cli::models::{DependencyRecord, ResolutionOutcome, RunConfiguration};
use v2b_cli::resolver::{BranchClassifier, OutcomeBuckets, WorkerPool, merge};
use v2b_cli::test_utils::{StaticResolver, init_test_logging, records};

fn pool(resolver: StaticResolver, workers: usize) -> WorkerPool<StaticResolver> {
    WorkerPool::new(Arc::new(resolver), BranchClassifier::default()).with_workers(workers)
}

const ORDINARY_CYCLE: [&str; 4] = ["main", "master", "develop", "trunk"];

#[tokio::test]
async fn test_hundred_records_ten_workers_all_ordinary() {
    init_test_logging(None);
    let batch = records(100);
    let table: Vec<(String, &str)> = batch
        .iter()
        .enumerate()
        .map(|(i, record)| (record.module_path.clone(), ORDINARY_CYCLE[i % ORDINARY_CYCLE.len()]))
        .collect();
    let resolver = StaticResolver::by_module(table.iter().map(|(path, branch)| (path.as_str(), *branch)));

    let buckets = pool(resolver, 10).run(batch).await.unwrap();

    assert_eq!(buckets.ordinary.len(), 100);
    assert!(buckets.special.is_empty());
    assert!(buckets.failed.is_empty());

    let merged = merge(&buckets, &RunConfiguration::default());
    assert_eq!(merged.len(), 100);
    for outcome in merged.iter() {
        let index: usize = outcome.module_path().trim_start_matches("github.com/x/m").parse().unwrap();
        assert_eq!(outcome.branch(), Some(ORDINARY_CYCLE[index % ORDINARY_CYCLE.len()]), "{}", outcome.module_path());
    }
}

#[tokio::test]
async fn test_every_resolvable_record_yields_one_outcome() {
    let mut batch = records(20);
    batch.push(DependencyRecord::new(21, "example/app", "v1.0.0"));
    batch.push(DependencyRecord::new(22, "github.com/x/empty", ""));

    let resolver = Arc::new(StaticResolver::always("develop"));
    let pool = WorkerPool::new(Arc::clone(&resolver), BranchClassifier::default()).with_workers(4);
    let buckets = pool.run(batch).await.unwrap();

    assert_eq!(buckets.total(), 20);
    assert!(!buckets.ordinary.contains("example/app"));
    assert!(!buckets.ordinary.contains("github.com/x/empty"));
    assert_eq!(resolver.calls().len(), 20);
}

#[tokio::test]
async fn test_resolver_receives_commit_reference() {
    let resolver = Arc::new(StaticResolver::always("main"));
    let pool = WorkerPool::new(Arc::clone(&resolver), BranchClassifier::default());
    pool.run(vec![DependencyRecord::new(1, "github.com/x/a", "v1.0.0-abc123")]).await.unwrap();

    assert_eq!(resolver.calls(), vec![("github.com/x/a".to_string(), "abc123".to_string())]);
}

#[tokio::test]
async fn test_special_only_without_errors() {
    let resolver = StaticResolver::by_module([
        ("github.com/x/m0", "main"),
        ("github.com/x/m1", "feature/login"),
        ("github.com/x/m2", "master"),
        ("github.com/x/m3", "release/1.2"),
    ]);
    let buckets = pool(resolver, 3).run(records(6)).await.unwrap();
    assert_eq!(buckets.failed.len(), 2);

    let merged = merge(
        &buckets,
        &RunConfiguration {
            show_errors: false,
            special_only: true,
            path_prefix: String::new(),
        },
    );
    let paths: Vec<&str> = merged.iter().map(ResolutionOutcome::module_path).collect();
    assert_eq!(paths, vec!["github.com/x/m1", "github.com/x/m3"]);
}

#[tokio::test]
async fn test_failures_listed_when_errors_shown() {
    let buckets = pool(StaticResolver::failing(), 2).run(records(3)).await.unwrap();
    assert_eq!(buckets.failed.len(), 3);

    let shown = merge(&buckets, &RunConfiguration::default());
    assert_eq!(shown.len(), 3);
    assert!(shown.iter().all(ResolutionOutcome::is_failed));

    let hidden = merge(
        &buckets,
        &RunConfiguration {
            show_errors: false,
            ..RunConfiguration::default()
        },
    );
    assert!(hidden.is_empty());
}

#[tokio::test]
async fn test_merged_output_sorted_by_module_path() {
    let resolver = StaticResolver::by_module([
        ("github.com/x/m0", "feature/z"),
        ("github.com/x/m1", "main"),
    ]);
    let mut batch = records(2);
    batch.reverse();
    batch.push(DependencyRecord::new(3, "cloud.google.com/go", "v0.0.0-20240101000000-ffffffffffff"));

    let buckets = pool(resolver, 2).run(batch).await.unwrap();
    let merged = merge(&buckets, &RunConfiguration::default());
    let paths: Vec<&str> = merged.iter().map(ResolutionOutcome::module_path).collect();
    assert_eq!(paths, vec!["cloud.google.com/go", "github.com/x/m0", "github.com/x/m1"]);
}

#[test]
fn test_later_category_overwrites_earlier() {
    let buckets = OutcomeBuckets::new();
    buckets.record(ResolutionOutcome::Failed {
        module_path: "github.com/x/a".to_string(),
        version: "v1".to_string(),
        reason: "timeout".to_string(),
    });
    buckets.record(ResolutionOutcome::Special {
        module_path: "github.com/x/a".to_string(),
        version: "v1".to_string(),
        branch: "feature/a".to_string(),
    });
    buckets.record(ResolutionOutcome::Ordinary {
        module_path: "github.com/x/a".to_string(),
        version: "v1".to_string(),
        branch: "main".to_string(),
    });

    let merged = merge(&buckets, &RunConfiguration::default());
    assert_eq!(merged.len(), 1);
    assert_eq!(merged.get("github.com/x/a").and_then(ResolutionOutcome::branch), Some("main"));

    let special_only = merge(
        &buckets,
        &RunConfiguration {
            special_only: true,
            ..RunConfiguration::default()
        },
    );
    assert_eq!(special_only.get("github.com/x/a").and_then(ResolutionOutcome::branch), Some("feature/a"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_bounded_by_worker_count() {
    let resolver = Arc::new(StaticResolver::always("main").with_delay(Duration::from_millis(20)));
    let pool = WorkerPool::new(Arc::clone(&resolver), BranchClassifier::default()).with_workers(5);

    let buckets = pool.run(records(40)).await.unwrap();
    assert_eq!(buckets.ordinary.len(), 40);
    assert!(resolver.peak_in_flight() <= 5);
    assert!(resolver.peak_in_flight() > 1);
}

#[tokio::test]
async fn test_runs_do_not_share_results() {
    let pool = pool(StaticResolver::always("main"), 3);
    let first = pool.run(records(5)).await.unwrap();
    let second = pool.run(records(2)).await.unwrap();

    assert_eq!(first.total(), 5);
    assert_eq!(second.total(), 2);
}

#[tokio::test]
async fn test_more_workers_than_records() {
    let buckets = pool(StaticResolver::always("trunk"), 32).run(records(3)).await.unwrap();
    assert_eq!(buckets.ordinary.len(), 3);
}
