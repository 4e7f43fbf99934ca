//! Branch lookup against local repositories through the system git binary.

use std::sync::Arc;
use tempfile::TempDir;

use v2b_cli::core::V2bError;
use v2b_cli::git::GitBranchResolver;
use v2b_cli::models::{DependencyRecord, ResolutionOutcome, RunConfiguration};
use v2b_cli::resolver::{BranchClassifier, BranchResolver, WorkerPool, merge};
use v2b_cli::test_utils::{TestGit, pseudo_version};

struct Fixture {
    _temp: TempDir,
    repo: TestGit,
    main_sha: String,
    feature_sha: String,
    tagged_sha: String,
}

/// main: tagged commit, then head commit; feature/login branches off main.
fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let repo = TestGit::new(temp.path().join("widgets.repo"));
    repo.init().unwrap();

    let tagged_sha = repo.commit_file("README.md", "one").unwrap();
    repo.tag("v1.0.0").unwrap();
    let main_sha = repo.commit_file("README.md", "two").unwrap();

    repo.create_branch("feature/login").unwrap();
    let feature_sha = repo.commit_file("login.go", "package login").unwrap();
    repo.checkout("main").unwrap();

    Fixture {
        _temp: temp,
        repo,
        main_sha,
        feature_sha,
        tagged_sha,
    }
}

fn module_path(fixture: &Fixture) -> String {
    fixture.repo.repo_path().display().to_string()
}

#[tokio::test]
async fn test_resolves_branch_heads() {
    let fixture = fixture();
    let resolver = GitBranchResolver::new();
    let path = module_path(&fixture);

    let main = resolver.resolve_branch(&path, &fixture.main_sha[..12]).await.unwrap();
    assert_eq!(main, "main");

    let feature = resolver.resolve_branch(&path, &fixture.feature_sha[..12]).await.unwrap();
    assert_eq!(feature, "feature/login");
}

#[tokio::test]
async fn test_resolves_tag_when_no_branch_points_at_commit() {
    let fixture = fixture();
    let resolver = GitBranchResolver::new();

    let reference = resolver
        .resolve_branch(&module_path(&fixture), &fixture.tagged_sha[..12])
        .await
        .unwrap();
    assert_eq!(reference, "refs/tags/v1.0.0");
}

#[tokio::test]
async fn test_unknown_commit_is_branch_not_found() {
    let fixture = fixture();
    let err = GitBranchResolver::new()
        .resolve_branch(&module_path(&fixture), "0000000000ff")
        .await
        .unwrap_err();

    assert!(matches!(err.downcast_ref::<V2bError>(), Some(V2bError::BranchNotFound { .. })));
}

#[tokio::test]
async fn test_pool_classifies_local_repositories() {
    let fixture = fixture();
    let path = module_path(&fixture);
    let missing = fixture.repo.repo_path().with_file_name("missing.repo").display().to_string();

    let records = vec![
        DependencyRecord::new(1, path.clone(), pseudo_version(&fixture.feature_sha)),
        DependencyRecord::new(2, missing.clone(), pseudo_version(&fixture.main_sha)),
    ];
    let pool = WorkerPool::new(Arc::new(GitBranchResolver::new()), BranchClassifier::default())
        .with_workers(2);
    let buckets = pool.run(records).await.unwrap();

    let merged = merge(&buckets, &RunConfiguration::default());
    assert_eq!(merged.len(), 2);
    assert!(matches!(
        merged.get(&path),
        Some(ResolutionOutcome::Special { branch, .. }) if branch == "feature/login"
    ));
    assert!(merged.get(&missing).is_some_and(ResolutionOutcome::is_failed));
}

#[tokio::test]
async fn test_tagged_release_resolves_to_its_tag() {
    let fixture = fixture();
    let path = module_path(&fixture);

    let records = vec![DependencyRecord::new(1, path.clone(), "v1.0.0")];
    let pool = WorkerPool::new(Arc::new(GitBranchResolver::new()), BranchClassifier::default())
        .with_workers(1);
    let buckets = pool.run(records).await.unwrap();

    assert_eq!(buckets.failed.len(), 0);
    let merged = merge(&buckets, &RunConfiguration::default());
    assert!(matches!(
        merged.get(&path),
        Some(ResolutionOutcome::Special { branch, .. }) if branch == "refs/tags/v1.0.0"
    ));
}
