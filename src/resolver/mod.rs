//! Concurrent branch resolution.
//!
//! Turns a batch of [`DependencyRecord`](crate::models::DependencyRecord)s into
//! categorized outcomes. The pieces, leaves first:
//!
//! - [`BranchResolver`] - capability that maps a module path and commit to the
//!   reference pointing at it. [`GitBranchResolver`](crate::git::GitBranchResolver)
//!   is the production implementation; tests plug in in-memory resolvers.
//! - [`classifier`] - pure rule deciding whether a branch name is special.
//! - [`queue`] - bounded dispatch queue drained by the workers.
//! - [`tracker`] - completion counter the pool waits on.
//! - [`worker_pool`] - fixed-size pool running resolve-then-classify per record.
//! - [`aggregator`] - concurrent outcome buckets and the merge into one listing.
//!
//! # Data flow
//!
//! ```text
//! records → DispatchQueue → N workers → resolver + classifier
//!         → OutcomeBuckets {ordinary, special, failed} → merge → MergedResults
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use v2b_cli::git::GitBranchResolver;
//! use v2b_cli::models::{DependencyRecord, RunConfiguration};
//! use v2b_cli::resolver::{BranchClassifier, WorkerPool, merge};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let records = vec![
//!     DependencyRecord::new(1, "github.com/acme/widgets", "v0.0.0-20240101000000-0123456789ab"),
//! ];
//! let pool = WorkerPool::new(Arc::new(GitBranchResolver::new()), BranchClassifier::default());
//! let buckets = pool.run(records).await?;
//!
//! for outcome in merge(&buckets, &RunConfiguration::default()).iter() {
//!     println!("{} -> {:?}", outcome.module_path(), outcome.branch());
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod classifier;
pub mod queue;
pub mod tracker;
pub mod worker_pool;

use anyhow::Result;
use std::future::Future;

pub use aggregator::{MergedResults, OutcomeBuckets, OutcomeCollection, merge};
pub use classifier::BranchClassifier;
pub use worker_pool::{WorkerPool, process_record};

/// Finds the branch or reference that points at a commit.
///
/// Implementations are called concurrently from every worker with
/// independent arguments.
pub trait BranchResolver: Send + Sync {
    /// Returns the name of the reference in `module_path`'s repository whose
    /// commit starts with `commit`.
    ///
    /// # Errors
    ///
    /// Fails when no reference matches or the repository cannot be queried.
    fn resolve_branch(
        &self,
        module_path: &str,
        commit: &str,
    ) -> impl Future<Output = Result<String>> + Send;
}
