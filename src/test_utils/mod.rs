//! Test utilities for v2b
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration tests under `tests/`.
//!
//! - [`StaticResolver`] answers branch lookups from memory and records calls
//! - [`records`] builds batches of resolvable records
//! - [`TestGit`] creates local repositories for tests against real git
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use v2b_cli::resolver::{BranchClassifier, WorkerPool};
//! use v2b_cli::test_utils::{StaticResolver, records};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = WorkerPool::new(Arc::new(StaticResolver::always("main")), BranchClassifier::default());
//! let buckets = pool.run(records(10)).await?;
//! assert_eq!(buckets.ordinary.len(), 10);
//! # Ok(())
//! # }
//! ```

pub mod git_helper;
pub mod resolver;

pub use git_helper::{TestGit, pseudo_version};
pub use resolver::{StaticResolver, records};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=pipeline=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
