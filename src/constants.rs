//! Global constants used throughout the v2b codebase.
//!
//! Timeouts, pool sizes and display strings that are shared across modules
//! live here so the numbers stay discoverable.

use std::time::Duration;

/// Default number of concurrent resolution workers.
///
/// Ten workers keep a handful of `git ls-remote` calls in flight without
/// tripping rate limits on the common hosting providers.
pub const DEFAULT_WORKER_COUNT: usize = 10;

/// Default timeout for a single `git ls-remote` call (60 seconds).
///
/// A timed out call surfaces as a failed resolution for that module only.
pub const GIT_LS_REMOTE_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for `go list -m -json all` (5 minutes).
///
/// Listing may download module metadata on a cold module cache.
pub const GO_LIST_TIMEOUT: Duration = Duration::from_secs(300);

/// Timeout for `go get module@branch` (5 minutes).
pub const GO_GET_TIMEOUT: Duration = Duration::from_secs(300);

/// Branch names treated as ordinary, long-lived branches by default.
pub const DEFAULT_ORDINARY_BRANCHES: &[&str] = &["main", "master", "develop", "development", "trunk"];

/// Placeholder shown in place of a branch name when resolution failed.
pub const NOT_FOUND_MESSAGE: &str = "Not-Found";

/// Reference namespace stripped from resolved branch heads.
pub const BRANCH_REF_PREFIX: &str = "refs/heads/";
