//! v2b - version to branch
//!
//! Go modules pinned to a commit carry a pseudo-version such as
//! `v0.0.0-20240105120000-0123456789ab` that says nothing about where the
//! commit came from. v2b lists a project's build list, looks up which branch,
//! tag or pull request each pinned commit belongs to, and flags the modules
//! that are pinned to anything other than a long-lived branch.
//!
//! # Architecture Overview
//!
//! ```text
//! go list -m -json all ──► DependencyRecord ──► WorkerPool ──► OutcomeBuckets ──► merge ──► output
//!     (modules)                                 │   ▲
//!                                               ▼   │
//!                                     git ls-remote (git)
//! ```
//!
//! A run is one batch: every record is dispatched to a fixed pool of workers,
//! each worker resolves and classifies one record at a time, and the run
//! completes once every record has produced its outcome. Failed lookups are
//! kept as outcomes and never abort the run.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface (`check`, `tidy`, `branch`, `update`, `list`,
//!   `version`, `dependency`, `issues`)
//! - [`config`] - User configuration (`~/.v2b/config.toml`)
//! - [`core`] - Error types and user-facing error formatting
//! - [`resolver`] - Dispatch queue, worker pool, classifier and result merge
//! - [`git`] - Branch lookup through the system `git` binary
//! - [`modules`] - Module listing, updates, version history and the module
//!   graph through the `go` command
//! - [`models`] - Records, outcomes and run configuration
//! - [`utils`] - Platform helpers and progress bars
//!
//! # Example
//!
//! ```bash
//! # Show every module with its branch
//! v2b
//!
//! # Only modules pinned to feature branches, skipping lookups that failed
//! v2b check --special --ignore-errors
//!
//! # Move every specially pinned module to the head of its branch
//! v2b tidy
//! ```
//!
//! # Logging
//!
//! Diagnostics go to stderr through `tracing`. `--verbose` enables debug
//! output and `RUST_LOG` selects targets directly, e.g. `RUST_LOG=git=debug`
//! for every git invocation or `RUST_LOG=pipeline=trace` for worker activity.

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod git;
pub mod models;
pub mod modules;
pub mod resolver;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
