//! Configuration for v2b.
//!
//! Two layers feed a run:
//!
//! - [`GlobalConfig`] - persistent user settings from `~/.v2b/config.toml`
//! - command-line flags, which override the file per invocation
//!
//! The per-run display rules are a
//! [`RunConfiguration`](crate::models::RunConfiguration) built by the CLI.

mod global;

pub use global::GlobalConfig;
