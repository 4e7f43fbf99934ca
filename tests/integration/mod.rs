//! Integration test suite for v2b
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **pipeline**: Worker pool and merge behaviour with in-memory resolvers
//! - **git_resolver**: Branch lookup against local git repositories
//! - **cli**: Argument handling and error reporting of the `v2b` binary
//! - **end_to_end**: Full commands against a stand-in `go` executable (Unix only)

mod cli;
#[cfg(unix)]
mod end_to_end;
mod git_resolver;
mod pipeline;
