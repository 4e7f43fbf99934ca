//! Error handling for v2b
//!
//! This module provides the strongly-typed error enum used across the crate and the
//! user-friendly reporting layer used by the CLI. The error system follows two rules:
//! 1. **Strongly-typed errors** for precise handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`V2bError`] - Enumerated error types for every failure case in v2b
//! - [`ErrorContext`] - Wrapper that adds a suggestion and details for display
//!
//! Library code returns [`anyhow::Result`] and attaches a [`V2bError`] as the root
//! cause wherever a failure has a well-known shape. [`user_friendly_error`] downcasts
//! the chain back to the typed error when rendering it.
//!
//! # Examples
//!
//! ```rust,no_run
//! use v2b_cli::core::{V2bError, user_friendly_error};
//!
//! let error = anyhow::Error::from(V2bError::GitNotFound);
//! let ctx = user_friendly_error(error);
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for v2b operations
///
/// # Error Categories
///
/// ## External tools
/// - [`GitNotFound`] / [`GoNotFound`] - Required executable missing from PATH
/// - [`GitCommandError`] / [`GoCommandError`] - Command exited unsuccessfully or timed out
///
/// ## Resolution
/// - [`BranchNotFound`] - No reference points at the pinned commit
///
/// ## Module listing
/// - [`ModuleDecodeError`] - `go list` output could not be decoded
/// - [`ModuleNotFound`] - No module with the requested id
/// - [`InvalidVersion`] - Version argument is not a Go semantic version
///
/// ## Configuration
/// - [`ConfigError`] - Invalid configuration value or file
/// - [`TomlError`] - TOML parsing errors from [`toml::de::Error`]
///
/// [`GitNotFound`]: V2bError::GitNotFound
/// [`GoNotFound`]: V2bError::GoNotFound
/// [`GitCommandError`]: V2bError::GitCommandError
/// [`GoCommandError`]: V2bError::GoCommandError
/// [`BranchNotFound`]: V2bError::BranchNotFound
/// [`ModuleDecodeError`]: V2bError::ModuleDecodeError
/// [`ModuleNotFound`]: V2bError::ModuleNotFound
/// [`InvalidVersion`]: V2bError::InvalidVersion
/// [`ConfigError`]: V2bError::ConfigError
/// [`TomlError`]: V2bError::TomlError
#[derive(Error, Debug)]
pub enum V2bError {
    /// Git command returned a non-zero exit code or timed out
    ///
    /// # Fields
    /// - `operation`: The git operation that failed (e.g., "ls-remote")
    /// - `stderr`: The error output from the git command
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git operation that failed
        operation: String,
        /// The error output from the git command
        stderr: String,
    },

    /// Git executable not found in PATH
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// Go command returned a non-zero exit code or timed out
    #[error("Go operation failed: {operation}")]
    GoCommandError {
        /// The go operation that failed (e.g., "list", "get")
        operation: String,
        /// The error output from the go command
        stderr: String,
    },

    /// Go toolchain not found in PATH
    #[error("Go is not installed or not found in PATH")]
    GoNotFound,

    /// No reference in the module's repository points at the pinned commit
    #[error("No branch found for commit '{commit}' in {module}")]
    BranchNotFound {
        /// Module path that was queried
        module: String,
        /// Commit reference that was looked up
        commit: String,
    },

    /// The module listing produced by `go list` could not be decoded
    #[error("Failed to decode module listing: {reason}")]
    ModuleDecodeError {
        /// Decoder message
        reason: String,
    },

    /// A version argument or listed version is not a Go semantic version
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion {
        /// The rejected version
        version: String,
        /// Why it was rejected
        reason: String,
    },

    /// No module with the requested id exists in the listing
    #[error("Module with id {id} not found")]
    ModuleNotFound {
        /// The 1-based id that was requested
        id: usize,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for V2bError {
    fn clone(&self) -> Self {
        match self {
            Self::GitCommandError {
                operation,
                stderr,
            } => Self::GitCommandError {
                operation: operation.clone(),
                stderr: stderr.clone(),
            },
            Self::GitNotFound => Self::GitNotFound,
            Self::GoCommandError {
                operation,
                stderr,
            } => Self::GoCommandError {
                operation: operation.clone(),
                stderr: stderr.clone(),
            },
            Self::GoNotFound => Self::GoNotFound,
            Self::BranchNotFound {
                module,
                commit,
            } => Self::BranchNotFound {
                module: module.clone(),
                commit: commit.clone(),
            },
            Self::ModuleDecodeError {
                reason,
            } => Self::ModuleDecodeError {
                reason: reason.clone(),
            },
            Self::InvalidVersion {
                version,
                reason,
            } => Self::InvalidVersion {
                version: version.clone(),
                reason: reason.clone(),
            },
            Self::ModuleNotFound {
                id,
            } => Self::ModuleNotFound {
                id: *id,
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // Source errors are not Clone, keep their message
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error wrapper carrying a suggestion and details for terminal display
///
/// ```rust,no_run
/// use v2b_cli::core::{V2bError, ErrorContext};
///
/// let context = ErrorContext::new(V2bError::GoNotFound)
///     .with_suggestion("Install Go from https://go.dev/dl/")
///     .with_details("v2b reads the module graph with 'go list'");
///
/// println!("{}", context);
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: V2bError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details
    #[must_use]
    pub const fn new(error: V2bError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error, displayed in green
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error, displayed in yellow
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`V2bError`] anywhere in the chain, then [`std::io::Error`] and
/// [`toml::de::Error`]. Anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    if let Some(v2b_error) = error.chain().find_map(|cause| cause.downcast_ref::<V2bError>()) {
        return create_error_context(v2b_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(V2bError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check file ownership and permissions of the project directory");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(V2bError::Other {
                    message: format!("Not found: {io_error}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return create_error_context(V2bError::ConfigError {
            message: toml_error.to_string(),
        });
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(V2bError::Other {
        message,
    })
}

/// Map each [`V2bError`] variant to a tailored suggestion and details
fn create_error_context(error: V2bError) -> ErrorContext {
    match &error {
        V2bError::GitNotFound => ErrorContext::new(error)
            .with_suggestion("Install git from https://git-scm.com/ or your package manager (e.g., 'brew install git', 'apt install git')")
            .with_details("v2b queries module repositories with 'git ls-remote'"),

        V2bError::GitCommandError { stderr, .. } => {
            let details = if stderr.is_empty() {
                "Git operations fail on network issues, authentication problems or unknown repositories".to_string()
            } else {
                stderr.trim().to_string()
            };
            ErrorContext::new(error)
                .with_suggestion("Check your network connection and repository access. Try running the git command manually")
                .with_details(details)
        }

        V2bError::GoNotFound => ErrorContext::new(error)
            .with_suggestion("Install Go from https://go.dev/dl/ and make sure 'go' is in your PATH")
            .with_details("v2b reads the module graph with 'go list -m -json all'"),

        V2bError::GoCommandError { operation, stderr } => {
            let suggestion = if operation == "list" {
                "Run v2b from a directory containing go.mod, or pass --dir"
            } else {
                "Check that the module path and branch exist, then retry 'go get' manually"
            };
            let details = stderr.trim().to_string();
            let ctx = ErrorContext::new(error).with_suggestion(suggestion);
            if details.is_empty() { ctx } else { ctx.with_details(details) }
        }

        V2bError::BranchNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("The commit may only be reachable from a deleted branch. Run 'v2b check' to see every module")
            .with_details("No branch, tag or pull request reference currently points at the pinned commit"),

        V2bError::ModuleDecodeError { .. } => ErrorContext::new(error)
            .with_suggestion("Run 'go list -m -json all' manually and check its output")
            .with_details("v2b expects a stream of JSON objects with Path and Version fields"),

        V2bError::InvalidVersion { .. } => ErrorContext::new(error)
            .with_suggestion("Use a released version such as v1.4.0; 'go list -m -versions <module>' lists them"),

        V2bError::ModuleNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Run 'v2b list' to see module ids"),

        V2bError::ConfigError { .. } | V2bError::TomlError(_) => ErrorContext::new(error)
            .with_suggestion("Check the syntax of ~/.v2b/config.toml or the file passed with --config")
            .with_details("Supported keys: workers, git_timeout_secs, ordinary_branches"),

        _ => ErrorContext::new(error),
    }
}
