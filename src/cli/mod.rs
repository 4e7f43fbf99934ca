//! Command-line interface for v2b.
//!
//! # Commands
//!
//! - `check` - Resolve the branch behind every pinned module and display it (default)
//! - `tidy` - Point every module pinned to a special branch at that branch with `go get`
//! - `branch` - Point one module at a given branch
//! - `update` - Resolve one module by its listing id and point it at its branch
//! - `list` - List the module build list with ids
//! - `version` - Upgrade, roll back or align module versions
//! - `dependency` - Pin, unpin, explain and graph module requirements
//! - `issues` - Report outdated or deprecated modules
//!
//! # Global Options
//!
//! - `--verbose` / `--quiet` select the log level (`RUST_LOG` overrides both)
//! - `--config` selects a configuration file other than `~/.v2b/config.toml`
//! - `--no-progress` hides progress bars
//!
//! Global options are collected into a [`CliConfig`] that is handed to each
//! command explicitly; nothing is written to the process environment.

mod branch;
mod check;
pub mod common;
mod dependency;
mod issues;
mod list;
pub mod output;
mod tidy;
mod update;
mod version;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Global options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive derived from `--verbose` / `--quiet`
    pub log_level: Option<String>,

    /// Hide progress bars
    pub no_progress: bool,

    /// Configuration file passed with `--config`
    pub config_path: Option<String>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Installs the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `level`. Calling this more than once is
/// harmless.
pub fn init_logging(level: Option<&str>) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level.unwrap_or("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "v2b",
    about = "Find the git branch behind every pinned Go module",
    version,
    long_about = "v2b reads the module build list with 'go list', looks up which branch, tag or pull \
                  request each pseudo-version commit belongs to, and flags modules pinned to anything \
                  other than a long-lived branch."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<String>,

    /// Disable progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and display the branch of every module
    Check(check::CheckCommand),

    /// Update every module pinned to a special branch to that branch
    Tidy(tidy::TidyCommand),

    /// Update a module to a specific branch
    Branch(branch::BranchCommand),

    /// Resolve a module by id and update it to its branch
    Update(update::UpdateCommand),

    /// List modules with their ids
    List(list::ListCommand),

    /// Upgrade, roll back or align module versions
    Version(version::VersionCommand),

    /// Pin, unpin, explain or graph module dependencies
    Dependency(dependency::DependencyCommand),

    /// Report outdated or deprecated modules
    Issues(issues::IssuesCommand),
}

impl Cli {
    /// Builds the configuration and runs the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Collects the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            Some("warn,v2b_cli=info".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress || self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Runs the selected command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Some(Commands::Check(cmd)) => cmd.execute(&config).await,
            Some(Commands::Tidy(cmd)) => cmd.execute(&config).await,
            Some(Commands::Branch(cmd)) => cmd.execute(&config).await,
            Some(Commands::Update(cmd)) => cmd.execute(&config).await,
            Some(Commands::List(cmd)) => cmd.execute(&config).await,
            Some(Commands::Version(cmd)) => cmd.execute(&config).await,
            Some(Commands::Dependency(cmd)) => cmd.execute(&config).await,
            Some(Commands::Issues(cmd)) => cmd.execute(&config).await,
            None => check::CheckCommand::default().execute(&config).await,
        }
    }
}
