//! Move modules between released versions.
//!
//! # Examples
//!
//! ```bash
//! # Move a module to a given release
//! v2b version upgrade github.com/sirupsen/logrus v1.9.3
//!
//! # Go back to the release before the current one
//! v2b version rollback github.com/sirupsen/logrus
//!
//! # Show modules required at several versions and align each on the highest
//! v2b version resolve --dry-run
//! ```
//!
//! Every change runs `go get module@version` followed by `go mod tidy`.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

use super::CliConfig;
use super::common::CommandContext;
use crate::modules::version::{compare_versions, detect_conflicts, previous_version, validate_upgrade};

#[derive(Args, Debug)]
pub struct VersionCommand {
    #[command(subcommand)]
    command: VersionSubcommands,

    /// Directory containing go.mod (defaults to the current directory)
    #[arg(short, long, global = true, value_name = "DIR")]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum VersionSubcommands {
    /// Move a module to a specific released version
    Upgrade {
        /// Module path, e.g. github.com/acme/widgets
        module_path: String,

        /// Target version, e.g. v1.4.0
        version: String,
    },

    /// Move a module back to the release before its current one
    Rollback {
        /// Module path, e.g. github.com/acme/widgets
        module_path: String,
    },

    /// Align modules required at several versions on the highest one
    Resolve {
        /// Show the conflicts without changing go.mod
        #[arg(long)]
        dry_run: bool,
    },
}

impl VersionCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config, self.dir.as_deref()).await?;
        match self.command {
            VersionSubcommands::Upgrade {
                module_path,
                version,
            } => upgrade(&ctx, &module_path, &version).await,
            VersionSubcommands::Rollback {
                module_path,
            } => rollback(&ctx, &module_path).await,
            VersionSubcommands::Resolve {
                dry_run,
            } => resolve(&ctx, dry_run).await,
        }
    }
}

async fn upgrade(ctx: &CommandContext, module_path: &str, version: &str) -> Result<()> {
    let module = ctx.source.find_module(module_path).await?;
    if validate_upgrade(&module.version, version)? == Ordering::Less {
        warn!("{} is older than the current {}", version, module.version);
    }

    ctx.source.switch_version(module_path, version).await?;
    println!("{} {} {} -> {}", "✓".green(), module_path, module.version.dimmed(), version.yellow());
    Ok(())
}

async fn rollback(ctx: &CommandContext, module_path: &str) -> Result<()> {
    let module = ctx.source.find_module(module_path).await?;
    let history = ctx.source.version_history(module_path).await?;
    let previous = previous_version(module_path, &history, &module.version)?;

    ctx.source.switch_version(module_path, previous).await?;
    println!("{} {} {} -> {}", "✓".green(), module_path, module.version.dimmed(), previous.yellow());
    Ok(())
}

async fn resolve(ctx: &CommandContext, dry_run: bool) -> Result<()> {
    let graph = ctx.source.dependency_graph().await?;
    let conflicts = detect_conflicts(&graph);
    if conflicts.is_empty() {
        println!("{}", "No version conflicts found.".green());
        return Ok(());
    }

    let selected: HashMap<String, String> = ctx
        .load_records("")
        .await?
        .into_iter()
        .map(|record| (record.module_path, record.version))
        .collect();

    let mut changed = 0usize;
    for conflict in &conflicts {
        print!("{conflict}");
        let current = selected.get(&conflict.module_path).map_or("", String::as_str);
        let up_to_date = matches!(
            compare_versions(current, &conflict.selected),
            Ok(Ordering::Equal | Ordering::Greater)
        );
        if up_to_date {
            println!("  {} already selected", current.green());
            continue;
        }
        if dry_run {
            println!("  Would update to {}", conflict.selected.yellow());
            continue;
        }
        ctx.source.update_module(&conflict.module_path, &conflict.selected).await?;
        println!("  {} updated to {}", "✓".green(), conflict.selected.yellow());
        changed += 1;
    }

    if changed > 0 {
        ctx.source.tidy().await?;
    }
    Ok(())
}
