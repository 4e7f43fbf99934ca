//! Point every module pinned to a special branch at that branch.
//!
//! `tidy` runs the same resolution as `check`, keeps only the special
//! outcomes and runs `go get module@branch` for each one, one at a time since
//! `go get` rewrites `go.mod`. Tags are fetched by tag name. References with
//! no `go get` form (pull requests, `HEAD`) are reported and left alone.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tracing::warn;

use super::CliConfig;
use super::common::CommandContext;
use crate::core::user_friendly_error;
use crate::models::RunConfiguration;
use crate::modules::version_query;
use crate::resolver::merge;

#[derive(Args, Debug)]
pub struct TidyCommand {
    /// Only consider modules whose path starts with PREFIX
    #[arg(long, value_name = "PREFIX", default_value = "")]
    prefix: String,

    /// Number of concurrent lookups (defaults to the configured value)
    #[arg(short, long, value_name = "NUMBER")]
    workers: Option<usize>,

    /// Show what would be updated without running `go get`
    #[arg(long)]
    dry_run: bool,

    /// Directory containing go.mod (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,
}

impl TidyCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config, self.dir.as_deref()).await?;
        let run = RunConfiguration {
            show_errors: false,
            special_only: true,
            path_prefix: self.prefix.clone(),
        };

        let records = ctx.load_records(&run.path_prefix).await?;
        let buckets = ctx.resolve(records, self.workers).await?;
        let merged = merge(&buckets, &run);

        if merged.is_empty() {
            println!("{}", "No modules pinned to special branches.".green());
            return Ok(());
        }

        let mut updated = 0usize;
        let mut failed = Vec::new();
        for outcome in merged.special() {
            let Some(branch) = outcome.branch() else {
                continue;
            };
            let module_path = outcome.module_path();

            let Some(query) = version_query(branch) else {
                warn!("Skipping {}: {} cannot be fetched with go get", module_path, branch);
                println!("{} {} ({})", "-".dimmed(), module_path, branch.dimmed());
                continue;
            };

            if self.dry_run {
                println!("Would update {} to {}", module_path, query.yellow());
                continue;
            }

            match ctx.source.update_module(module_path, query).await {
                Ok(()) => {
                    updated += 1;
                    println!("{} {} -> {}", "✓".green(), module_path, query.yellow());
                }
                Err(e) => {
                    println!("{} {}", "✗".red(), module_path);
                    user_friendly_error(e).display();
                    failed.push(module_path.to_string());
                }
            }
        }

        if !self.dry_run {
            println!("\nUpdated {updated} module(s)");
        }
        if !failed.is_empty() {
            bail!("Failed to update {} module(s): {}", failed.len(), failed.join(", "));
        }
        Ok(())
    }
}
