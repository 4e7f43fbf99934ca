//! Resolve and display the branch behind every pinned module.
//!
//! This is the default command. Every module in the build list whose path
//! matches `--prefix` is handed to the worker pool; the merged outcomes are
//! printed sorted by module path.
//!
//! # Examples
//!
//! ```bash
//! # Everything, failures included
//! v2b check
//!
//! # Only modules pinned to feature branches, tags or pull requests
//! v2b check --special --ignore-errors
//!
//! # One organisation, as JSON, with 20 concurrent lookups
//! v2b check --prefix github.com/acme --workers 20 --format json
//! ```

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use super::CliConfig;
use super::common::CommandContext;
use super::output::{self, Summary};
use crate::models::RunConfiguration;
use crate::resolver::merge;

#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Hide modules whose branch could not be found
    #[arg(long)]
    ignore_errors: bool,

    /// Only show modules pinned to a special branch
    #[arg(long)]
    special: bool,

    /// Only check modules whose path starts with PREFIX
    #[arg(long, value_name = "PREFIX", default_value = "")]
    prefix: String,

    /// Number of concurrent lookups (defaults to the configured value)
    #[arg(short, long, value_name = "NUMBER")]
    workers: Option<usize>,

    /// Output format
    #[arg(short, long, default_value = "table", value_parser = output::FORMATS)]
    format: String,

    /// Directory containing go.mod (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,
}

impl Default for CheckCommand {
    fn default() -> Self {
        Self {
            ignore_errors: false,
            special: false,
            prefix: String::new(),
            workers: None,
            format: "table".to_string(),
            dir: None,
        }
    }
}

impl CheckCommand {
    fn run_configuration(&self) -> RunConfiguration {
        RunConfiguration {
            show_errors: !self.ignore_errors,
            special_only: self.special,
            path_prefix: self.prefix.clone(),
        }
    }

    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config, self.dir.as_deref()).await?;
        let run = self.run_configuration();

        let records = ctx.load_records(&run.path_prefix).await?;
        info!("Checking {} modules", records.len());

        let buckets = ctx.resolve(records, self.workers).await?;
        let merged = merge(&buckets, &run);
        output::print_outcomes(&merged, Summary::from_buckets(&buckets), &self.format)
    }
}
