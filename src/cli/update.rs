//! Resolve one module by its listing id and point it at its branch.
//!
//! Ids are the numbers shown by `v2b list`. They are positions in the full
//! build list, so they do not change with `--prefix`.

use anyhow::{Result, anyhow};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;
use super::common::CommandContext;
use crate::modules::version_query;
use crate::resolver::BranchResolver;

#[derive(Args, Debug)]
pub struct UpdateCommand {
    /// Module id as shown by `v2b list`
    id: usize,

    /// Directory containing go.mod (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,
}

impl UpdateCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config, self.dir.as_deref()).await?;
        let record = ctx.source.find_by_id(self.id).await?;
        if record.is_skipped() {
            return Err(anyhow!(
                "Module {} ({}) has no pinned commit to resolve",
                self.id,
                record.module_path
            ));
        }

        let branch = ctx
            .resolver()
            .resolve_branch(&record.module_path, &record.commit_reference)
            .await?;
        let query = version_query(&branch).ok_or_else(|| {
            anyhow!("{} is pinned to {}, which go get cannot fetch", record.module_path, branch)
        })?;

        ctx.source.update_module(&record.module_path, query).await?;
        println!("{} {} -> {}", "✓".green(), record.module_path, query.yellow());
        Ok(())
    }
}
