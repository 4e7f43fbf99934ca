//! Point one module at a branch with `go get module@branch`.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;
use super::common::CommandContext;

#[derive(Args, Debug)]
pub struct BranchCommand {
    /// Module path, e.g. github.com/acme/widgets
    module_path: String,

    /// Branch to point the module at
    branch_name: String,

    /// Directory containing go.mod (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,
}

impl BranchCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config, self.dir.as_deref()).await?;
        ctx.source.update_module(&self.module_path, &self.branch_name).await?;
        println!("{} {} -> {}", "✓".green(), self.module_path, self.branch_name.yellow());
        Ok(())
    }
}
