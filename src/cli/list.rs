//! List the module build list with the ids used by `v2b update`.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::CliConfig;
use super::common::CommandContext;
use super::output;
use crate::models::DependencyRecord;

#[derive(Args, Debug)]
pub struct ListCommand {
    /// Only list modules whose path starts with PREFIX
    #[arg(long, value_name = "PREFIX", default_value = "")]
    prefix: String,

    /// Sort order
    #[arg(long, default_value = "id", value_parser = ["id", "name", "version"])]
    sort: String,

    /// Output format
    #[arg(short, long, default_value = "table", value_parser = output::FORMATS)]
    format: String,

    /// Directory containing go.mod (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,
}

impl ListCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config, self.dir.as_deref()).await?;
        let mut records = ctx.load_records(&self.prefix).await?;
        sort_records(&mut records, &self.sort);
        output::print_modules(&records, &self.format)
    }
}

fn sort_records(records: &mut [DependencyRecord], sort: &str) {
    match sort {
        "name" => records.sort_by(|a, b| a.module_path.cmp(&b.module_path)),
        "version" => records.sort_by(|a, b| {
            a.version.cmp(&b.version).then_with(|| a.module_path.cmp(&b.module_path))
        }),
        _ => records.sort_by_key(|record| record.id),
    }
}
