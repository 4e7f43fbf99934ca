//! Report outdated or deprecated modules.
//!
//! Asks the toolchain for available updates (`go list -m -u -json all`),
//! which needs access to the module proxy.

use anyhow::{Result, anyhow};
use clap::Args;
use std::path::PathBuf;

use super::CliConfig;
use super::common::CommandContext;
use super::output;
use crate::modules::issues::{IssueKind, find_issues};

#[derive(Args, Debug)]
pub struct IssuesCommand {
    /// Kind of problem to report
    #[arg(long = "type", default_value = "outdated", value_parser = ["outdated", "deprecated"])]
    kind: String,

    /// Only report modules whose path starts with PREFIX
    #[arg(long, value_name = "PREFIX", default_value = "")]
    prefix: String,

    /// Output format
    #[arg(short, long, default_value = "table", value_parser = output::FORMATS)]
    format: String,

    /// Directory containing go.mod (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,
}

impl IssuesCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let kind = IssueKind::from_name(&self.kind)
            .ok_or_else(|| anyhow!("Unknown issue type: {}", self.kind))?;
        let ctx = CommandContext::load(config, self.dir.as_deref()).await?;

        let modules = ctx.source.load_module_updates().await?;
        let issues = find_issues(modules, kind, &self.prefix);
        output::print_issues(&issues, kind, &self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        issues: IssuesCommand,
    }

    #[test]
    fn test_type_defaults_to_outdated() {
        let cli = TestCli::parse_from(["v2b"]);
        assert_eq!(cli.issues.kind, "outdated");
        let cli = TestCli::parse_from(["v2b", "--type", "deprecated", "-f", "json"]);
        assert_eq!(cli.issues.kind, "deprecated");
        assert_eq!(cli.issues.format, "json");
    }

    #[test]
    fn test_rejects_unsupported_type() {
        assert!(TestCli::try_parse_from(["v2b", "--type", "security"]).is_err());
    }
}
