//! Helpers shared by the CLI commands.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

use super::CliConfig;
use crate::config::GlobalConfig;
use crate::git::{GitBranchResolver, is_git_installed};
use crate::models::DependencyRecord;
use crate::modules::GoModuleSource;
use crate::resolver::{OutcomeBuckets, WorkerPool};
use crate::utils::progress::ProgressBar;

/// Everything a command needs before it touches the module source.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// User settings, already validated
    pub global: GlobalConfig,
    /// Module source for the selected project directory
    pub source: GoModuleSource,
    /// Hide progress bars
    pub no_progress: bool,
}

impl CommandContext {
    /// Loads the user configuration and binds the module source to `dir`
    /// (the current directory when `None`).
    pub async fn load(config: &CliConfig, dir: Option<&Path>) -> Result<Self> {
        let global = GlobalConfig::load_with_optional(config.config_path.as_deref()).await?;
        let source = match dir {
            Some(dir) => GoModuleSource::in_dir(dir),
            None => GoModuleSource::new(),
        };
        Ok(Self {
            global,
            source,
            no_progress: config.no_progress,
        })
    }

    /// Lists the build list filtered by `prefix`, with a spinner while `go list` runs.
    pub async fn load_records(&self, prefix: &str) -> Result<Vec<DependencyRecord>> {
        let spinner = ProgressBar::new_spinner(self.no_progress);
        spinner.set_message("Listing modules");
        let records = self.source.load_records(prefix).await;
        spinner.finish_and_clear();
        records
    }

    /// Git resolver honouring the configured timeout.
    pub fn resolver(&self) -> GitBranchResolver {
        GitBranchResolver::new().with_timeout(self.global.git_timeout())
    }

    /// Runs the worker pool over `records` with `workers` (or the configured
    /// count) and returns the filled buckets.
    ///
    /// A missing git binary does not stop the run: every lookup fails and
    /// lands in the failed bucket.
    pub async fn resolve(
        &self,
        records: Vec<DependencyRecord>,
        workers: Option<usize>,
    ) -> Result<Arc<OutcomeBuckets>> {
        if records.iter().any(|record| !record.is_skipped()) && !is_git_installed().await {
            warn!("git is not installed or not in PATH; no branch can be resolved");
        }

        let progress = ProgressBar::new(records.len() as u64, self.no_progress);
        progress.set_message("Resolving branches");

        let pool = WorkerPool::new(Arc::new(self.resolver()), self.global.classifier())
            .with_workers(workers.unwrap_or(self.global.workers))
            .with_progress(progress.clone());
        let buckets = pool.run(records).await;

        progress.finish_and_clear();
        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_reads_config_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        tokio::fs::write(&path, "workers = 2\ngit_timeout_secs = 5\n").await.unwrap();

        let config = CliConfig {
            config_path: Some(path.display().to_string()),
            no_progress: true,
            ..CliConfig::default()
        };
        let ctx = CommandContext::load(&config, Some(temp.path())).await.unwrap();
        assert_eq!(ctx.global.workers, 2);
        assert_eq!(ctx.resolver().timeout().as_secs(), 5);
        assert!(ctx.no_progress);
    }

    #[tokio::test]
    async fn test_resolve_only_skipped_records() {
        let temp = TempDir::new().unwrap();
        let config = CliConfig {
            config_path: Some(temp.path().join("none.toml").display().to_string()),
            no_progress: true,
            ..CliConfig::default()
        };
        let ctx = CommandContext::load(&config, None).await.unwrap();

        let records = vec![
            DependencyRecord::new(1, "example/app", "v1.0.0"),
            DependencyRecord::new(2, "github.com/x/a", ""),
        ];
        let buckets = ctx.resolve(records, Some(2)).await.unwrap();
        assert_eq!(buckets.total(), 0);
    }
}
