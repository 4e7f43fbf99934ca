//! User configuration file.
//!
//! Settings live in `~/.v2b/config.toml` (`%LOCALAPPDATA%\v2b\config.toml` on
//! Windows). Every key is optional; a missing file means defaults.
//!
//! ```toml
//! # Number of concurrent branch lookups
//! workers = 10
//!
//! # Seconds before a single `git ls-remote` is abandoned
//! git_timeout_secs = 60
//!
//! # Branch names that are not reported as special
//! ordinary_branches = ["main", "master", "develop"]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::constants::{DEFAULT_ORDINARY_BRANCHES, DEFAULT_WORKER_COUNT, GIT_LS_REMOTE_TIMEOUT};
use crate::core::V2bError;
use crate::resolver::BranchClassifier;
use crate::utils::platform::resolve_path;

const fn default_workers() -> usize {
    DEFAULT_WORKER_COUNT
}

const fn default_git_timeout_secs() -> u64 {
    GIT_LS_REMOTE_TIMEOUT.as_secs()
}

fn default_ordinary_branches() -> Vec<String> {
    DEFAULT_ORDINARY_BRANCHES.iter().map(ToString::to_string).collect()
}

/// Global configuration for v2b.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Number of concurrent resolution workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Timeout for one `git ls-remote` call, in seconds
    #[serde(default = "default_git_timeout_secs")]
    pub git_timeout_secs: u64,

    /// Branch names classified as ordinary; everything else is special
    #[serde(default = "default_ordinary_branches")]
    pub ordinary_branches: Vec<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            git_timeout_secs: default_git_timeout_secs(),
            ordinary_branches: default_ordinary_branches(),
        }
    }
}

impl GlobalConfig {
    /// Loads from `path` when given (with `~` and `$VAR` expansion), otherwise
    /// from the default location. A missing file yields defaults.
    pub async fn load_with_optional(path: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(path) => resolve_path(path)?,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Loads and validates the configuration at `path`.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .map_err(V2bError::from)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Default config file location.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("v2b")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".v2b")
        };

        Ok(config_dir.join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(V2bError::ConfigError {
                message: "workers must be at least 1".to_string(),
            }
            .into());
        }
        if self.git_timeout_secs == 0 {
            return Err(V2bError::ConfigError {
                message: "git_timeout_secs must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub const fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.git_timeout_secs)
    }

    /// Classifier built from `ordinary_branches`.
    pub fn classifier(&self) -> BranchClassifier {
        BranchClassifier::new(self.ordinary_branches.iter().cloned())
    }
}
