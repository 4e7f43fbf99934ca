//! Go module listing and updates.
//!
//! [`GoModuleSource`] is the module source of a run: it asks the Go toolchain
//! for the build list (`go list -m -json all`), decodes the stream of JSON
//! objects it prints and turns every module into a
//! [`DependencyRecord`]. Ids are 1-based positions in the full listing and
//! are assigned before the prefix filter, so a module keeps its id whatever
//! prefix is used.
//!
//! The same source applies changes to `go.mod`: `go get module@query` to move
//! a module, `go mod edit` to pin and unpin it, `go mod tidy` afterwards. It
//! also answers graph queries (`go mod graph`, `go mod why -m`) and lists
//! available updates and deprecations. Commands that change `go.mod` are run
//! one at a time.

pub mod command;
pub mod graph;
pub mod issues;
pub mod version;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants::{GO_GET_TIMEOUT, GO_LIST_TIMEOUT};
use crate::core::V2bError;
use crate::models::DependencyRecord;
use command::GoCommand;
use graph::{DependencyGraph, ModuleExplanation, parse_graph, parse_why};
use version::parse_version_history;

/// One entry of `go list -m -json` output. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GoModule {
    pub path: String,
    #[serde(default)]
    pub version: String,
    /// Set on the main module, which has no version
    #[serde(default)]
    pub main: bool,
    #[serde(default)]
    pub indirect: bool,
    /// Newest available release, only filled by `go list -m -u`
    #[serde(default)]
    pub update: Option<ModuleUpdate>,
    /// Deprecation message, only filled by `go list -m -u`
    #[serde(default)]
    pub deprecated: Option<String>,
}

/// `Update` object of `go list -m -u -json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModuleUpdate {
    #[serde(default)]
    pub version: String,
}

/// Decodes the concatenated JSON objects printed by `go list -m -json`.
///
/// Empty output is an empty listing.
///
/// # Errors
///
/// Returns [`V2bError::ModuleDecodeError`] on malformed input.
pub fn parse_module_listing(output: &str) -> Result<Vec<GoModule>> {
    serde_json::Deserializer::from_str(output)
        .into_iter::<GoModule>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            V2bError::ModuleDecodeError {
                reason: e.to_string(),
            }
            .into()
        })
}

/// Converts a listing to records, numbering from 1 and keeping modules whose
/// path starts with `prefix`.
pub fn to_records(modules: Vec<GoModule>, prefix: &str) -> Vec<DependencyRecord> {
    modules
        .into_iter()
        .enumerate()
        .filter(|(_, module)| module.path.starts_with(prefix))
        .map(|(index, module)| {
            DependencyRecord::new(index + 1, module.path, module.version)
                .with_indirect(module.indirect)
        })
        .collect()
}

/// Version query that `go get` accepts for a resolved reference.
///
/// Branch names pass through and tags lose their `refs/tags/` prefix. Other
/// namespaces (pull requests, `HEAD`) have no `go get` form and yield `None`.
///
/// ```rust
/// use v2b_cli::modules::version_query;
///
/// assert_eq!(version_query("feature/login"), Some("feature/login"));
/// assert_eq!(version_query("refs/tags/v1.2.0"), Some("v1.2.0"));
/// assert_eq!(version_query("refs/pull/17/head"), None);
/// ```
pub fn version_query(reference: &str) -> Option<&str> {
    if let Some(tag) = reference.strip_prefix("refs/tags/") {
        return Some(tag);
    }
    if reference == "HEAD" || reference.starts_with("refs/") || reference.is_empty() {
        return None;
    }
    Some(reference)
}

/// Module source backed by the `go` command.
#[derive(Debug, Clone, Default)]
pub struct GoModuleSource {
    project_dir: Option<PathBuf>,
}

impl GoModuleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every command inside `dir` instead of the current directory.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            project_dir: Some(dir.as_ref().to_path_buf()),
        }
    }

    fn command(&self, command: GoCommand) -> GoCommand {
        match &self.project_dir {
            Some(dir) => command.current_dir(dir),
            None => command,
        }
    }

    async fn run(&self, command: GoCommand, timeout: std::time::Duration) -> Result<String> {
        self.command(command).with_timeout(Some(timeout)).execute().await
    }

    /// Lists the build list as records, filtered by `prefix`.
    pub async fn load_records(&self, prefix: &str) -> Result<Vec<DependencyRecord>> {
        let output = self
            .run(GoCommand::list_modules(), GO_LIST_TIMEOUT)
            .await
            .context("Failed to list Go modules")?;

        let modules = parse_module_listing(&output)?;
        let records = to_records(modules, prefix);
        tracing::debug!("Loaded {} module records (prefix {:?})", records.len(), prefix);
        Ok(records)
    }

    /// Finds the record with `id` in the unfiltered listing.
    pub async fn find_by_id(&self, id: usize) -> Result<DependencyRecord> {
        self.load_records("")
            .await?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or_else(|| {
                V2bError::ModuleNotFound {
                    id,
                }
                .into()
            })
    }

    /// Points `module_path` at `branch` with `go get`.
    pub async fn update_module(&self, module_path: &str, branch: &str) -> Result<()> {
        tracing::info!("Updating {} to {}", module_path, branch);
        self.run(GoCommand::get(module_path, branch), GO_GET_TIMEOUT)
            .await
            .with_context(|| format!("Failed to update {module_path} to {branch}"))?;
        Ok(())
    }

    /// Lists the build list with available updates and deprecation notices.
    pub async fn load_module_updates(&self) -> Result<Vec<GoModule>> {
        let output = self
            .run(GoCommand::list_module_updates(), GO_GET_TIMEOUT)
            .await
            .context("Failed to list module updates")?;
        parse_module_listing(&output)
    }

    /// Looks up the build list entry of `module_path`.
    pub async fn find_module(&self, module_path: &str) -> Result<GoModule> {
        let output = self
            .run(GoCommand::list_module(module_path), GO_LIST_TIMEOUT)
            .await
            .with_context(|| format!("Failed to look up {module_path}"))?;
        parse_module_listing(&output)?
            .into_iter()
            .find(|module| module.path == module_path)
            .ok_or_else(|| anyhow!("{module_path} is not in the build list"))
    }

    /// Released versions of `module_path`, oldest first.
    pub async fn version_history(&self, module_path: &str) -> Result<Vec<String>> {
        let output = self
            .run(GoCommand::list_versions(module_path), GO_GET_TIMEOUT)
            .await
            .with_context(|| format!("Failed to list versions of {module_path}"))?;
        Ok(parse_version_history(&output))
    }

    /// Moves `module_path` to `version` and tidies `go.mod`.
    pub async fn switch_version(&self, module_path: &str, version: &str) -> Result<()> {
        self.update_module(module_path, version).await?;
        self.tidy().await
    }

    pub async fn tidy(&self) -> Result<()> {
        self.run(GoCommand::mod_tidy(), GO_GET_TIMEOUT)
            .await
            .context("Failed to tidy go.mod")?;
        Ok(())
    }

    /// Pins `module_path` to its current version with a `replace` directive.
    /// Returns the pinned version.
    pub async fn pin_module(&self, module_path: &str) -> Result<String> {
        let module = self.find_module(module_path).await?;
        if module.main || module.version.is_empty() {
            return Err(anyhow!("{module_path} has no version to pin"));
        }
        tracing::info!("Pinning {} to {}", module_path, module.version);
        self.run(GoCommand::mod_edit_replace(module_path, &module.version), GO_LIST_TIMEOUT)
            .await
            .with_context(|| format!("Failed to pin {module_path}"))?;
        Ok(module.version)
    }

    /// Drops the `replace` directive of `module_path` and tidies `go.mod`.
    pub async fn unpin_module(&self, module_path: &str) -> Result<()> {
        tracing::info!("Unpinning {}", module_path);
        self.run(GoCommand::mod_edit_dropreplace(module_path), GO_LIST_TIMEOUT)
            .await
            .with_context(|| format!("Failed to unpin {module_path}"))?;
        self.tidy().await
    }

    /// Explains why `module_path` is part of the build.
    pub async fn explain(&self, module_path: &str) -> Result<Vec<ModuleExplanation>> {
        let output = self
            .run(GoCommand::mod_why(module_path), GO_LIST_TIMEOUT)
            .await
            .with_context(|| format!("Failed to explain {module_path}"))?;
        Ok(parse_why(&output))
    }

    /// The module requirement graph.
    pub async fn dependency_graph(&self) -> Result<DependencyGraph> {
        let output = self
            .run(GoCommand::mod_graph(), GO_LIST_TIMEOUT)
            .await
            .context("Failed to read the module graph")?;
        Ok(parse_graph(&output))
    }
}
