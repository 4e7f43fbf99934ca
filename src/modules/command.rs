//! Builder for `go` toolchain invocations.
//!
//! Mirrors [`GitCommand`](crate::git::command_builder::GitCommand): one place
//! for timeouts, logging and mapping failures to [`V2bError`].

use anyhow::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::core::V2bError;
use crate::utils::platform::get_go_command;

pub struct GoCommand {
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    timeout_duration: Option<Duration>,
}

impl GoCommand {
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            current_dir: None,
            timeout_duration: Some(Duration::from_secs(300)),
        }
    }

    /// `go list -m -json all`
    pub fn list_modules() -> Self {
        Self::new().args(["list", "-m", "-json", "all"])
    }

    /// `go list -m -u -json all`, adding available updates and deprecation notices
    pub fn list_module_updates() -> Self {
        Self::new().args(["list", "-m", "-u", "-json", "all"])
    }

    /// `go list -m -json <module>`
    pub fn list_module(module_path: &str) -> Self {
        Self::new().args(["list", "-m", "-json", module_path])
    }

    /// `go list -m -versions <module>`
    pub fn list_versions(module_path: &str) -> Self {
        Self::new().args(["list", "-m", "-versions", module_path])
    }

    /// `go get <module>@<reference>`
    pub fn get(module_path: &str, reference: &str) -> Self {
        Self::new().args(["get".to_string(), format!("{module_path}@{reference}")])
    }

    /// `go mod tidy`
    pub fn mod_tidy() -> Self {
        Self::new().args(["mod", "tidy"])
    }

    /// `go mod edit -replace=<module>=<module>@<version>`
    pub fn mod_edit_replace(module_path: &str, version: &str) -> Self {
        Self::new().args([
            "mod".to_string(),
            "edit".to_string(),
            format!("-replace={module_path}={module_path}@{version}"),
        ])
    }

    /// `go mod edit -dropreplace=<module>`
    pub fn mod_edit_dropreplace(module_path: &str) -> Self {
        Self::new().args(["mod".to_string(), "edit".to_string(), format!("-dropreplace={module_path}")])
    }

    /// `go mod why -m <module>`
    pub fn mod_why(module_path: &str) -> Self {
        Self::new().args(["mod", "why", "-m", module_path])
    }

    /// `go mod graph`
    pub fn mod_graph() -> Self {
        Self::new().args(["mod", "graph"])
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Runs the command inside `dir`, normally the directory holding `go.mod`.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Subcommand name, two words for `go mod ...`.
    fn operation(&self) -> String {
        match self.args.as_slice() {
            [first, second, ..] if first == "mod" => format!("mod {second}"),
            [first, ..] => first.clone(),
            [] => "unknown".to_string(),
        }
    }

    /// Runs the command and returns its stdout.
    pub async fn execute(self) -> Result<String> {
        let go_command = get_go_command();
        let mut cmd = Command::new(go_command);
        cmd.args(&self.args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!(target: "go", "Executing command: {} {}", go_command, self.args.join(" "));

        let output_future = cmd.output();
        let result = match self.timeout_duration {
            Some(duration) => match timeout(duration, output_future).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(V2bError::GoCommandError {
                        operation: self.operation(),
                        stderr: format!(
                            "go {} timed out after {} seconds",
                            self.args.join(" "),
                            duration.as_secs()
                        ),
                    }
                    .into());
                }
            },
            None => output_future.await,
        };

        let output = match result {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(V2bError::GoNotFound.into()),
            Err(e) => return Err(V2bError::IoError(e).into()),
        };

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !output.status.success() {
            tracing::debug!(
                target: "go",
                "Command failed with exit code {:?}: {}",
                output.status.code(),
                stderr.trim()
            );
            return Err(V2bError::GoCommandError {
                operation: self.operation(),
                stderr,
            }
            .into());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "go", "{}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Default for GoCommand {
    fn default() -> Self {
        Self::new()
    }
}
