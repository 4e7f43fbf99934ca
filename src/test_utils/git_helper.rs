//! Git test helper utilities
//!
//! Builds small local repositories whose commits tests can then look up
//! through the real [`GitBranchResolver`](crate::git::GitBranchResolver).

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Git command runner for tests.
pub struct TestGit {
    repo_path: PathBuf,
}

impl TestGit {
    fn run_git_command(&self, args: &[&str], action: &str) -> Result<std::process::Output> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .with_context(|| action.to_string())?;

        if !output.status.success() {
            bail!("{} failed: {}", action, String::from_utf8_lossy(&output.stderr));
        }

        Ok(output)
    }

    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Initializes a repository on `main` with a test identity.
    pub fn init(&self) -> Result<()> {
        std::fs::create_dir_all(&self.repo_path)
            .with_context(|| format!("Failed to create {}", self.repo_path.display()))?;
        self.run_git_command(&["init", "--quiet"], "Failed to initialize git repository")?;
        self.run_git_command(&["symbolic-ref", "HEAD", "refs/heads/main"], "Failed to select main branch")?;
        self.run_git_command(
            &["config", "user.email", "test@v2b.example"],
            "Failed to configure git user email",
        )?;
        self.run_git_command(&["config", "user.name", "Test User"], "Failed to configure git user name")?;
        self.run_git_command(&["config", "commit.gpgsign", "false"], "Failed to disable signing")?;
        Ok(())
    }

    /// Writes `file`, commits it and returns the new commit sha.
    pub fn commit_file(&self, file: &str, content: &str) -> Result<String> {
        std::fs::write(self.repo_path.join(file), content)
            .with_context(|| format!("Failed to write {file}"))?;
        self.run_git_command(&["add", file], "Failed to stage file")?;
        self.run_git_command(&["commit", "-q", "-m", &format!("Update {file}")], "Failed to commit")?;
        self.rev_parse_head()
    }

    pub fn create_branch(&self, branch_name: &str) -> Result<()> {
        self.run_git_command(&["checkout", "-q", "-b", branch_name], "Failed to create branch")?;
        Ok(())
    }

    pub fn checkout(&self, ref_name: &str) -> Result<()> {
        self.run_git_command(&["checkout", "-q", ref_name], "Failed to checkout")?;
        Ok(())
    }

    pub fn tag(&self, tag_name: &str) -> Result<()> {
        self.run_git_command(&["tag", tag_name], "Failed to create tag")?;
        Ok(())
    }

    pub fn rev_parse_head(&self) -> Result<String> {
        let output = self.run_git_command(&["rev-parse", "HEAD"], "Failed to get HEAD commit")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Pseudo-version whose commit reference is the first 12 characters of `sha`.
pub fn pseudo_version(sha: &str) -> String {
    format!("v0.0.0-20240101000000-{}", &sha[..12.min(sha.len())])
}
