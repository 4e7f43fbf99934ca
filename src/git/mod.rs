//! Git-backed branch resolution
//!
//! v2b never clones anything. A module's branch is found by listing the
//! remote references of its repository with `git ls-remote` and picking the
//! one that matches the module's commit reference. Like Cargo's `git-fetch-with-cli`, the system `git` binary
//! is used so credential helpers, SSH agents and `insteadOf` rewrites apply.
//!
//! # Repository URLs
//!
//! Module paths have no scheme, so [`repository_url`] adds `https://`. For
//! hosts with a fixed `host/owner/repo` layout the path is cut to those three
//! segments, so `github.com/acme/widgets/v2` and nested modules such as
//! `github.com/acme/widgets/tools` query `https://github.com/acme/widgets`.
//! Absolute and relative filesystem paths are passed to git unchanged.
//!
//! # Reference selection
//!
//! A pseudo-version carries an abbreviated commit hash, which is matched as
//! a prefix of each listed sha. A tagged release such as `v1.9.3` has no hash;
//! it matches the tag of the same name, or a tag ending in `-v1.9.3`, so a
//! tagged dependency resolves to `refs/tags/v1.9.3`.
//!
//! Several references can point at the same commit. [`find_reference`]
//! prefers branch heads over tags, tags over any other namespace (pull
//! requests, merge requests), and uses `HEAD` only when nothing else matches.
//! Branch heads are returned without their `refs/heads/` prefix.

pub mod command_builder;

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

use crate::constants::{BRANCH_REF_PREFIX, GIT_LS_REMOTE_TIMEOUT};
use crate::core::V2bError;
use crate::resolver::BranchResolver;
use command_builder::GitCommand;

/// Hosts whose repositories always live at `host/owner/repo`.
const THREE_SEGMENT_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org"];

/// Resolves branches by running `git ls-remote` against the module's repository.
#[derive(Debug, Clone)]
pub struct GitBranchResolver {
    timeout: Duration,
}

impl Default for GitBranchResolver {
    fn default() -> Self {
        Self {
            timeout: GIT_LS_REMOTE_TIMEOUT,
        }
    }
}

impl GitBranchResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-lookup timeout. A lookup that times out becomes a failed outcome.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl BranchResolver for GitBranchResolver {
    async fn resolve_branch(&self, module_path: &str, commit: &str) -> Result<String> {
        let url = repository_url(module_path);
        let output = GitCommand::ls_remote(&url)
            .with_timeout(Some(self.timeout))
            .with_context(module_path)
            .execute_stdout()
            .await
            .with_context(|| format!("Failed to list references of {url}"))?;

        find_reference(&output, commit).ok_or_else(|| {
            V2bError::BranchNotFound {
                module: module_path.to_string(),
                commit: commit.to_string(),
            }
            .into()
        })
    }
}

/// Maps a module path to the URL handed to `git ls-remote`.
///
/// ```rust
/// use v2b_cli::git::repository_url;
///
/// assert_eq!(repository_url("github.com/acme/widgets/v2"), "https://github.com/acme/widgets");
/// assert_eq!(repository_url("go.example.org/tool"), "https://go.example.org/tool");
/// assert_eq!(repository_url("https://git.example.org/x"), "https://git.example.org/x");
/// ```
pub fn repository_url(module_path: &str) -> String {
    if module_path.contains("://") || is_local_path(module_path) {
        return module_path.to_string();
    }

    let mut segments = module_path.split('/');
    let host = segments.next().unwrap_or_default();
    let path = if THREE_SEGMENT_HOSTS.contains(&host) {
        module_path.splitn(4, '/').take(3).collect::<Vec<_>>().join("/")
    } else {
        module_path.to_string()
    };

    format!("https://{path}")
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('.') || Path::new(path).is_absolute()
}

/// Rank of a matching reference, lower wins.
fn reference_rank(reference: &str) -> u8 {
    if reference.starts_with(BRANCH_REF_PREFIX) {
        0
    } else if reference.starts_with("refs/tags/") {
        1
    } else if reference == "HEAD" {
        3
    } else {
        2
    }
}

/// Picks the reference pointing at `commit` from `git ls-remote` output.
///
/// Lines are `<sha>\t<reference>`. When `commit` is a hex hash (the tail of
/// a pseudo-version) a line matches when its sha starts with `commit`,
/// ignoring ASCII case. Anything else is the tail of a tagged release
/// (`v1.9.3`, or `rc.1` from `v1.2.0-rc.1`) and matches the tag of that
/// name, or a tag ending in `-<commit>`. `+incompatible` style build
/// metadata is ignored. An empty `commit` matches nothing.
///
/// ```rust
/// use v2b_cli::git::find_reference;
///
/// let output = "0123456789abcdef\tHEAD\n0123456789abcdef\trefs/heads/main\n\
///               fedcba9876543210\trefs/tags/v1.9.3\n";
/// assert_eq!(find_reference(output, "0123456789ab"), Some("main".to_string()));
/// assert_eq!(find_reference(output, "v1.9.3"), Some("refs/tags/v1.9.3".to_string()));
/// assert_eq!(find_reference(output, "ffff"), None);
/// ```
pub fn find_reference(ls_remote_output: &str, commit: &str) -> Option<String> {
    let commit = commit.split_once('+').map_or(commit, |(release, _)| release);
    if commit.is_empty() {
        return None;
    }
    let by_hash = is_commit_hash(commit);

    ls_remote_output
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .map(|(sha, reference)| (sha.trim(), reference.trim().trim_end_matches("^{}")))
        .filter(|(sha, reference)| {
            if by_hash {
                sha.get(..commit.len()).is_some_and(|prefix| prefix.eq_ignore_ascii_case(commit))
            } else {
                reference.strip_prefix("refs/tags/").is_some_and(|tag| {
                    tag == commit
                        || tag.strip_suffix(commit).is_some_and(|head| head.ends_with('-'))
                })
            }
        })
        .map(|(_, reference)| reference)
        .enumerate()
        .min_by_key(|(position, reference)| (reference_rank(reference), *position))
        .map(|(_, reference)| {
            reference.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(reference).to_string()
        })
}

fn is_commit_hash(commit: &str) -> bool {
    commit.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Returns true when a working `git` executable is on PATH.
pub async fn is_git_installed() -> bool {
    GitCommand::version()
        .with_timeout(Some(Duration::from_secs(10)))
        .execute()
        .await
        .is_ok_and(|output| output.stdout.starts_with("git version"))
}
