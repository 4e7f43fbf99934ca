//! Shared data models for v2b operations
//!
//! [`DependencyRecord`] is one pinned module as listed by the module source,
//! [`ResolutionOutcome`] is what a worker produced for it, and
//! [`RunConfiguration`] decides which outcomes make it into the final listing.

use serde::{Deserialize, Serialize};

/// One module dependency queued for branch resolution.
///
/// Records are created by the module source before a run starts and are not
/// modified afterwards. The resolved branch is carried by the record's
/// [`ResolutionOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// 1-based position in the module listing
    pub id: usize,
    /// Module path, the key for this record within a run
    pub module_path: String,
    /// Pinned version, usually a pseudo-version such as `v0.0.0-20240101000000-abcdef123456`
    pub version: String,
    /// Commit reference derived from `version`
    pub commit_reference: String,
    /// Whether the module is only an indirect requirement
    #[serde(default)]
    pub indirect: bool,
}

impl DependencyRecord {
    /// Builds a record and derives its commit reference from `version`.
    pub fn new(id: usize, module_path: impl Into<String>, version: impl Into<String>) -> Self {
        let version = version.into();
        let commit_reference = commit_reference(&version).to_string();
        Self {
            id,
            module_path: module_path.into(),
            version,
            commit_reference,
            indirect: false,
        }
    }

    /// Marks the record as an indirect requirement.
    #[must_use]
    pub const fn with_indirect(mut self, indirect: bool) -> Self {
        self.indirect = indirect;
        self
    }

    /// Returns true when the record never reaches the resolver.
    ///
    /// Paths without a `.` (no host component, e.g. the main module or a
    /// replaced local module) and empty versions produce no outcome at all.
    pub fn is_skipped(&self) -> bool {
        !self.module_path.contains('.') || self.version.is_empty()
    }
}

/// Returns the part of `version` after the last `-`.
///
/// For pseudo-versions this is the abbreviated commit hash. A version without
/// a `-` is returned unchanged.
///
/// ```rust
/// use v2b_cli::models::commit_reference;
///
/// assert_eq!(commit_reference("v0.0.0-20240101000000-abcdef123456"), "abcdef123456");
/// assert_eq!(commit_reference("v1.2.3"), "v1.2.3");
/// ```
pub fn commit_reference(version: &str) -> &str {
    version.rsplit('-').next().unwrap_or(version)
}

/// Result of resolving and classifying one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResolutionOutcome {
    /// Module tracks a conventional long-lived branch
    Ordinary {
        module_path: String,
        version: String,
        branch: String,
    },
    /// Module is pinned to a feature, release, tag or pull request reference
    Special {
        module_path: String,
        version: String,
        branch: String,
    },
    /// No reference could be found for the pinned commit
    Failed {
        module_path: String,
        version: String,
        reason: String,
    },
}

impl ResolutionOutcome {
    pub fn module_path(&self) -> &str {
        match self {
            Self::Ordinary {
                module_path,
                ..
            }
            | Self::Special {
                module_path,
                ..
            }
            | Self::Failed {
                module_path,
                ..
            } => module_path,
        }
    }

    pub fn version(&self) -> &str {
        match self {
            Self::Ordinary {
                version,
                ..
            }
            | Self::Special {
                version,
                ..
            }
            | Self::Failed {
                version,
                ..
            } => version,
        }
    }

    /// Resolved branch, `None` for failed outcomes.
    pub fn branch(&self) -> Option<&str> {
        match self {
            Self::Ordinary {
                branch,
                ..
            }
            | Self::Special {
                branch,
                ..
            } => Some(branch),
            Self::Failed {
                ..
            } => None,
        }
    }

    pub const fn is_special(&self) -> bool {
        matches!(self, Self::Special { .. })
    }

    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Display rules for one run.
///
/// Read-only once the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    /// Include failed lookups in the merged output
    pub show_errors: bool,
    /// Drop ordinary branches from the merged output
    pub special_only: bool,
    /// Only modules whose path starts with this prefix are dispatched
    pub path_prefix: String,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            show_errors: true,
            special_only: false,
            path_prefix: String::new(),
        }
    }
}

impl RunConfiguration {
    /// Returns true when `module_path` passes the prefix filter.
    pub fn matches_prefix(&self, module_path: &str) -> bool {
        module_path.starts_with(&self.path_prefix)
    }
}
