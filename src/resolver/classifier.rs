//! Branch classification
//!
//! A resolved reference is either an ordinary long-lived branch (`main`,
//! `master`, `develop`, ...) or a special reference: a feature or release
//! branch, a tag, a pull request head. The rule is exact matching against a
//! small set of ordinary names. Everything that is not in the set is special,
//! except the empty string, which counts as ordinary.
//!
//! Fully qualified names are not normalized here. `refs/heads/main` is special;
//! the git resolver strips `refs/heads/` before classification, so only tags
//! and other namespaces reach the classifier in qualified form.

use std::collections::HashSet;

use crate::constants::DEFAULT_ORDINARY_BRANCHES;

/// Decides whether a branch name is special.
///
/// # Examples
///
/// ```rust
/// use v2b_cli::resolver::BranchClassifier;
///
/// let classifier = BranchClassifier::default();
/// assert!(!classifier.is_special("main"));
/// assert!(classifier.is_special("feature/login"));
/// assert!(classifier.is_special("refs/tags/v1.2.0"));
/// assert!(!classifier.is_special(""));
///
/// let custom = BranchClassifier::new(["stable"]);
/// assert!(custom.is_special("main"));
/// assert!(!custom.is_special("stable"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchClassifier {
    ordinary: HashSet<String>,
}

impl Default for BranchClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_ORDINARY_BRANCHES.iter().copied())
    }
}

impl BranchClassifier {
    /// Builds a classifier that treats exactly `ordinary` as ordinary branches.
    pub fn new<I, S>(ordinary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ordinary: ordinary.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true for special references.
    pub fn is_special(&self, branch: &str) -> bool {
        !branch.is_empty() && !self.ordinary.contains(branch)
    }

    /// Names treated as ordinary, sorted.
    pub fn ordinary_branches(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ordinary.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
