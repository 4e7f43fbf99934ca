//! Go module version arithmetic.
//!
//! Go versions are semantic versions with a leading `v` (`v1.9.3`,
//! `v0.0.0-20240101000000-abcdef123456`, `v2.0.0+incompatible`). They are
//! compared with [`semver`] after the `v` is removed, so pseudo-versions sort
//! as pre-releases of their base version and build metadata is ignored.

use anyhow::Result;
use semver::Version;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use super::graph::DependencyGraph;
use crate::core::V2bError;

/// Parses a Go module version.
///
/// ```rust
/// use v2b_cli::modules::version::parse_go_version;
///
/// assert_eq!(parse_go_version("v1.9.3").unwrap().minor, 9);
/// assert!(parse_go_version("v1.9.3").unwrap() > parse_go_version("v1.9.3-rc.1").unwrap());
/// assert!(parse_go_version("latest").is_err());
/// ```
///
/// # Errors
///
/// Returns [`V2bError::InvalidVersion`] for anything that is not `v` followed
/// by a semantic version.
pub fn parse_go_version(version: &str) -> Result<Version> {
    let Some(stripped) = version.strip_prefix('v') else {
        return Err(V2bError::InvalidVersion {
            version: version.to_string(),
            reason: "Go module versions start with 'v'".to_string(),
        }
        .into());
    };
    Version::parse(stripped).map_err(|e| {
        V2bError::InvalidVersion {
            version: version.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Compares two Go versions by semantic version precedence.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    Ok(parse_go_version(a)?.cmp_precedence(&parse_go_version(b)?))
}

/// Checks that `target` is a valid move away from `current`.
///
/// Both must parse and must not be the same version.
pub fn validate_upgrade(current: &str, target: &str) -> Result<Ordering> {
    let ordering = compare_versions(target, current)?;
    if ordering == Ordering::Equal {
        return Err(V2bError::InvalidVersion {
            version: target.to_string(),
            reason: format!("the module is already at {current}"),
        }
        .into());
    }
    Ok(ordering)
}

/// Parses `go list -m -versions <path>` output.
///
/// The output is one line: the module path followed by every released
/// version in ascending order. Pseudo-versions are never listed.
pub fn parse_version_history(output: &str) -> Vec<String> {
    output.split_whitespace().skip(1).map(ToString::to_string).collect()
}

/// Returns the release preceding `current` in `history`.
///
/// # Errors
///
/// Fails when `current` is not a listed release (a pseudo-version, say) or is
/// the first one.
pub fn previous_version<'a>(module_path: &str, history: &'a [String], current: &str) -> Result<&'a str> {
    match history.iter().position(|version| version == current) {
        Some(index) if index > 0 => Ok(&history[index - 1]),
        Some(_) => Err(anyhow::anyhow!(
            "{module_path} is at its first release {current}; there is nothing to roll back to"
        )),
        None if history.is_empty() => {
            Err(anyhow::anyhow!("{module_path} has no tagged releases to roll back to"))
        }
        None => Err(anyhow::anyhow!(
            "{module_path}@{current} is not a tagged release; pin it with 'v2b version upgrade' first"
        )),
    }
}

/// A module required at more than one version in the module graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConflict {
    pub module_path: String,
    /// `(required_by, version)` pairs, in graph order
    pub requirements: Vec<(String, String)>,
    /// Highest required version
    pub selected: String,
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} -> {}", self.module_path, self.selected)?;
        for (required_by, version) in &self.requirements {
            writeln!(f, "  {required_by} requires {version}")?;
        }
        Ok(())
    }
}

/// Finds modules required at several versions and picks the highest of each.
///
/// Requirements whose version does not parse are ignored when selecting, so a
/// module only has a conflict if at least two distinct valid versions are
/// required. Conflicts are ordered by module path.
pub fn detect_conflicts(graph: &DependencyGraph) -> Vec<VersionConflict> {
    let mut required: BTreeMap<&str, Vec<(String, String)>> = BTreeMap::new();
    for (source, targets) in graph.edges() {
        for target in targets {
            if target.version.is_empty() {
                continue;
            }
            required
                .entry(target.path.as_str())
                .or_default()
                .push((source.to_string(), target.version.clone()));
        }
    }

    required
        .into_iter()
        .filter_map(|(module_path, requirements)| {
            let mut versions: Vec<(Version, &str)> = requirements
                .iter()
                .filter_map(|(_, version)| {
                    parse_go_version(version).ok().map(|parsed| (parsed, version.as_str()))
                })
                .collect();
            versions.sort_by(|a, b| a.0.cmp_precedence(&b.0));
            versions.dedup_by(|a, b| a.0.cmp_precedence(&b.0) == Ordering::Equal);
            if versions.len() < 2 {
                return None;
            }
            let selected = versions.last().map(|(_, raw)| (*raw).to_string())?;
            Some(VersionConflict {
                module_path: module_path.to_string(),
                requirements,
                selected,
            })
        })
        .collect()
}
