//! Outdated and deprecated modules.
//!
//! Both come from one `go list -m -u -json all` call: the toolchain fills
//! `Update` when a newer release exists and `Deprecated` when the module's
//! latest `go.mod` carries a deprecation comment.

use serde::Serialize;

use super::GoModule;

/// Kind of problem reported by `v2b issues`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Outdated,
    Deprecated,
}

impl IssueKind {
    /// Parses the `--type` value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "outdated" => Some(Self::Outdated),
            "deprecated" => Some(Self::Deprecated),
            _ => None,
        }
    }
}

/// One module with a problem of the requested kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleIssue {
    pub id: usize,
    pub path: String,
    pub version: String,
    /// Newer version, or the deprecation message
    pub detail: String,
}

/// Picks the modules with `kind` problems, numbering them like `v2b list`.
///
/// The main module is never reported. Modules whose path does not start with
/// `prefix` are dropped after numbering.
pub fn find_issues(modules: Vec<GoModule>, kind: IssueKind, prefix: &str) -> Vec<ModuleIssue> {
    modules
        .into_iter()
        .enumerate()
        .filter(|(_, module)| !module.main && module.path.starts_with(prefix))
        .filter_map(|(index, module)| {
            let detail = match kind {
                IssueKind::Outdated => module
                    .update
                    .map(|update| update.version)
                    .filter(|newer| !newer.is_empty() && *newer != module.version)?,
                IssueKind::Deprecated => {
                    module.deprecated.filter(|message| !message.trim().is_empty())?
                }
            };
            Some(ModuleIssue {
                id: index + 1,
                path: module.path,
                version: module.version,
                detail,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::parse_module_listing;

    const LISTING: &str = r#"{"Path": "example.com/app", "Main": true}
{"Path": "github.com/acme/widgets", "Version": "v1.2.0",
 "Update": {"Path": "github.com/acme/widgets", "Version": "v1.4.1"}}
{"Path": "github.com/golang/protobuf", "Version": "v1.5.4",
 "Deprecated": "Use the google.golang.org/protobuf module instead."}
{"Path": "golang.org/x/text", "Version": "v0.14.0", "Indirect": true}
"#;

    #[test]
    fn test_outdated_modules() {
        let issues = find_issues(parse_module_listing(LISTING).unwrap(), IssueKind::Outdated, "");
        assert_eq!(
            issues,
            vec![ModuleIssue {
                id: 2,
                path: "github.com/acme/widgets".to_string(),
                version: "v1.2.0".to_string(),
                detail: "v1.4.1".to_string(),
            }]
        );
    }

    #[test]
    fn test_deprecated_modules() {
        let issues = find_issues(parse_module_listing(LISTING).unwrap(), IssueKind::Deprecated, "");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, 3);
        assert!(issues[0].detail.starts_with("Use the google.golang.org/protobuf"));
    }

    #[test]
    fn test_prefix_keeps_listing_ids() {
        let modules = parse_module_listing(LISTING).unwrap();
        assert!(find_issues(modules.clone(), IssueKind::Outdated, "golang.org").is_empty());
        assert_eq!(find_issues(modules, IssueKind::Outdated, "github.com/acme")[0].id, 2);
    }

    #[test]
    fn test_issue_kind_names() {
        assert_eq!(IssueKind::from_name("outdated"), Some(IssueKind::Outdated));
        assert_eq!(IssueKind::from_name("deprecated"), Some(IssueKind::Deprecated));
        assert_eq!(IssueKind::from_name("security"), None);
    }
}
