//! Full commands against a stand-in `go` executable and local git repositories.
//!
//! The stand-in prints a prepared `go list -m -json` listing and module graph,
//! appends every `go get` argument to one log file and every `go mod` edit to
//! another, so commands run without a Go toolchain or network access. It only
//! uses shell builtins, which lets a test run v2b with nothing but the
//! stand-in on PATH.

use assert_cmd::Command;
use serde_json::{Value, json};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use v2b_cli::test_utils::{TestGit, pseudo_version};

const FAKE_GO: &str = r#"#!/bin/sh
show() {
  while IFS= read -r line || [ -n "$line" ]; do printf '%s\n' "$line"; done < "$1"
}
case "$1 $2" in
  "list -m")
    case "$3" in
      -versions) printf '%s %s\n' "$4" "$FAKE_GO_VERSIONS" ;;
      *) show "$FAKE_GO_LISTING" ;;
    esac ;;
  "get "*) echo "$2" >> "$FAKE_GO_LOG" ;;
  "mod graph") show "$FAKE_GO_GRAPH" ;;
  "mod why") printf '# %s\n(main module does not need module %s)\n' "$4" "$4" ;;
  "mod "*) echo "$*" >> "$FAKE_GO_MOD_LOG" ;;
  *) echo "unsupported: $*" >&2; exit 2 ;;
esac
"#;

/// Required at two versions in the stand-in module graph.
const SHARED_MODULE: &str = "github.com/acme/widgets";

struct Project {
    temp: TempDir,
    ordinary_module: String,
    special_module: String,
    missing_module: String,
}

impl Project {
    /// Listing order: main module, ordinary repo, special repo, missing repo.
    fn new() -> Self {
        let temp = TempDir::new().unwrap();

        let ordinary = TestGit::new(temp.path().join("repos").join("ordinary.repo"));
        ordinary.init().unwrap();
        let ordinary_sha = ordinary.commit_file("main.go", "package ordinary").unwrap();

        let special = TestGit::new(temp.path().join("repos").join("special.repo"));
        special.init().unwrap();
        special.commit_file("main.go", "package special").unwrap();
        special.create_branch("feature/login").unwrap();
        let special_sha = special.commit_file("login.go", "package special").unwrap();

        let ordinary_module = ordinary.repo_path().display().to_string();
        let special_module = special.repo_path().display().to_string();
        let missing_module = temp.path().join("repos").join("missing.repo").display().to_string();

        let listing = [
            json!({"Path": "example.com/app", "Main": true, "GoVersion": "1.22"}),
            json!({
                "Path": &ordinary_module,
                "Version": pseudo_version(&ordinary_sha),
                "Update": {"Path": &ordinary_module, "Version": "v1.0.0"}
            }),
            json!({
                "Path": &special_module,
                "Version": pseudo_version(&special_sha),
                "Indirect": true,
                "Deprecated": "use the ordinary repository"
            }),
            json!({"Path": &missing_module, "Version": pseudo_version(&special_sha)}),
        ]
        .iter()
        .map(|module| serde_json::to_string_pretty(module).unwrap())
        .collect::<Vec<_>>()
        .join("\n");

        let project = temp.path().join("project");
        fs::create_dir_all(&project).unwrap();
        fs::write(temp.path().join("listing.json"), listing).unwrap();

        let graph = format!(
            "example.com/app {ordinary_module}@{ordinary}\n\
             example.com/app {SHARED_MODULE}@v1.2.0\n\
             {ordinary_module}@{ordinary} {SHARED_MODULE}@v1.4.0\n",
            ordinary = pseudo_version(&ordinary_sha),
        );
        fs::write(temp.path().join("graph.txt"), graph).unwrap();

        let bin = temp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let go = bin.join("go");
        fs::write(&go, FAKE_GO).unwrap();
        fs::set_permissions(&go, fs::Permissions::from_mode(0o755)).unwrap();

        Self {
            temp,
            ordinary_module,
            special_module,
            missing_module,
        }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn project_dir(&self) -> PathBuf {
        self.root().join("project")
    }

    fn v2b(&self) -> Command {
        let path = std::env::var_os("PATH").unwrap_or_default();
        let mut dirs = vec![self.root().join("bin")];
        dirs.extend(std::env::split_paths(&path));
        self.v2b_with_path(std::env::join_paths(dirs).unwrap())
    }

    /// Runs with only the stand-in `go` on PATH, so `git` cannot be found.
    fn v2b_without_git(&self) -> Command {
        self.v2b_with_path(self.root().join("bin").into_os_string())
    }

    fn v2b_with_path(&self, path: std::ffi::OsString) -> Command {
        let mut cmd = Command::cargo_bin("v2b").unwrap();
        cmd.current_dir(self.project_dir())
            .env("PATH", path)
            .env("FAKE_GO_LISTING", self.root().join("listing.json"))
            .env("FAKE_GO_GRAPH", self.root().join("graph.txt"))
            .env("FAKE_GO_VERSIONS", "v0.9.0 v1.0.0 v1.1.0")
            .env("FAKE_GO_LOG", self.root().join("go-get.log"))
            .env("FAKE_GO_MOD_LOG", self.root().join("go-mod.log"))
            .env_remove("RUST_LOG")
            .args(["--no-progress", "--config"])
            .arg(self.root().join("absent.toml"));
        cmd
    }

    fn go_get_log(&self) -> Vec<String> {
        self.log_lines("go-get.log")
    }

    fn go_mod_log(&self) -> Vec<String> {
        self.log_lines("go-mod.log")
    }

    fn log_lines(&self, name: &str) -> Vec<String> {
        fs::read_to_string(self.root().join(name))
            .unwrap_or_default()
            .lines()
            .map(ToString::to_string)
            .collect()
    }
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

fn statuses(report: &Value) -> Vec<(String, String)> {
    report["modules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| {
            (
                m["module_path"].as_str().unwrap().to_string(),
                m["status"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[test]
fn test_check_reports_every_category() {
    let project = Project::new();
    let report = stdout_json(project.v2b().args(["check", "--format", "json"]));

    let mut expected = vec![
        (project.missing_module.clone(), "failed".to_string()),
        (project.ordinary_module.clone(), "ordinary".to_string()),
        (project.special_module.clone(), "special".to_string()),
    ];
    expected.sort();
    assert_eq!(statuses(&report), expected);
    assert_eq!(report["summary"]["ordinary"], 1);
    assert_eq!(report["summary"]["special"], 1);
    assert_eq!(report["summary"]["failed"], 1);

    let special = report["modules"]
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["status"] == "special")
        .unwrap();
    assert_eq!(special["branch"], "feature/login");
}

#[test]
fn test_check_special_only_without_errors() {
    let project = Project::new();
    let report = stdout_json(project.v2b().args([
        "check",
        "--special",
        "--ignore-errors",
        "--workers",
        "1",
        "--format",
        "json",
    ]));

    assert_eq!(statuses(&report), vec![(project.special_module.clone(), "special".to_string())]);
}

#[test]
fn test_check_prefix_filters_modules() {
    let project = Project::new();
    let report = stdout_json(project.v2b().args([
        "check",
        "--prefix",
        project.ordinary_module.as_str(),
        "--format",
        "json",
    ]));

    assert_eq!(statuses(&report), vec![(project.ordinary_module.clone(), "ordinary".to_string())]);
}

#[test]
fn test_check_table_marks_missing_branch() {
    let project = Project::new();
    project
        .v2b()
        .arg("check")
        .assert()
        .success()
        .stdout(predicates::str::contains("feature/login"))
        .stdout(predicates::str::contains("Not-Found"));
}

#[test]
fn test_list_assigns_ids_before_filtering() {
    let project = Project::new();
    let rows = stdout_json(project.v2b().args(["list", "--format", "json", "--prefix", project.special_module.as_str()]));

    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["id"], 3);
    assert_eq!(rows[0]["indirect"], true);
}

#[test]
fn test_tidy_updates_special_modules_only() {
    let project = Project::new();
    project.v2b().arg("tidy").assert().success();

    assert_eq!(project.go_get_log(), vec![format!("{}@feature/login", project.special_module)]);
}

#[test]
fn test_tidy_dry_run_changes_nothing() {
    let project = Project::new();
    project
        .v2b()
        .args(["tidy", "--dry-run"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Would update"));

    assert!(project.go_get_log().is_empty());
}

#[test]
fn test_branch_runs_go_get() {
    let project = Project::new();
    project.v2b().args(["branch", "github.com/acme/widgets", "release/2.x"]).assert().success();

    assert_eq!(project.go_get_log(), vec!["github.com/acme/widgets@release/2.x".to_string()]);
}

#[test]
fn test_update_resolves_by_id() {
    let project = Project::new();
    project.v2b().args(["update", "2"]).assert().success();

    assert_eq!(project.go_get_log(), vec![format!("{}@main", project.ordinary_module)]);
}

#[test]
fn test_update_unknown_id_fails() {
    let project = Project::new();
    project
        .v2b()
        .args(["update", "42"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Module with id 42 not found"));
}

#[test]
fn test_update_main_module_has_nothing_to_resolve() {
    let project = Project::new();
    project
        .v2b()
        .args(["update", "1"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("no pinned commit"));
    assert!(project.go_get_log().is_empty());
}

#[test]
fn test_check_without_git_fails_each_record() {
    let project = Project::new();
    let report = stdout_json(project.v2b_without_git().args(["check", "--format", "json"]));

    let mut expected = vec![
        (project.missing_module.clone(), "failed".to_string()),
        (project.ordinary_module.clone(), "failed".to_string()),
        (project.special_module.clone(), "failed".to_string()),
    ];
    expected.sort();
    assert_eq!(statuses(&report), expected);
    assert_eq!(report["summary"]["failed"], 3);
    assert_eq!(report["summary"]["ordinary"], 0);
}

#[test]
fn test_check_without_git_shows_not_found_rows() {
    let project = Project::new();
    project
        .v2b_without_git()
        .arg("check")
        .assert()
        .success()
        .stdout(predicates::str::contains("Not-Found"))
        .stderr(predicates::str::contains("git is not installed"));
}

#[test]
fn test_update_without_git_reports_missing_git() {
    let project = Project::new();
    project
        .v2b_without_git()
        .args(["update", "2"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Git is not installed"));
    assert!(project.go_get_log().is_empty());
}

#[test]
fn test_version_upgrade_gets_and_tidies() {
    let project = Project::new();
    project
        .v2b()
        .args(["version", "upgrade", project.ordinary_module.as_str(), "v1.0.0"])
        .assert()
        .success();

    assert_eq!(project.go_get_log(), vec![format!("{}@v1.0.0", project.ordinary_module)]);
    assert_eq!(project.go_mod_log(), vec!["mod tidy".to_string()]);
}

#[test]
fn test_version_upgrade_rejects_invalid_version() {
    let project = Project::new();
    project
        .v2b()
        .args(["version", "upgrade", project.ordinary_module.as_str(), "latest"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("Invalid version 'latest'"));
    assert!(project.go_get_log().is_empty());
}

#[test]
fn test_version_rollback_needs_tagged_release() {
    let project = Project::new();
    project
        .v2b()
        .args(["version", "rollback", project.ordinary_module.as_str()])
        .assert()
        .failure()
        .stderr(predicates::str::contains("not a tagged release"));
    assert!(project.go_get_log().is_empty());
}

#[test]
fn test_version_resolve_aligns_on_highest() {
    let project = Project::new();
    project
        .v2b()
        .args(["version", "resolve", "--dry-run"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Would update to v1.4.0"));
    assert!(project.go_get_log().is_empty());

    project.v2b().args(["version", "resolve"]).assert().success();
    assert_eq!(project.go_get_log(), vec![format!("{SHARED_MODULE}@v1.4.0")]);
    assert_eq!(project.go_mod_log(), vec!["mod tidy".to_string()]);
}

#[test]
fn test_dependency_pin_and_unpin() {
    let project = Project::new();
    project
        .v2b()
        .args(["dependency", "pin", project.ordinary_module.as_str()])
        .assert()
        .success();
    project
        .v2b()
        .args(["dependency", "unpin", project.ordinary_module.as_str()])
        .assert()
        .success();

    let log = project.go_mod_log();
    assert_eq!(log.len(), 3);
    assert!(log[0].starts_with(&format!("mod edit -replace={0}={0}@v0.0.0-", project.ordinary_module)));
    assert_eq!(log[1], format!("mod edit -dropreplace={}", project.ordinary_module));
    assert_eq!(log[2], "mod tidy");
}

#[test]
fn test_dependency_why_and_graph() {
    let project = Project::new();
    project
        .v2b()
        .args(["dependency", "why", SHARED_MODULE])
        .assert()
        .success()
        .stdout(predicates::str::contains("not needed by any package"));

    project
        .v2b()
        .args(["dependency", "graph"])
        .assert()
        .success()
        .stdout(predicates::str::contains(format!("└── {SHARED_MODULE}@v1.4.0")));
}

#[test]
fn test_issues_reports_outdated_and_deprecated() {
    let project = Project::new();
    let outdated = stdout_json(project.v2b().args(["issues", "--format", "json"]));
    assert_eq!(outdated.as_array().unwrap().len(), 1);
    assert_eq!(outdated[0]["id"], 2);
    assert_eq!(outdated[0]["detail"], "v1.0.0");

    let deprecated = stdout_json(project.v2b().args(["issues", "--type", "deprecated", "--format", "json"]));
    assert_eq!(deprecated.as_array().unwrap().len(), 1);
    assert_eq!(deprecated[0]["id"], 3);
    assert_eq!(deprecated[0]["detail"], "use the ordinary repository");
}
