//! Argument handling and error reporting of the `v2b` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn v2b() -> Command {
    let mut cmd = Command::cargo_bin("v2b").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    v2b()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("tidy"))
        .stdout(predicate::str::contains("branch"))
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_check_help_shows_filters() {
    v2b()
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--ignore-errors"))
        .stdout(predicate::str::contains("--special"))
        .stdout(predicate::str::contains("--prefix"))
        .stdout(predicate::str::contains("--workers"));
}

#[test]
fn test_branch_requires_module_and_branch() {
    v2b()
        .args(["branch", "github.com/acme/widgets"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("BRANCH_NAME"));
}

#[test]
fn test_update_rejects_non_numeric_id() {
    v2b().args(["update", "first"]).assert().failure();
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "workers = 0\n").unwrap();

    v2b()
        .current_dir(temp.path())
        .args(["--config", config.to_str().unwrap(), "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("workers must be at least 1"));
}

#[test]
fn test_missing_go_is_reported() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("absent.toml");

    v2b()
        .current_dir(temp.path())
        .env("PATH", temp.path())
        .args(["--config", config.to_str().unwrap(), "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Go"));
}
