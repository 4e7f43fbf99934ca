//! Platform-specific helpers
//!
//! Executable names for the external tools v2b drives (`git`, `go`) and user
//! path resolution with tilde and environment variable expansion.
//!
//! # Examples
//!
//! ```rust,no_run
//! use v2b_cli::utils::platform::{get_go_command, resolve_path};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config_path = resolve_path("~/.v2b/config.toml")?;
//! println!("{} reads {}", get_go_command(), config_path.display());
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Returns true when compiled for Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Returns the user's home directory with a platform-specific hint on failure.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        let platform_help = if is_windows() {
            "On Windows: Check that the USERPROFILE environment variable is set"
        } else {
            "On Unix/Linux: Check that the HOME environment variable is set"
        };
        anyhow::anyhow!("Could not determine home directory.\n\n{platform_help}")
    })
}

/// Returns the Git executable name for the current platform.
#[must_use]
pub const fn get_git_command() -> &'static str {
    if is_windows() {
        "git.exe"
    } else {
        "git"
    }
}

/// Returns the Go executable name for the current platform.
#[must_use]
pub const fn get_go_command() -> &'static str {
    if is_windows() {
        "go.exe"
    } else {
        "go"
    }
}

/// Resolves a user supplied path.
///
/// A leading `~/` expands to the home directory and `$VAR` / `${VAR}`
/// references are substituted from the environment.
///
/// # Errors
///
/// Fails on `~user` forms, which are not supported, and on references to
/// undefined environment variables.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = if let Some(stripped) = path.strip_prefix("~/") {
        get_home_dir()?.join(stripped)
    } else if path.starts_with('~') && path.len() > 1 {
        return Err(anyhow::anyhow!(
            "Invalid path: {path}\n\n\
            Tilde expansion only supports '~/' for home directory.\n\
            Use '~/' followed by a relative path, like '~/.v2b/config.toml'"
        ));
    } else if path == "~" {
        get_home_dir()?
    } else {
        PathBuf::from(path)
    };

    let path_str = expanded.to_string_lossy();
    let expanded_str = shellexpand::env(&path_str)
        .with_context(|| {
            format!(
                "Failed to expand environment variables in path: {path_str}\n\n\
                Use $VAR or ${{VAR}} and make sure the variable is defined"
            )
        })?
        .into_owned();

    Ok(PathBuf::from(expanded_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names() {
        if is_windows() {
            assert_eq!(get_git_command(), "git.exe");
            assert_eq!(get_go_command(), "go.exe");
        } else {
            assert_eq!(get_git_command(), "git");
            assert_eq!(get_go_command(), "go");
        }
    }

    #[test]
    fn test_resolve_path_tilde() {
        let home = get_home_dir().unwrap();
        let resolved = resolve_path("~/.v2b/config.toml").unwrap();
        assert_eq!(resolved, home.join(".v2b/config.toml"));
    }

    #[test]
    fn test_resolve_path_plain() {
        let resolved = resolve_path("relative/config.toml").unwrap();
        assert_eq!(resolved, PathBuf::from("relative/config.toml"));
    }

    #[test]
    fn test_resolve_path_rejects_other_user() {
        assert!(resolve_path("~otheruser/config.toml").is_err());
    }

    #[test]
    fn test_resolve_path_undefined_variable() {
        let result = resolve_path("$V2B_SURELY_UNDEFINED_VARIABLE/config.toml");
        assert!(result.is_err());
    }
}
