//! Cross-platform utilities and helpers
//!
//! - [`platform`] - Tool executable names and path resolution
//! - [`progress`] - Progress bars and spinners for long-running operations

pub mod platform;
pub mod progress;

pub use platform::{get_git_command, get_go_command, get_home_dir, resolve_path};
pub use progress::ProgressBar;
