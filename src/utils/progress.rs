//! Progress indicators for long-running operations
//!
//! A thin wrapper over [`indicatif`] with v2b's styling. Progress is hidden
//! when the caller disables it (`--no-progress`, `--quiet`) or when stderr is
//! not a terminal, so piped output and CI logs stay clean.
//!
//! [`ProgressBar`] is cheap to clone and safe to tick from many workers at once.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Returns true when progress output should be suppressed.
fn is_progress_disabled(requested_off: bool) -> bool {
    requested_off || !std::io::stderr().is_terminal()
}

/// Progress bar with consistent styling.
///
/// # Examples
///
/// ```rust
/// use v2b_cli::utils::progress::ProgressBar;
///
/// let progress = ProgressBar::new(50, true);
/// progress.set_message("Resolving branches");
/// for _ in 0..50 {
///     progress.inc(1);
/// }
/// progress.finish_and_clear();
/// ```
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a progress bar tracking `len` units of work.
    ///
    /// `disabled` produces a hidden bar that silently ignores updates.
    pub fn new(len: u64, disabled: bool) -> Self {
        let bar = if is_progress_disabled(disabled) {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new(len);
            if let Some(style) = default_style() {
                bar.set_style(style);
            }
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Creates a spinner for work of unknown length.
    pub fn new_spinner(disabled: bool) -> Self {
        let bar = if is_progress_disabled(disabled) {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            if let Some(style) = spinner_style() {
                bar.set_style(style);
            }
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        Self {
            inner: bar,
        }
    }

    /// Creates a bar that never draws.
    pub fn hidden() -> Self {
        Self {
            inner: IndicatifBar::hidden(),
        }
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    /// Current position, mostly useful in tests.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.inner.finish_with_message(msg.into());
    }

    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

fn default_style() -> Option<IndicatifStyle> {
    IndicatifStyle::default_bar()
        .template("{msg:.bold} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .ok()
        .map(|style| style.progress_chars("━╸━"))
}

fn spinner_style() -> Option<IndicatifStyle> {
    IndicatifStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .ok()
        .map(|style| style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_bar_still_counts() {
        let progress = ProgressBar::new(10, true);
        progress.inc(3);
        progress.inc(2);
        assert_eq!(progress.position(), 5);
        progress.finish_and_clear();
    }

    #[test]
    fn test_clones_share_position() {
        let progress = ProgressBar::hidden();
        let other = progress.clone();
        other.inc(4);
        assert_eq!(progress.position(), 4);
    }

    #[test]
    fn test_spinner_disabled() {
        let spinner = ProgressBar::new_spinner(true);
        spinner.set_message("Listing modules");
        spinner.finish_with_message("done");
    }
}
