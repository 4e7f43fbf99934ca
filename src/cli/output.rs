//! Rendering of command results as a table, JSON or YAML.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::constants::NOT_FOUND_MESSAGE;
use crate::models::{DependencyRecord, ResolutionOutcome};
use crate::modules::issues::{IssueKind, ModuleIssue};
use crate::resolver::{MergedResults, OutcomeBuckets};

/// Output formats accepted by `--format`.
pub const FORMATS: [&str; 3] = ["table", "json", "yaml"];

/// Per-category counts of a run, before any display filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub ordinary: usize,
    pub special: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_buckets(buckets: &OutcomeBuckets) -> Self {
        Self {
            ordinary: buckets.ordinary.len(),
            special: buckets.special.len(),
            failed: buckets.failed.len(),
        }
    }
}

#[derive(Serialize)]
struct CheckReport<'a> {
    modules: Vec<&'a ResolutionOutcome>,
    summary: Summary,
}

/// Prints merged outcomes in `format`.
pub fn print_outcomes(merged: &MergedResults, summary: Summary, format: &str) -> Result<()> {
    let report = CheckReport {
        modules: merged.iter().collect(),
        summary,
    };
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "yaml" => print!("{}", serde_yaml::to_string(&report)?),
        _ => print!("{}", render_outcome_table(merged, summary)),
    }
    Ok(())
}

/// Table of outcomes with a trailing summary line.
pub fn render_outcome_table(merged: &MergedResults, summary: Summary) -> String {
    if merged.is_empty() {
        return format!("No modules to report.\n{}\n", render_summary(summary));
    }

    let path_width = merged.iter().map(|o| o.module_path().len()).max().unwrap_or(0).max(6);
    let version_width = merged.iter().map(|o| o.version().len()).max().unwrap_or(0).max(7);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<path_width$}  {:<version_width$}  {}\n",
        "Module".bold(),
        "Version".bold(),
        "Branch".bold(),
    ));
    out.push_str(&format!("{}\n", "─".repeat(path_width + version_width + 20)));

    for outcome in merged.iter() {
        let branch = match outcome {
            ResolutionOutcome::Ordinary {
                branch,
                ..
            } => branch.normal(),
            ResolutionOutcome::Special {
                branch,
                ..
            } => branch.yellow().bold(),
            ResolutionOutcome::Failed {
                ..
            } => NOT_FOUND_MESSAGE.red(),
        };
        out.push_str(&format!(
            "{:<path_width$}  {:<version_width$}  {}\n",
            outcome.module_path(),
            outcome.version(),
            branch
        ));
    }

    out.push('\n');
    out.push_str(&render_summary(summary));
    out.push('\n');
    out
}

fn render_summary(summary: Summary) -> String {
    format!(
        "{} ordinary, {} special, {} not found",
        summary.ordinary,
        summary.special.to_string().yellow(),
        summary.failed.to_string().red()
    )
}

#[derive(Serialize)]
struct ModuleRow<'a> {
    id: usize,
    path: &'a str,
    version: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    indirect: bool,
}

/// Prints a module listing in `format`.
pub fn print_modules(records: &[DependencyRecord], format: &str) -> Result<()> {
    let rows: Vec<ModuleRow<'_>> = records
        .iter()
        .map(|record| ModuleRow {
            id: record.id,
            path: &record.module_path,
            version: &record.version,
            indirect: record.indirect,
        })
        .collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&rows)?),
        "yaml" => print!("{}", serde_yaml::to_string(&rows)?),
        _ => print!("{}", render_module_table(records)),
    }
    Ok(())
}

/// Table of modules with their ids.
pub fn render_module_table(records: &[DependencyRecord]) -> String {
    if records.is_empty() {
        return "No modules found.\n".to_string();
    }

    let path_width = records.iter().map(|r| r.module_path.len()).max().unwrap_or(0).max(6);

    let mut out = format!("{:>4}  {:<path_width$}  {}\n", "ID".bold(), "Module".bold(), "Version".bold());
    out.push_str(&format!("{}\n", "─".repeat(path_width + 30)));
    for record in records {
        let version = if record.version.is_empty() {
            "-".dimmed()
        } else {
            record.version.normal()
        };
        let marker = if record.indirect {
            " (indirect)".dimmed().to_string()
        } else {
            String::new()
        };
        out.push_str(&format!(
            "{:>4}  {:<path_width$}  {}{}\n",
            record.id, record.module_path, version, marker
        ));
    }
    out
}

/// Prints outdated or deprecated modules in `format`.
pub fn print_issues(issues: &[ModuleIssue], kind: IssueKind, format: &str) -> Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(issues)?),
        "yaml" => print!("{}", serde_yaml::to_string(issues)?),
        _ => print!("{}", render_issue_table(issues, kind)),
    }
    Ok(())
}

/// Table of module issues; the last column is the newer version or the
/// deprecation message.
pub fn render_issue_table(issues: &[ModuleIssue], kind: IssueKind) -> String {
    let (empty, detail_header) = match kind {
        IssueKind::Outdated => ("All modules are up to date.\n", "Latest"),
        IssueKind::Deprecated => ("No deprecated modules.\n", "Deprecation"),
    };
    if issues.is_empty() {
        return empty.to_string();
    }

    let path_width = issues.iter().map(|i| i.path.len()).max().unwrap_or(0).max(6);
    let version_width = issues.iter().map(|i| i.version.len()).max().unwrap_or(0).max(7);

    let mut out = format!(
        "{:>4}  {:<path_width$}  {:<version_width$}  {}\n",
        "ID".bold(),
        "Module".bold(),
        "Version".bold(),
        detail_header.bold()
    );
    out.push_str(&format!("{}\n", "─".repeat(path_width + version_width + 24)));
    for issue in issues {
        out.push_str(&format!(
            "{:>4}  {:<path_width$}  {:<version_width$}  {}\n",
            issue.id,
            issue.path,
            issue.version,
            issue.detail.yellow()
        ));
    }
    out
}
