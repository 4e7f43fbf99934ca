//! Inspect and pin module dependencies.
//!
//! # Examples
//!
//! ```bash
//! # Freeze a module at its current version with a replace directive
//! v2b dependency pin github.com/acme/widgets
//!
//! # Remove that replace directive again
//! v2b dependency unpin github.com/acme/widgets
//!
//! # Show the import chain that pulls a module in
//! v2b dependency why golang.org/x/text
//!
//! # Requirement graph, optionally only the requirements of one module
//! v2b dependency graph
//! v2b dependency graph github.com/acme/widgets
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;
use super::common::CommandContext;
use crate::modules::graph::{DependencyGraph, ModuleExplanation};

#[derive(Args, Debug)]
pub struct DependencyCommand {
    #[command(subcommand)]
    command: DependencySubcommands,

    /// Directory containing go.mod (defaults to the current directory)
    #[arg(short, long, global = true, value_name = "DIR")]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum DependencySubcommands {
    /// Pin a module to its current version with a replace directive
    Pin {
        /// Module path, e.g. github.com/acme/widgets
        module_path: String,
    },

    /// Drop the replace directive of a module
    Unpin {
        /// Module path, e.g. github.com/acme/widgets
        module_path: String,
    },

    /// Explain why a module is part of the build
    Why {
        /// Module path, e.g. golang.org/x/text
        module_path: String,
    },

    /// Show the module requirement graph
    Graph {
        /// Only show the requirements declared by this module
        module_path: Option<String>,
    },
}

impl DependencyCommand {
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(config, self.dir.as_deref()).await?;
        match self.command {
            DependencySubcommands::Pin {
                module_path,
            } => {
                let version = ctx.source.pin_module(&module_path).await?;
                println!("{} {} pinned to {}", "✓".green(), module_path, version.yellow());
            }
            DependencySubcommands::Unpin {
                module_path,
            } => {
                ctx.source.unpin_module(&module_path).await?;
                println!("{} {} unpinned", "✓".green(), module_path);
            }
            DependencySubcommands::Why {
                module_path,
            } => {
                let explanations = ctx.source.explain(&module_path).await?;
                print!("{}", render_explanations(&module_path, &explanations));
            }
            DependencySubcommands::Graph {
                module_path,
            } => {
                let mut graph = ctx.source.dependency_graph().await?;
                if let Some(module_path) = &module_path {
                    graph = graph.for_module(module_path);
                }
                print!("{}", render_graph(&graph));
            }
        }
        Ok(())
    }
}

fn render_explanations(module_path: &str, explanations: &[ModuleExplanation]) -> String {
    let mut out = String::new();
    for explanation in explanations {
        out.push_str(&format!("{}\n", explanation.module_path.bold()));
        if explanation.is_needed() {
            for (depth, package) in explanation.import_chain.iter().enumerate() {
                out.push_str(&format!("{}{}\n", "  ".repeat(depth + 1), package));
            }
        } else {
            out.push_str(&format!("  {}\n", "not needed by any package of the main module".dimmed()));
        }
    }
    if out.is_empty() {
        out = format!("No explanation for {module_path}.\n");
    }
    out
}

fn render_graph(graph: &DependencyGraph) -> String {
    if graph.is_empty() {
        return "No requirements found.\n".to_string();
    }
    let mut out = String::new();
    for (source, targets) in graph.edges() {
        out.push_str(&format!("{}\n", source.bold()));
        for target in targets {
            out.push_str(&format!("  └── {target}\n"));
        }
    }
    out
}
