//! Module graph queries: `go mod graph` and `go mod why -m`.

use std::collections::BTreeMap;

/// One `path@version` node of the module graph. The main module has no version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Requirement {
    pub path: String,
    pub version: String,
}

impl Requirement {
    /// Splits `path@version`.
    pub fn parse(node: &str) -> Self {
        match node.split_once('@') {
            Some((path, version)) => Self {
                path: path.to_string(),
                version: version.to_string(),
            },
            None => Self {
                path: node.to_string(),
                version: String::new(),
            },
        }
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}@{}", self.path, self.version)
        }
    }
}

/// Requirements grouped by the node that declares them, in node order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: BTreeMap<String, Vec<Requirement>>,
}

impl DependencyGraph {
    /// `(node, requirements)` pairs ordered by node.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &[Requirement])> {
        self.edges.iter().map(|(source, targets)| (source.as_str(), targets.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Keeps only the nodes of `module_path`, at any version.
    #[must_use]
    pub fn for_module(mut self, module_path: &str) -> Self {
        self.edges.retain(|source, _| Requirement::parse(source).path == module_path);
        self
    }
}

/// Parses `go mod graph` output: one `from to` pair per line.
///
/// ```rust
/// use v2b_cli::modules::graph::parse_graph;
///
/// let graph = parse_graph("example.com/app golang.org/x/text@v0.14.0\n");
/// let (source, targets) = graph.edges().next().unwrap();
/// assert_eq!(source, "example.com/app");
/// assert_eq!(targets[0].version, "v0.14.0");
/// ```
pub fn parse_graph(output: &str) -> DependencyGraph {
    let mut edges: BTreeMap<String, Vec<Requirement>> = BTreeMap::new();
    for line in output.lines() {
        let mut fields = line.split_whitespace();
        let (Some(source), Some(target)) = (fields.next(), fields.next()) else {
            continue;
        };
        edges.entry(source.to_string()).or_default().push(Requirement::parse(target));
    }
    DependencyGraph {
        edges,
    }
}

/// Why a module is part of the build, from `go mod why -m`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleExplanation {
    pub module_path: String,
    /// Shortest import chain from the main module, empty when the module is
    /// not needed by any package
    pub import_chain: Vec<String>,
}

impl ModuleExplanation {
    pub fn is_needed(&self) -> bool {
        !self.import_chain.is_empty()
    }
}

/// Parses `go mod why -m` output.
///
/// Every queried module starts a `# <path>` block followed by the import
/// chain, or by a parenthesized note when nothing imports it.
pub fn parse_why(output: &str) -> Vec<ModuleExplanation> {
    let mut explanations: Vec<ModuleExplanation> = Vec::new();
    for line in output.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(module_path) = line.strip_prefix("# ") {
            explanations.push(ModuleExplanation {
                module_path: module_path.to_string(),
                import_chain: Vec::new(),
            });
        } else if line.starts_with('(') {
            continue;
        } else if let Some(current) = explanations.last_mut() {
            current.import_chain.push(line.to_string());
        }
    }
    explanations
}
