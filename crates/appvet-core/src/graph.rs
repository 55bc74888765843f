//! Dependency graph construction.
//!
//! Builds a petgraph directed graph over a candidate batch: one node per
//! app, one edge per declared dependency, verbatim. Names that are only
//! ever depended on (external services, missing apps) get nodes too, so a
//! rendering of the graph shows where every declaration points, but they
//! are not apps and `contains` does not claim them.

use std::collections::{HashMap, HashSet};

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use appvet_types::manifest::CandidateApp;

/// A directed graph of dependency declarations.
///
/// Edges point from an app to the name it depends on. Parallel edges are
/// kept when a manifest declares the same dependency twice, so the graph
/// mirrors the manifests exactly.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
    apps: HashSet<String>,
}

impl DependencyGraph {
    /// Build the graph for `apps` without mutating them.
    pub fn build(apps: &[CandidateApp]) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes: HashMap<String, NodeIndex> = HashMap::new();

        for app in apps {
            nodes
                .entry(app.name.clone())
                .or_insert_with(|| graph.add_node(app.name.clone()));
        }

        for app in apps {
            let from = nodes[&app.name];
            for dependency in app.dependencies() {
                let to = *nodes
                    .entry(dependency.clone())
                    .or_insert_with(|| graph.add_node(dependency.clone()));
                graph.add_edge(from, to, ());
            }
        }

        Self {
            graph,
            nodes,
            apps: apps.iter().map(|app| app.name.clone()).collect(),
        }
    }

    /// Whether `name` is one of the apps the graph was built from.
    pub fn contains(&self, name: &str) -> bool {
        self.apps.contains(name)
    }

    /// Dependencies declared by `name`, in declaration order, verbatim.
    pub fn declared_dependencies(&self, name: &str) -> Vec<&str> {
        let Some(&idx) = self.nodes.get(name) else {
            return Vec::new();
        };
        // edges() yields the most recently added edge first; reverse to
        // recover declaration order.
        let mut deps: Vec<&str> = self
            .graph
            .edges(idx)
            .map(|edge| self.graph[edge.target()].as_str())
            .collect();
        deps.reverse();
        deps
    }

    /// Number of apps in the graph (dependency-only names not counted).
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Render the graph in Graphviz DOT format.
    pub fn to_dot(&self) -> String {
        format!(
            "{:?}",
            Dot::with_config(&self.graph, &[Config::EdgeNoLabel])
        )
    }
}
