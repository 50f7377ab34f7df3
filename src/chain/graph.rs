//! Dependency graph of the chain
//!
//! Edges run from a dependency to its dependent. A project that omits
//! `depends_on` depends on the project declared right before it, so a plain
//! list behaves as a linear chain.

use super::project::Project;
use crate::config::Config;
use crate::error::{DepchainError, DepchainResult};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed};
use petgraph::Direction;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::path::Path;

/// Projects plus their dependency edges, with a fixed processing order
#[derive(Debug)]
pub struct ProjectGraph {
    graph: DiGraph<Project, ()>,
    by_name: HashMap<String, NodeIndex>,
    order: Vec<NodeIndex>,
}

impl ProjectGraph {
    /// Build and validate the graph from configuration.
    ///
    /// `config_path` is only used to attribute configuration errors.
    pub fn from_config(
        config: &Config,
        install_root: &Path,
        config_path: &Path,
    ) -> DepchainResult<Self> {
        let invalid = |reason: String| DepchainError::ConfigInvalid {
            path: config_path.to_path_buf(),
            reason,
        };

        let mut graph = DiGraph::new();
        let mut by_name = HashMap::new();

        // First pass: one node per project, in declaration order
        for entry in &config.projects {
            let project = Project::from_config(entry, install_root).map_err(invalid)?;
            let name = project.identity().to_string();
            if by_name.contains_key(&name) {
                return Err(invalid(format!("duplicate project {}", name)));
            }
            let idx = graph.add_node(project);
            by_name.insert(name, idx);
        }

        // Second pass: edges from dependency to dependent
        let nodes: Vec<NodeIndex> = graph.node_indices().collect();
        for (position, entry) in config.projects.iter().enumerate() {
            let dependent = nodes[position];
            match &entry.depends_on {
                None => {
                    if position > 0 {
                        graph.update_edge(nodes[position - 1], dependent, ());
                    }
                }
                Some(names) => {
                    for name in names {
                        let dependency = by_name.get(name.as_str()).copied().ok_or_else(|| {
                            invalid(format!(
                                "{} depends on unknown project {}",
                                graph[dependent].identity(),
                                name
                            ))
                        })?;
                        graph.update_edge(dependency, dependent, ());
                    }
                }
            }
        }

        let order = stable_topological_order(&graph)?;

        Ok(Self {
            graph,
            by_name,
            order,
        })
    }

    /// Number of projects
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Processing order: dependencies first, ties broken by declaration order
    pub fn order(&self) -> &[NodeIndex] {
        &self.order
    }

    pub fn project(&self, idx: NodeIndex) -> &Project {
        &self.graph[idx]
    }

    /// Look up a project by identity
    pub fn index_of(&self, name: &str) -> DepchainResult<NodeIndex> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| DepchainError::UnknownProject(name.to_string()))
    }

    /// Direct dependencies of a project, in declaration order
    pub fn dependencies(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut deps: Vec<_> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .collect();
        deps.sort();
        deps
    }

    /// Every project reachable downstream of `idx`, excluding `idx`
    pub fn descendants(&self, idx: NodeIndex) -> HashSet<NodeIndex> {
        let mut found = HashSet::new();
        let mut dfs = Dfs::new(&self.graph, idx);
        while let Some(node) = dfs.next(&self.graph) {
            if node != idx {
                found.insert(node);
            }
        }
        found
    }

    /// Every project `idx` transitively depends on, excluding `idx`
    pub fn ancestors(&self, idx: NodeIndex) -> HashSet<NodeIndex> {
        let reversed = Reversed(&self.graph);
        let mut found = HashSet::new();
        let mut dfs = Dfs::new(reversed, idx);
        while let Some(node) = dfs.next(reversed) {
            if node != idx {
                found.insert(node);
            }
        }
        found
    }
}

/// Kahn's algorithm, always releasing the earliest declared ready project
fn stable_topological_order(graph: &DiGraph<Project, ()>) -> DepchainResult<Vec<NodeIndex>> {
    let mut in_degree: HashMap<NodeIndex, usize> = graph
        .node_indices()
        .map(|idx| (idx, graph.neighbors_directed(idx, Direction::Incoming).count()))
        .collect();

    let mut ready: BinaryHeap<Reverse<NodeIndex>> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(&idx, _)| Reverse(idx))
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(Reverse(idx)) = ready.pop() {
        order.push(idx);
        for dependent in graph.neighbors_directed(idx, Direction::Outgoing) {
            if let Some(degree) = in_degree.get_mut(&dependent) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }
    }

    if order.len() < graph.node_count() {
        let stuck = graph
            .node_indices()
            .find(|idx| !order.contains(idx))
            .map(|idx| graph[idx].identity().to_string())
            .unwrap_or_default();
        return Err(DepchainError::DependencyCycle(stuck));
    }

    Ok(order)
}
