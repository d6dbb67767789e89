//! petgraph-based dependency graph over configuration declarations.

pub mod builder;

pub use builder::{GraphBuilder, State};

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

/// Why an edge exists: an expression reference, or an explicit `depends_on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Reference,
    Explicit,
}

/// Directed dependency graph. Nodes are declaration addresses (`var.region`,
/// `compute_instance.web`, `output.endpoint`); edges point from a dependency
/// to its dependent, so a topological order visits leaves first.
#[derive(Debug)]
pub struct ValidationGraph {
    pub graph: DiGraph<String, EdgeKind>,
    pub node_indices: HashMap<String, NodeIndex>,
}

impl ValidationGraph {
    pub fn contains(&self, address: &str) -> bool {
        self.node_indices.contains_key(address)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn dependencies(&self, address: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(address) else {
            return vec![];
        };
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .map(|n| self.graph[n].as_str())
            .collect()
    }
}
