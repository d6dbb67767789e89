//! Validation-mode graph assembly.
//!
//! Builds the dependency graph the walk traverses. Builder-fatal conditions
//! are the ones that make a traversal meaningless: duplicate addresses,
//! explicit dependencies on unknown resources, and cycles. Unresolvable
//! expression references are left for the walk to report per reference site.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use tracing::debug;

use crate::addr::Reference;
use crate::config::Config;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::graph::{EdgeKind, ValidationGraph};

/// Placeholder for persisted run state. Validation always builds against a
/// fresh one; plan/apply will thread real state through here.
#[derive(Debug, Default)]
pub struct State;

impl State {
    pub fn new() -> State {
        State
    }
}

pub struct GraphBuilder<'a> {
    pub config: &'a Config,
    /// Validation mode: the graph must not depend on persisted run state.
    pub validate: bool,
    pub state: State,
}

impl<'a> GraphBuilder<'a> {
    pub fn build(self) -> Result<ValidationGraph, Diagnostics> {
        let module = &self.config.module;
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut diags = Diagnostics::new();

        // Validation mode builds against a fresh `State` and never reads it.
        debug!(validate = self.validate, "building dependency graph");

        for name in module.variables.keys() {
            let address = format!("var.{}", name);
            let idx = graph.add_node(address.clone());
            node_indices.insert(address, idx);
        }

        for resource in &module.resources {
            let address = resource.address();
            if node_indices.contains_key(&address) {
                diags.push(
                    Diagnostic::error(
                        "G001",
                        format!("Duplicate resource address '{}'", address),
                    )
                    .with_address(address.clone()),
                );
                continue;
            }
            let idx = graph.add_node(address.clone());
            node_indices.insert(address, idx);
        }

        for name in module.outputs.keys() {
            let address = format!("output.{}", name);
            let idx = graph.add_node(address.clone());
            node_indices.insert(address, idx);
        }

        // Reference edges. Targets that don't resolve to a declared node are
        // skipped here; the walk reports them with full context.
        for resource in &module.resources {
            let Some(&dependent) = node_indices.get(&resource.address()) else {
                continue;
            };
            let mut refs = Vec::new();
            for expr in resource.attributes.values() {
                expr.references(&mut refs);
            }
            for target in &refs {
                if let Some(reference) = Reference::parse(target) {
                    if let Some(&dep) = node_indices.get(&reference.subject.address()) {
                        graph.add_edge(dep, dependent, EdgeKind::Reference);
                    }
                }
            }

            for target in &resource.depends_on {
                match node_indices.get(target.as_str()) {
                    Some(&dep) => {
                        graph.add_edge(dep, dependent, EdgeKind::Explicit);
                    }
                    None => diags.push(
                        Diagnostic::error(
                            "G002",
                            format!(
                                "Resource '{}' depends on '{}', which is not declared",
                                resource.address(),
                                target
                            ),
                        )
                        .with_address(resource.address()),
                    ),
                }
            }
        }

        for (name, output) in &module.outputs {
            let Some(&dependent) = node_indices.get(format!("output.{}", name).as_str()) else {
                continue;
            };
            let mut refs = Vec::new();
            output.value.references(&mut refs);
            for target in &refs {
                if let Some(reference) = Reference::parse(target) {
                    if let Some(&dep) = node_indices.get(&reference.subject.address()) {
                        graph.add_edge(dep, dependent, EdgeKind::Reference);
                    }
                }
            }
        }

        if let Err(cycle) = toposort(&graph, None) {
            diags.push(
                Diagnostic::error(
                    "G003",
                    format!(
                        "Dependency cycle detected through '{}'",
                        graph[cycle.node_id()]
                    ),
                )
                .with_address(graph[cycle.node_id()].clone()),
            );
        }

        if diags.has_errors() {
            return Err(diags);
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "validation graph assembled"
        );
        Ok(ValidationGraph { graph, node_indices })
    }
}
