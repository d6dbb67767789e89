//! Graph walk: per-node semantic checks over the assembled graph.
//!
//! Visits declarations in dependency order, evaluating every expression
//! against the synthesized unknown inputs. Produces two diagnostic streams:
//! incidental non-fatal findings (deprecations, lint advisories) in the
//! `WalkReport`, and the walk's own diagnostics (which may contain fatal
//! errors) as the second return value. The orchestrator appends both, in
//! that order.

pub mod eval;
pub mod lint;

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::toposort;
use tracing::debug;

use crate::addr::Reference;
use crate::config::{Config, Resource};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::graph::ValidationGraph;
use crate::value::{InputValues, Ty, Value};
use eval::Scope;

/// How the graph is being walked. Validation treats every input as unknown
/// and touches no external state; plan/apply walks will be further modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    Validate,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOpts {
    /// Enable advisory lint checks on top of the blocking semantic checks.
    pub lint_checks: bool,
}

/// Findings accumulated incidentally during the traversal; never fatal.
#[derive(Debug, Default)]
pub struct WalkReport {
    pub non_fatal: Diagnostics,
}

/// Walk the graph in dependency order.
pub fn walk(
    graph: &ValidationGraph,
    mode: WalkMode,
    config: &Config,
    inputs: &InputValues,
    opts: &WalkOpts,
) -> (WalkReport, Diagnostics) {
    debug!(?mode, lint = opts.lint_checks, "walking graph");

    let mut report = WalkReport::default();
    let mut diags = Diagnostics::new();

    let order = match toposort(&graph.graph, None) {
        Ok(indices) => indices,
        Err(cycle) => {
            // The builder rejects cyclic graphs, so a hand-assembled graph is
            // the only way here.
            diags.push(
                Diagnostic::error(
                    "E110",
                    format!(
                        "Cannot walk graph: dependency cycle through '{}'",
                        graph.graph[cycle.node_id()]
                    ),
                )
                .with_address(graph.graph[cycle.node_id()].clone()),
            );
            return (report, diags);
        }
    };

    let referenced = referenced_addresses(config);
    let resources: BTreeMap<String, &Resource> = config
        .module
        .resources
        .iter()
        .map(|r| (r.address(), r))
        .collect();

    let mut scope = Scope::new();
    for idx in order {
        let address = graph.graph[idx].as_str();

        if let Some(name) = address.strip_prefix("var.") {
            walk_variable(name, address, config, inputs, &referenced, &mut scope, &mut report);
        } else if let Some(name) = address.strip_prefix("output.") {
            if let Some(output) = config.module.outputs.get(name) {
                eval::eval_expr(&output.value, &scope, address, &mut diags);
            }
        } else if let Some(resource) = resources.get(address) {
            walk_resource(resource, &mut scope, config, &mut diags);
        }
    }

    if opts.lint_checks && mode == WalkMode::Validate {
        report.non_fatal.extend(lint::lint_module(config, &referenced));
    }

    (report, diags)
}

fn walk_variable(
    name: &str,
    address: &str,
    config: &Config,
    inputs: &InputValues,
    referenced: &BTreeSet<String>,
    scope: &mut Scope,
    report: &mut WalkReport,
) {
    if let Some(decl) = config.module.variables.get(name) {
        if let Some(message) = &decl.deprecated {
            if referenced.contains(address) {
                report.non_fatal.push(
                    Diagnostic::warning(
                        "W001",
                        format!("Input variable '{}' is deprecated: {}", name, message),
                    )
                    .with_address(address),
                );
            }
        }
    }
    let value = inputs
        .get(name)
        .map(|input| input.value.clone())
        .unwrap_or_else(|| Value::unknown(Ty::Dynamic));
    scope.insert(address.to_string(), value);
}

fn walk_resource(
    resource: &Resource,
    scope: &mut Scope,
    config: &Config,
    diags: &mut Diagnostics,
) {
    let address = resource.address();

    if !config.required_providers.contains_key(&resource.provider) {
        diags.push(
            Diagnostic::error(
                "E201",
                format!(
                    "Resource '{}' uses provider '{}', which is not declared in required_providers",
                    address, resource.provider
                ),
            )
            .with_address(address.clone()),
        );
    }

    for expr in resource.attributes.values() {
        eval::eval_expr(expr, scope, &address, diags);
    }

    // The resource's own value is unknown until something is actually
    // deployed; downstream references type-check against a dynamic unknown.
    scope.insert(address, Value::unknown(Ty::Dynamic));
}

/// Base addresses of every reference in the module, including explicit
/// `depends_on` targets. Used for deprecation and unused-declaration checks.
fn referenced_addresses(config: &Config) -> BTreeSet<String> {
    let mut raw = Vec::new();
    for resource in &config.module.resources {
        for expr in resource.attributes.values() {
            expr.references(&mut raw);
        }
        raw.extend(resource.depends_on.iter().cloned());
    }
    for output in config.module.outputs.values() {
        output.value.references(&mut raw);
    }

    raw.iter()
        .filter_map(|target| Reference::parse(target))
        .map(|r| r.subject.address())
        .collect()
}
