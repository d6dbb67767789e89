//! Advisory lint checks (L001–L002).
//!
//! Lint findings are subjective and never blocking: the configuration is
//! valid as written, these just describe ways to improve it. They only run
//! when the caller opts in via `ValidateOpts::lint_checks`. Each advisory is
//! emitted once per declaration site, with no cross-site deduplication.

use std::collections::BTreeSet;

use crate::config::{Config, Expr};
use crate::diagnostics::{Diagnostic, Diagnostics};

/// Run all lint rules. `referenced` holds the base addresses of every
/// reference found anywhere in the module.
pub fn lint_module(config: &Config, referenced: &BTreeSet<String>) -> Diagnostics {
    let mut diags = Diagnostics::new();

    l001_unused_variables(config, referenced, &mut diags);
    l002_redundant_interpolation(config, &mut diags);

    diags
}

fn l001_unused_variables(
    config: &Config,
    referenced: &BTreeSet<String>,
    diags: &mut Diagnostics,
) {
    for name in config.module.variables.keys() {
        let address = format!("var.{}", name);
        if !referenced.contains(&address) {
            diags.push(
                Diagnostic::warning(
                    "L001",
                    format!("Input variable '{}' is declared but never used", name),
                )
                .with_address(address),
            );
        }
    }
}

fn l002_redundant_interpolation(config: &Config, diags: &mut Diagnostics) {
    for resource in &config.module.resources {
        for expr in resource.attributes.values() {
            check_redundant_interpolation(expr, &resource.address(), diags);
        }
    }
    for (name, output) in &config.module.outputs {
        check_redundant_interpolation(&output.value, &format!("output.{}", name), diags);
    }
}

/// An interpolation wrapping a single reference is a deprecated construct;
/// a direct reference keeps the referenced value's type.
fn check_redundant_interpolation(expr: &Expr, at: &str, diags: &mut Diagnostics) {
    match expr {
        Expr::Concat { parts } => {
            if let [Expr::Ref { target }] = parts.as_slice() {
                diags.push(
                    Diagnostic::warning(
                        "L002",
                        format!(
                            "Interpolation wrapping the single reference '{}' is deprecated; \
                             use a direct reference instead",
                            target
                        ),
                    )
                    .with_address(at),
                );
            }
            for part in parts {
                check_redundant_interpolation(part, at, diags);
            }
        }
        Expr::Literal { .. } | Expr::Ref { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    #[test]
    fn flags_unused_variable() {
        let cfg = config::parse(
            r#"{ "module": { "variables": { "region": { "type": "string" } } } }"#,
        )
        .expect("should parse");
        let diags = lint_module(&cfg, &BTreeSet::new());
        let diag = diags.iter().find(|d| d.code == "L001").expect("L001");
        assert_eq!(diag.address.as_deref(), Some("var.region"));
        assert!(!diags.has_errors());
    }

    #[test]
    fn used_variable_is_not_flagged() {
        let cfg = config::parse(
            r#"{ "module": { "variables": { "region": { "type": "string" } } } }"#,
        )
        .expect("should parse");
        let referenced: BTreeSet<String> = ["var.region".to_string()].into_iter().collect();
        let diags = lint_module(&cfg, &referenced);
        assert!(diags.iter().all(|d| d.code != "L001"));
    }

    #[test]
    fn flags_redundant_interpolation() {
        let cfg = config::parse(
            r#"{
                "module": {
                    "variables": { "region": {} },
                    "outputs": {
                        "where": { "value": { "kind": "concat", "parts": [
                            { "kind": "ref", "target": "var.region" }
                        ] } }
                    }
                }
            }"#,
        )
        .expect("should parse");
        let referenced: BTreeSet<String> = ["var.region".to_string()].into_iter().collect();
        let diags = lint_module(&cfg, &referenced);
        assert!(diags.iter().any(|d| d.code == "L002"));
    }
}
