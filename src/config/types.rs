//! Rust types for the parsed configuration tree.
//!
//! These are the serde target for the configuration JSON produced by the
//! loader frontend. The tree is immutable for the duration of a validation
//! run; this crate only reads it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Ty;

// =============================================================================
// TOP-LEVEL CONFIGURATION
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Version constraints the running core must satisfy, e.g. `">=0.1.0"`.
    #[serde(default)]
    pub required_version: Vec<String>,
    /// Providers the configuration depends on, keyed by local name.
    #[serde(default)]
    pub required_providers: BTreeMap<String, ProviderRequirement>,
    /// The root module.
    pub module: Module,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRequirement {
    pub source: String,
    #[serde(default)]
    pub version: Option<String>,
}

// =============================================================================
// ROOT MODULE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    #[serde(default)]
    pub variables: BTreeMap<String, VariableDecl>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub outputs: BTreeMap<String, Output>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDecl {
    /// Declared type, if any. `None` means the type is unconstrained and the
    /// variable validates as fully dynamic.
    #[serde(rename = "type", default)]
    pub ty: Option<Ty>,
    #[serde(default)]
    pub description: Option<String>,
    /// Deprecation message. Referencing a deprecated variable produces a
    /// non-fatal warning.
    #[serde(default)]
    pub deprecated: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub kind: String,
    pub name: String,
    /// Local name of the provider this resource belongs to; must be declared
    /// in `required_providers`.
    pub provider: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, Expr>,
    /// Explicit dependencies on other resources, by address.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl Resource {
    pub fn address(&self) -> String {
        format!("{}.{}", self.kind, self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub value: Expr,
    #[serde(default)]
    pub description: Option<String>,
}

// =============================================================================
// EXPRESSIONS
// =============================================================================

/// Attribute expression, the surface the walk type-checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Expr {
    Literal { value: serde_json::Value },
    Ref { target: String },
    /// String interpolation: every part must be string-coercible.
    Concat { parts: Vec<Expr> },
}

impl Expr {
    /// Collect every `Ref` target in this expression, in evaluation order.
    pub fn references(&self, out: &mut Vec<String>) {
        match self {
            Expr::Literal { .. } => {}
            Expr::Ref { target } => out.push(target.clone()),
            Expr::Concat { parts } => {
                for part in parts {
                    part.references(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_nested_references() {
        let expr = Expr::Concat {
            parts: vec![
                Expr::Literal {
                    value: serde_json::json!("https://"),
                },
                Expr::Ref {
                    target: "compute_instance.web.host".into(),
                },
                Expr::Concat {
                    parts: vec![Expr::Ref {
                        target: "var.port".into(),
                    }],
                },
            ],
        };
        let mut refs = Vec::new();
        expr.references(&mut refs);
        assert_eq!(refs, vec!["compute_instance.web.host", "var.port"]);
    }

    #[test]
    fn variable_type_deserializes_from_source_form() {
        let decl: VariableDecl =
            serde_json::from_str(r#"{ "type": "list(string)" }"#).expect("should deserialize");
        assert_eq!(decl.ty, Some(Ty::List(Box::new(Ty::String))));
    }
}
