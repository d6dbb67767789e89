//! Expression evaluation against a scope of (mostly unknown) values.
//!
//! Evaluation is total: every failure appends a diagnostic and yields a fully
//! dynamic unknown, so one bad expression never hides errors elsewhere.

use std::collections::BTreeMap;

use crate::addr::{Reference, Referenceable};
use crate::config::Expr;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::value::{Ty, Value};

/// Values already produced by the walk, keyed by declaration address.
pub type Scope = BTreeMap<String, Value>;

/// Evaluate an expression. `at` is the address of the declaration being
/// checked and tags every diagnostic produced here.
pub fn eval_expr(expr: &Expr, scope: &Scope, at: &str, diags: &mut Diagnostics) -> Value {
    match expr {
        Expr::Literal { value } => Value::from_json(value),
        Expr::Ref { target } => eval_ref(target, scope, at, diags),
        Expr::Concat { parts } => eval_concat(parts, scope, at, diags),
    }
}

fn eval_ref(target: &str, scope: &Scope, at: &str, diags: &mut Diagnostics) -> Value {
    let Some(reference) = Reference::parse(target) else {
        diags.push(
            Diagnostic::error("E100", format!("Malformed reference '{}'", target))
                .with_address(at),
        );
        return Value::unknown(Ty::Dynamic);
    };

    let address = reference.subject.address();
    let Some(base) = scope.get(&address) else {
        let diag = match &reference.subject {
            Referenceable::InputVariable(name) => Diagnostic::error(
                "E101",
                format!("Reference to undeclared input variable '{}'", name),
            ),
            Referenceable::Resource { .. } => Diagnostic::error(
                "E102",
                format!("Reference to undeclared resource '{}'", address),
            ),
        };
        diags.push(diag.with_address(at));
        return Value::unknown(Ty::Dynamic);
    };

    apply_attr_path(base.clone(), &reference.attr_path, target, at, diags)
}

fn apply_attr_path(
    mut value: Value,
    path: &[String],
    target: &str,
    at: &str,
    diags: &mut Diagnostics,
) -> Value {
    for segment in path {
        value = match value {
            Value::Unknown(Ty::Dynamic) => Value::unknown(Ty::Dynamic),
            Value::Unknown(Ty::Map(el)) => Value::unknown(*el),
            Value::Unknown(Ty::List(el)) => {
                if segment.parse::<usize>().is_ok() {
                    Value::unknown(*el)
                } else {
                    return type_error(&Ty::List(el), segment, target, at, diags);
                }
            }
            Value::Map(entries) => match entries.get(segment) {
                Some(v) => v.clone(),
                None => {
                    diags.push(
                        Diagnostic::error(
                            "E105",
                            format!("'{}' has no attribute '{}'", target, segment),
                        )
                        .with_address(at),
                    );
                    return Value::unknown(Ty::Dynamic);
                }
            },
            Value::List(items) => match segment.parse::<usize>().ok().and_then(|i| items.get(i)) {
                Some(v) => v.clone(),
                None => {
                    diags.push(
                        Diagnostic::error(
                            "E105",
                            format!("'{}' has no element '{}'", target, segment),
                        )
                        .with_address(at),
                    );
                    return Value::unknown(Ty::Dynamic);
                }
            },
            other => {
                let ty = other.ty();
                return type_error(&ty, segment, target, at, diags);
            }
        };
    }
    value
}

fn type_error(
    ty: &Ty,
    segment: &str,
    target: &str,
    at: &str,
    diags: &mut Diagnostics,
) -> Value {
    diags.push(
        Diagnostic::error(
            "E104",
            format!(
                "Cannot access attribute '{}' on value of type {} (in '{}')",
                segment, ty, target
            ),
        )
        .with_address(at),
    );
    Value::unknown(Ty::Dynamic)
}

fn eval_concat(parts: &[Expr], scope: &Scope, at: &str, diags: &mut Diagnostics) -> Value {
    let mut pieces = Vec::with_capacity(parts.len());
    let mut any_unknown = false;

    for part in parts {
        let value = eval_expr(part, scope, at, diags);
        let ty = value.ty();
        if !ty.is_string_coercible() {
            diags.push(
                Diagnostic::error(
                    "E103",
                    format!("Cannot interpolate a value of type {} into a string", ty),
                )
                .with_address(at),
            );
            any_unknown = true;
            continue;
        }
        match value {
            Value::Unknown(_) => any_unknown = true,
            Value::String(s) => pieces.push(s),
            Value::Number(n) => pieces.push(n.to_string()),
            Value::Bool(b) => pieces.push(b.to_string()),
            Value::Null => {
                diags.push(
                    Diagnostic::error("E106", "Cannot interpolate a null value into a string")
                        .with_address(at),
                );
                any_unknown = true;
            }
            // Lists and maps were rejected above by the coercibility check.
            Value::List(_) | Value::Map(_) => any_unknown = true,
        }
    }

    if any_unknown {
        Value::unknown(Ty::String)
    } else {
        Value::String(pieces.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope_with(addr: &str, value: Value) -> Scope {
        let mut scope = Scope::new();
        scope.insert(addr.to_string(), value);
        scope
    }

    #[test]
    fn undeclared_variable_reference_is_an_error() {
        let mut diags = Diagnostics::new();
        let expr = Expr::Ref { target: "var.zone".into() };
        let value = eval_expr(&expr, &Scope::new(), "compute_instance.web", &mut diags);
        assert!(value.is_unknown());
        let diag = diags.iter().find(|d| d.code == "E101").expect("E101");
        assert!(diag.message.contains("zone"));
    }

    #[test]
    fn attribute_path_through_unknown_map_refines_element_type() {
        let scope = scope_with("var.tags", Value::unknown(Ty::Map(Box::new(Ty::String))));
        let mut diags = Diagnostics::new();
        let expr = Expr::Ref { target: "var.tags.env".into() };
        let value = eval_expr(&expr, &scope, "compute_instance.web", &mut diags);
        assert!(diags.is_empty(), "unexpected: {:?}", diags);
        assert_eq!(value, Value::Unknown(Ty::String));
    }

    #[test]
    fn attribute_on_primitive_unknown_is_a_type_error() {
        let scope = scope_with("var.region", Value::unknown(Ty::String));
        let mut diags = Diagnostics::new();
        let expr = Expr::Ref { target: "var.region.name".into() };
        eval_expr(&expr, &scope, "compute_instance.web", &mut diags);
        assert!(diags.iter().any(|d| d.code == "E104"));
    }

    #[test]
    fn interpolating_unknown_list_is_a_type_error() {
        let scope = scope_with("var.names", Value::unknown(Ty::List(Box::new(Ty::String))));
        let mut diags = Diagnostics::new();
        let expr = Expr::Concat {
            parts: vec![Expr::Ref { target: "var.names".into() }],
        };
        let value = eval_expr(&expr, &scope, "output.all", &mut diags);
        assert!(diags.iter().any(|d| d.code == "E103"));
        assert_eq!(value, Value::Unknown(Ty::String));
    }

    #[test]
    fn concat_of_known_literals_folds() {
        let mut diags = Diagnostics::new();
        let expr = Expr::Concat {
            parts: vec![
                Expr::Literal { value: serde_json::json!("port-") },
                Expr::Literal { value: serde_json::json!(8080) },
            ],
        };
        let value = eval_expr(&expr, &Scope::new(), "output.endpoint", &mut diags);
        assert!(diags.is_empty());
        assert_eq!(value, Value::String("port-8080".into()));
    }

    #[test]
    fn concat_with_unknown_part_stays_unknown_string() {
        let scope = scope_with("var.region", Value::unknown(Ty::String));
        let mut diags = Diagnostics::new();
        let expr = Expr::Concat {
            parts: vec![
                Expr::Literal { value: serde_json::json!("eu-") },
                Expr::Ref { target: "var.region".into() },
            ],
        };
        let value = eval_expr(&expr, &scope, "output.endpoint", &mut diags);
        assert!(diags.is_empty());
        assert_eq!(value, Value::Unknown(Ty::String));
    }
}
