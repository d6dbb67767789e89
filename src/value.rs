//! Type and value model for validation.
//!
//! Validation never sees concrete input data, so `Value::Unknown` is a
//! first-class variant: "a value of this type will exist, but is not known
//! yet". A variable declared without a type gets `Ty::Dynamic`, an unknown
//! that is compatible with any type, rather than a missing/null case.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// TYPES
// =============================================================================

/// Semantic type of a configuration value.
///
/// Serialized in source form: `string`, `number`, `bool`, `any`,
/// `list(<element>)`, `map(<element>)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ty {
    String,
    Number,
    Bool,
    List(Box<Ty>),
    Map(Box<Ty>),
    /// Compatible with any type; used when no type was declared.
    Dynamic,
}

impl Ty {
    /// Parse a source-form type expression.
    pub fn parse(raw: &str) -> Result<Ty, String> {
        let raw = raw.trim();
        match raw {
            "string" => return Ok(Ty::String),
            "number" => return Ok(Ty::Number),
            "bool" => return Ok(Ty::Bool),
            "any" => return Ok(Ty::Dynamic),
            _ => {}
        }
        for (ctor, wrap) in [
            ("list", Ty::List as fn(Box<Ty>) -> Ty),
            ("map", Ty::Map as fn(Box<Ty>) -> Ty),
        ] {
            if let Some(inner) = raw
                .strip_prefix(ctor)
                .and_then(|r| r.trim_start().strip_prefix('('))
                .and_then(|r| r.strip_suffix(')'))
            {
                return Ok(wrap(Box::new(Ty::parse(inner)?)));
            }
        }
        Err(format!("unsupported type expression '{}'", raw))
    }

    /// True when a value of this type can be interpolated into a string.
    pub fn is_string_coercible(&self) -> bool {
        matches!(self, Ty::String | Ty::Number | Ty::Bool | Ty::Dynamic)
    }
}

impl std::fmt::Display for Ty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ty::String => write!(f, "string"),
            Ty::Number => write!(f, "number"),
            Ty::Bool => write!(f, "bool"),
            Ty::List(el) => write!(f, "list({})", el),
            Ty::Map(el) => write!(f, "map({})", el),
            Ty::Dynamic => write!(f, "any"),
        }
    }
}

impl TryFrom<String> for Ty {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Ty::parse(&raw)
    }
}

impl From<Ty> for String {
    fn from(ty: Ty) -> String {
        ty.to_string()
    }
}

// =============================================================================
// VALUES
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// A value of the given type that is not known yet.
    Unknown(Ty),
}

impl Value {
    pub fn unknown(ty: Ty) -> Value {
        Value::Unknown(ty)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown(_))
    }

    /// The semantic type of this value. Total: null and empty collections
    /// report `any` elements.
    pub fn ty(&self) -> Ty {
        match self {
            Value::Null => Ty::Dynamic,
            Value::Bool(_) => Ty::Bool,
            Value::Number(_) => Ty::Number,
            Value::String(_) => Ty::String,
            Value::List(items) => Ty::List(Box::new(element_ty(items.iter()))),
            Value::Map(entries) => Ty::Map(Box::new(element_ty(entries.values()))),
            Value::Unknown(ty) => ty.clone(),
        }
    }

    /// Convert a literal from the configuration JSON.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }
}

fn element_ty<'a>(mut values: impl Iterator<Item = &'a Value>) -> Ty {
    let Some(first) = values.next() else {
        return Ty::Dynamic;
    };
    let ty = first.ty();
    if values.all(|v| v.ty() == ty) { ty } else { Ty::Dynamic }
}

// =============================================================================
// INPUT VALUES
// =============================================================================

/// Where an input value came from. Validation always synthesizes
/// `FromUnknown`; `FromCaller` is reserved for plan/apply, where the caller
/// supplies real data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    FromUnknown,
    FromCaller,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputValue {
    pub value: Value,
    pub source: ValueSource,
}

/// One entry per declared root-module input variable.
pub type InputValues = BTreeMap<String, InputValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_primitive_types() {
        assert_eq!(Ty::parse("string"), Ok(Ty::String));
        assert_eq!(Ty::parse("number"), Ok(Ty::Number));
        assert_eq!(Ty::parse("bool"), Ok(Ty::Bool));
        assert_eq!(Ty::parse("any"), Ok(Ty::Dynamic));
    }

    #[test]
    fn parses_nested_collection_types() {
        assert_eq!(
            Ty::parse("list(map(string))"),
            Ok(Ty::List(Box::new(Ty::Map(Box::new(Ty::String)))))
        );
    }

    #[test]
    fn rejects_malformed_type_expression() {
        assert!(Ty::parse("list(").is_err());
        assert!(Ty::parse("tuple(string)").is_err());
    }

    #[test]
    fn display_round_trips() {
        let ty = Ty::Map(Box::new(Ty::List(Box::new(Ty::Number))));
        assert_eq!(Ty::parse(&ty.to_string()), Ok(ty));
    }

    #[test]
    fn unknown_value_reports_declared_type() {
        let v = Value::unknown(Ty::List(Box::new(Ty::String)));
        assert!(v.is_unknown());
        assert_eq!(v.ty(), Ty::List(Box::new(Ty::String)));
    }

    #[test]
    fn literal_list_element_type() {
        let v = Value::from_json(&serde_json::json!(["a", "b"]));
        assert_eq!(v.ty(), Ty::List(Box::new(Ty::String)));

        let mixed = Value::from_json(&serde_json::json!(["a", 1]));
        assert_eq!(mixed.ty(), Ty::List(Box::new(Ty::Dynamic)));
    }
}
