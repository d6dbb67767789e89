//! Reference addresses used in configuration expressions.
//!
//! A reference names a declaration in the root module plus an optional
//! attribute path into its value: `var.region`, `compute_instance.web`,
//! `compute_instance.web.network.0.address`.

/// The declaration a reference points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Referenceable {
    InputVariable(String),
    Resource { kind: String, name: String },
}

impl Referenceable {
    /// Address under which the declaration appears in the walk scope.
    pub fn address(&self) -> String {
        match self {
            Referenceable::InputVariable(name) => format!("var.{}", name),
            Referenceable::Resource { kind, name } => format!("{}.{}", kind, name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub subject: Referenceable,
    /// Remaining path segments into the subject's value.
    pub attr_path: Vec<String>,
}

impl Reference {
    /// Parse a raw reference target. Returns `None` for targets that cannot
    /// name any declaration (too few segments, empty segments).
    pub fn parse(raw: &str) -> Option<Reference> {
        let segments: Vec<&str> = raw.split('.').collect();
        if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        if segments[0] == "var" {
            return Some(Reference {
                subject: Referenceable::InputVariable(segments[1].to_string()),
                attr_path: segments[2..].iter().map(|s| s.to_string()).collect(),
            });
        }
        Some(Reference {
            subject: Referenceable::Resource {
                kind: segments[0].to_string(),
                name: segments[1].to_string(),
            },
            attr_path: segments[2..].iter().map(|s| s.to_string()).collect(),
        })
    }
}
