//! Diagnostics collected across all validation phases.
//!
//! A `Diagnostics` set is append-only: phases only ever add entries, and an
//! entry that has been appended stays in the final result even when a later
//! phase is skipped.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single error or warning, tagged with a stable phase-prefixed code
/// (`C...` compat gate, `G...` graph assembly, `E...`/`W...` walk, `L...` lint).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    /// Address of the declaration the diagnostic refers to, if any
    /// (e.g. `var.region`, `compute_instance.web`).
    pub address: Option<String>,
}

impl Diagnostic {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code: code.into(),
            message: message.into(),
            address: None,
        }
    }

    pub fn warning(code: &str, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            code: code.into(),
            message: message.into(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.address {
            Some(addr) => write!(
                f,
                "[{}:{}] {} (at '{}')",
                self.severity, self.code, self.message, addr
            ),
            None => write!(f, "[{}:{}] {}", self.severity, self.code, self.message),
        }
    }
}

/// Ordered, append-only collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics(Vec::new())
    }

    pub fn push(&mut self, diag: Diagnostic) {
        self.0.push(diag);
    }

    /// Append every entry of `other`, preserving order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| !d.is_error())
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(entries: Vec<Diagnostic>) -> Self {
        Diagnostics(entries)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_preserves_order_and_severity() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::warning("W001", "first"));

        let mut more = Diagnostics::new();
        more.push(Diagnostic::error("E101", "second").with_address("var.x"));
        diags.extend(more);

        assert_eq!(diags.len(), 2);
        assert!(diags.has_errors());
        let codes: Vec<&str> = diags.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["W001", "E101"]);
    }

    #[test]
    fn warnings_alone_are_not_errors() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::warning("L001", "advisory"));
        assert!(!diags.has_errors());
        assert_eq!(diags.warnings().count(), 1);
        assert_eq!(diags.errors().count(), 0);
    }

    #[test]
    fn display_includes_address() {
        let d = Diagnostic::error("E102", "undefined reference").with_address("web.id");
        assert_eq!(d.to_string(), "[error:E102] undefined reference (at 'web.id')");
    }
}
