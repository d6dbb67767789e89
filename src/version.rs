//! Compatibility gate: core version constraints.
//!
//! Runs before any graph work. An unsatisfied (or unparseable) constraint is
//! fatal to the whole run: every downstream semantic diagnostic would be
//! misleading noise against an incompatible core.

use semver::{Version, VersionReq};

use crate::config::Config;
use crate::diagnostics::{Diagnostic, Diagnostics};

/// Version of the running core, from the crate version.
pub fn core_version() -> Version {
    Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Version::new(0, 0, 0))
}

/// Check every declared version constraint against the running core.
/// Provider version constraints are checked for well-formedness only; whether
/// a matching provider exists is a plugin concern.
pub fn check_core_version_requirements(config: &Config) -> Diagnostics {
    let mut diags = Diagnostics::new();
    let current = core_version();

    for raw in &config.required_version {
        match VersionReq::parse(raw) {
            Ok(req) if req.matches(&current) => {}
            Ok(_) => diags.push(Diagnostic::error(
                "C001",
                format!(
                    "Configuration requires core version {}, but this is version {}",
                    raw, current
                ),
            )),
            Err(e) => diags.push(Diagnostic::error(
                "C002",
                format!("Invalid core version constraint '{}': {}", raw, e),
            )),
        }
    }

    for (name, requirement) in &config.required_providers {
        if let Some(raw) = &requirement.version {
            if let Err(e) = VersionReq::parse(raw) {
                diags.push(
                    Diagnostic::error(
                        "C003",
                        format!("Invalid version constraint '{}' for provider '{}': {}", raw, name, e),
                    )
                    .with_address(format!("provider.{}", name)),
                );
            }
        }
    }

    diags
}
