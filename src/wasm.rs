//! WASM entry points for browser use.

use wasm_bindgen::prelude::*;

use crate::context::{Context, ValidateOpts};
use crate::diagnostics::{Diagnostic, Diagnostics};

/// Validate a configuration JSON string.
/// Returns a JSON array of diagnostic objects.
#[wasm_bindgen]
pub fn validate_config(json: &str, lint_checks: bool) -> JsValue {
    let diags = validate_config_inner(json, lint_checks);
    serde_wasm_bindgen::to_value(&diags).unwrap_or(JsValue::NULL)
}

fn validate_config_inner(json: &str, lint_checks: bool) -> Diagnostics {
    let config = match crate::config::parse(json) {
        Ok(config) => config,
        Err(e) => {
            // Loader failures are not semantic diagnostics, but at this
            // boundary there is nothing else to report them through.
            let mut diags = Diagnostics::new();
            diags.push(Diagnostic::error("P001", e.to_string()));
            return diags;
        }
    };

    Context::new().validate(&config, &ValidateOpts { lint_checks })
}
