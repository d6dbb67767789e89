//! Integration tests for per-node semantic checks performed during the walk.

use preflight::config;
use preflight::context::{Context, ValidateOpts};
use preflight::diagnostics::Diagnostics;

fn validate(json: &str) -> Diagnostics {
    let cfg = config::parse(json).expect("Should parse");
    Context::new().validate(&cfg, &ValidateOpts::default())
}

#[test]
fn type_errors_surface_against_unknown_values() {
    let json = include_str!("fixtures/type_errors.json");
    let diags = validate(json);

    // Attribute access on a string-typed unknown.
    assert!(diags.iter().any(|d| d.code == "E104"), "got: {:?}", diags);
    // Interpolating a list-typed unknown into a string.
    assert!(diags.iter().any(|d| d.code == "E103"), "got: {:?}", diags);
}

#[test]
fn type_errors_are_tagged_with_the_checked_declaration() {
    let json = include_str!("fixtures/type_errors.json");
    let diags = validate(json);

    let attr_err = diags.iter().find(|d| d.code == "E104").expect("E104");
    assert_eq!(attr_err.address.as_deref(), Some("compute_instance.web"));

    let interp_err = diags.iter().find(|d| d.code == "E103").expect("E103");
    assert_eq!(interp_err.address.as_deref(), Some("output.all_names"));
}

#[test]
fn undeclared_provider_is_a_walk_error() {
    let json = include_str!("fixtures/undeclared_provider.json");
    let diags = validate(json);

    let diag = diags.iter().find(|d| d.code == "E201").expect("E201");
    assert!(diag.message.contains("cloud"));
    assert_eq!(diag.address.as_deref(), Some("compute_instance.web"));
}

#[test]
fn references_to_undeclared_resources_are_errors() {
    let diags = validate(
        r#"{
            "requiredProviders": { "cloud": { "source": "examplecorp/cloud" } },
            "module": {
                "outputs": {
                    "id": { "value": { "kind": "ref", "target": "network.missing.id" } }
                }
            }
        }"#,
    );
    let diag = diags.iter().find(|d| d.code == "E102").expect("E102");
    assert!(diag.message.contains("network.missing"));
}

#[test]
fn malformed_reference_targets_are_errors() {
    let diags = validate(
        r#"{
            "requiredProviders": { "cloud": { "source": "examplecorp/cloud" } },
            "module": {
                "outputs": {
                    "id": { "value": { "kind": "ref", "target": "justonesegment" } }
                }
            }
        }"#,
    );
    assert!(diags.iter().any(|d| d.code == "E100"), "got: {:?}", diags);
}
