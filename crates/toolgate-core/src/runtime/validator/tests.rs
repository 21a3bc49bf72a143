// crates/toolgate-core/src/runtime/validator/tests.rs
// ============================================================================
// Module: Input Validator Tests
// Description: Unit and property tests for required-parameter validation.
// Dependencies: toolgate-core, proptest
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use proptest::prelude::*;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use super::ValidationError;
use super::validate_inputs;
use super::validate_request;
use crate::core::ToolName;
use crate::core::ToolSpec;
use crate::runtime::catalog::ToolCatalog;

fn inputs(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[test]
fn empty_requirements_accept_any_inputs() {
    let spec = ToolSpec::new("echo", "echo");
    assert!(validate_inputs(&spec, &Map::new()).is_ok());
    assert!(validate_inputs(&spec, &inputs(json!({"extra": 1}))).is_ok());
}

#[test]
fn presence_is_sufficient_even_for_null() {
    let spec = ToolSpec::new("search", "web_search").with_required_parameters(["query"]);
    assert!(validate_inputs(&spec, &inputs(json!({"query": null}))).is_ok());
}

#[test]
fn first_missing_parameter_in_declaration_order_is_reported() {
    let spec = ToolSpec::new("tts", "tts").with_required_parameters(["text", "voice", "format"]);
    let err = validate_inputs(&spec, &inputs(json!({"text": "hi"}))).unwrap_err();
    assert_eq!(err, ValidationError::MissingParameter("voice".to_string()));
    assert_eq!(err.to_string(), "Missing required parameter: voice");
}

#[test]
fn unknown_tool_is_a_validation_failure() {
    let catalog = ToolCatalog::empty();
    let err = validate_request(&catalog, &ToolName::new("nope"), &Map::new()).unwrap_err();
    assert_eq!(err.to_string(), "Tool 'nope' not found in catalog");
}

#[test]
fn validate_request_returns_spec_on_success() {
    let catalog = ToolCatalog::from_specs(vec![
        ToolSpec::new("search", "web_search").with_required_parameters(["query"]),
    ])
    .unwrap();
    let spec =
        validate_request(&catalog, &ToolName::new("search"), &inputs(json!({"query": "rust"})))
            .unwrap();
    assert_eq!(spec.name.as_str(), "search");
}

proptest! {
    #[test]
    fn missing_key_is_always_reported(
        required in proptest::collection::btree_set("[a-z]{1,8}", 1..6),
        drop_index in 0usize..6,
    ) {
        let required: Vec<String> = required.into_iter().collect();
        let dropped = required[drop_index % required.len()].clone();
        let spec = ToolSpec::new("t", "t").with_required_parameters(required.clone());
        let mut bag = Map::new();
        for name in &required {
            if *name != dropped {
                bag.insert(name.clone(), Value::Bool(true));
            }
        }
        let err = validate_inputs(&spec, &bag).unwrap_err();
        prop_assert_eq!(err, ValidationError::MissingParameter(dropped));
    }

    #[test]
    fn complete_inputs_always_pass(required in proptest::collection::vec("[a-z]{1,8}", 0..6)) {
        let spec = ToolSpec::new("t", "t").with_required_parameters(required.clone());
        let bag: Map<String, Value> =
            required.into_iter().map(|name| (name, Value::Null)).collect();
        prop_assert!(validate_inputs(&spec, &bag).is_ok());
    }
}
