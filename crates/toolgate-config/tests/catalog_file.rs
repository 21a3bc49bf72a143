// crates/toolgate-config/tests/catalog_file.rs
// ============================================================================
// Module: Catalog File Tests
// Description: YAML catalog parsing, defaults, and file source behavior.
// Purpose: Ensure operator-edited catalogs load or fail as a whole.
// Dependencies: toolgate-config, toolgate-core, tempfile, proptest
// ============================================================================

//! ## Overview
//! YAML catalog parsing, defaults, and file source behavior.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use std::fs;
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;
use toolgate_config::FileCatalogSource;
use toolgate_config::parse_catalog;
use toolgate_core::CatalogSource;
use toolgate_core::CatalogSourceError;
use toolgate_core::PermissionTier;
use toolgate_core::ToolGateway;
use toolgate_core::ToolGatewayConfig;

const SAMPLE: &str = r"
tools:
  echo:
    type: echo
    required_permission: guest
    description: Echo a message back
    parameters:
      message:
        type: string
  search:
    type: web_search
    required_params: [query]
  mystery: {}
";

#[test]
fn sample_catalog_parses_with_defaults() {
    let specs = parse_catalog(SAMPLE).unwrap();
    let names: Vec<_> = specs.iter().map(|spec| spec.name.to_string()).collect();
    assert_eq!(names, vec!["echo", "mystery", "search"]);

    let echo = &specs[0];
    assert_eq!(echo.required_permission, PermissionTier::Guest);
    assert_eq!(echo.description, "Echo a message back");
    assert_eq!(echo.declared_parameters, json!({"message": {"type": "string"}}));

    let mystery = &specs[1];
    assert_eq!(mystery.tool_type.as_str(), "unknown");
    assert_eq!(mystery.required_permission, PermissionTier::User);
    assert!(mystery.required_parameters.is_empty());
    assert_eq!(mystery.declared_parameters, json!({}));

    assert_eq!(specs[2].required_parameters, vec!["query".to_string()]);
}

#[test]
fn empty_document_is_empty_catalog() {
    assert!(parse_catalog("").unwrap().is_empty());
    assert!(parse_catalog("tools: {}\n").unwrap().is_empty());
}

#[test]
fn unrecognized_permission_label_is_preserved() {
    let specs = parse_catalog("tools:\n  t:\n    required_permission: superuser\n").unwrap();
    assert_eq!(specs[0].required_permission, PermissionTier::Unrecognized("superuser".to_string()));
}

#[test]
fn malformed_yaml_is_parse_error() {
    assert!(matches!(parse_catalog("tools: [unclosed"), Err(CatalogSourceError::Parse(_))));
    assert!(matches!(
        parse_catalog("tools:\n  t:\n    required_params: 7\n"),
        Err(CatalogSourceError::Parse(_))
    ));
}

#[test]
fn extra_registry_keys_are_ignored() {
    let document = r"
version: 1
owner: platform
tools:
  echo:
    type: echo
    timeout: 10
    tags: [demo]
    required_permission: guest
";
    let specs = parse_catalog(document).unwrap();
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].name.as_str(), "echo");
    assert_eq!(specs[0].tool_type.as_str(), "echo");
    assert_eq!(specs[0].required_permission, PermissionTier::Guest);
}

#[test]
fn bad_required_params_are_invalid() {
    let duplicate = parse_catalog("tools:\n  t:\n    required_params: [a, a]\n").unwrap_err();
    assert_eq!(
        duplicate,
        CatalogSourceError::Invalid("tools.t.required_params repeats 'a'".to_string())
    );
    assert!(matches!(
        parse_catalog("tools:\n  t:\n    required_params: ['']\n"),
        Err(CatalogSourceError::Invalid(_))
    ));
}

#[test]
fn file_source_rereads_on_every_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tools.yaml");
    fs::write(&path, "tools:\n  a: {type: echo}\n").unwrap();
    let source = FileCatalogSource::new(&path);
    assert_eq!(source.load().unwrap().len(), 1);
    assert_eq!(source.describe(), format!("file:{}", path.display()));

    fs::write(&path, "tools:\n  a: {type: echo}\n  b: {type: echo}\n").unwrap();
    assert_eq!(source.load().unwrap().len(), 2);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileCatalogSource::new(dir.path().join("absent.yaml"));
    assert!(matches!(source.load(), Err(CatalogSourceError::Io(_))));
}

#[test]
fn gateway_keeps_previous_catalog_when_file_breaks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tools.yaml");
    fs::write(&path, SAMPLE).unwrap();
    let gateway = ToolGateway::new(ToolGatewayConfig::new(Arc::new(FileCatalogSource::new(&path))));
    assert_eq!(gateway.catalog_snapshot().catalog.len(), 3);

    fs::write(&path, "tools: [broken").unwrap();
    assert!(gateway.reload_catalog().is_err());
    assert_eq!(gateway.catalog_snapshot().catalog.len(), 3);
    assert_eq!(gateway.catalog_snapshot().generation, 1);
}

proptest! {
    #[test]
    fn generated_catalogs_round_trip_names(names in prop::collection::btree_set("[a-z][a-z0-9_]{0,15}", 1..12)) {
        let mut yaml = String::from("tools:\n");
        for name in &names {
            yaml.push_str(&format!("  \"{name}\":\n    type: echo\n"));
        }
        let specs = parse_catalog(&yaml).unwrap();
        let parsed: Vec<String> = specs.iter().map(|spec| spec.name.to_string()).collect();
        let expected: Vec<String> = names.into_iter().collect();
        prop_assert_eq!(parsed, expected);
    }
}

#[test]
fn shipped_sample_catalog_is_valid() {
    let specs = parse_catalog(include_str!("../../../config/tools.yaml")).unwrap();
    assert_eq!(specs.len(), 5);
    assert!(specs.iter().any(|spec| spec.required_permission == PermissionTier::Admin));
}
