// crates/toolgate-core/src/runtime/catalog/tests.rs
// ============================================================================
// Module: Tool Catalog Tests
// Description: Unit tests for catalog construction and snapshot swapping.
// Dependencies: toolgate-core
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use std::sync::Arc;

use super::CatalogHandle;
use super::StaticCatalogSource;
use super::ToolCatalog;
use crate::core::ToolSpec;
use crate::core::ToolType;
use crate::interfaces::CatalogSource;
use crate::interfaces::CatalogSourceError;

fn sample_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new("echo", "echo").with_required_permission("guest"),
        ToolSpec::new("search", "web_search").with_required_parameters(["query"]),
    ]
}

#[test]
fn from_specs_indexes_by_name() {
    let catalog = ToolCatalog::from_specs(sample_specs()).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.lookup("search").unwrap().tool_type, ToolType::new("web_search"));
    assert!(catalog.lookup("missing").is_none());
}

#[test]
fn from_specs_rejects_duplicate_names() {
    let specs = vec![ToolSpec::new("echo", "echo"), ToolSpec::new("echo", "other")];
    let err = ToolCatalog::from_specs(specs).unwrap_err();
    assert_eq!(err, CatalogSourceError::Invalid("duplicate tool name: echo".to_string()));
}

#[test]
fn tool_types_are_distinct() {
    let mut specs = sample_specs();
    specs.push(ToolSpec::new("echo2", "echo"));
    let catalog = ToolCatalog::from_specs(specs).unwrap();
    let types: Vec<_> = catalog.tool_types().into_iter().map(|t| t.to_string()).collect();
    assert_eq!(types, vec!["echo".to_string(), "web_search".to_string()]);
}

#[test]
fn handle_starts_empty_at_generation_zero() {
    let handle = CatalogHandle::new();
    let snapshot = handle.snapshot();
    assert!(snapshot.catalog.is_empty());
    assert_eq!(snapshot.generation, 0);
    assert!(snapshot.loaded_at_unix_ms.is_none());
}

#[test]
fn replace_bumps_generation_and_keeps_old_snapshots_intact() {
    let handle = CatalogHandle::new();
    handle.replace(ToolCatalog::from_specs(sample_specs()).unwrap());
    let held = handle.snapshot();
    assert_eq!(held.generation, 1);
    assert!(held.loaded_at_unix_ms.is_some());

    handle.replace(ToolCatalog::empty());
    let fresh = handle.snapshot();
    assert_eq!(fresh.generation, 2);
    assert!(fresh.catalog.is_empty());
    assert_eq!(held.catalog.len(), 2);
    assert!(!Arc::ptr_eq(&held, &fresh));
}

#[test]
fn handle_lookup_reads_active_snapshot() {
    let handle = CatalogHandle::new();
    assert!(handle.lookup("echo").is_none());
    handle.replace(ToolCatalog::from_specs(sample_specs()).unwrap());
    assert_eq!(handle.lookup("echo").unwrap().name.as_str(), "echo");
}

#[test]
fn static_source_serves_replaced_specs() {
    let source = StaticCatalogSource::new(sample_specs());
    assert_eq!(source.load().unwrap().len(), 2);
    source.replace(Vec::new());
    assert!(source.load().unwrap().is_empty());
    assert_eq!(source.describe(), "static");
}
