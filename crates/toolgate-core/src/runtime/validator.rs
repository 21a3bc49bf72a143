// crates/toolgate-core/src/runtime/validator.rs
// ============================================================================
// Module: Input Validator
// Description: Required-parameter presence checks against a tool spec.
// Purpose: Reject unknown tools and incomplete input bags before dispatch.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Validation is a minimal presence contract: every name in
//! `required_parameters` must be a key of the input bag. Value shape is not
//! inspected. Keys are checked in declaration order and the first missing key
//! is reported, so error messages are reproducible for a fixed spec.

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::ToolName;
use crate::core::ToolSpec;
use crate::runtime::catalog::ToolCatalog;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Validation failures surfaced as `validation_error` results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Tool name is absent from the active catalog.
    #[error("Tool '{0}' not found in catalog")]
    UnknownTool(ToolName),
    /// A required key is missing from the inputs.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Checks that every required parameter is present in `inputs`.
///
/// # Errors
///
/// Returns [`ValidationError::MissingParameter`] naming the first missing key.
pub fn validate_inputs(
    spec: &ToolSpec,
    inputs: &Map<String, Value>,
) -> Result<(), ValidationError> {
    match spec.required_parameters.iter().find(|name| !inputs.contains_key(name.as_str())) {
        Some(missing) => Err(ValidationError::MissingParameter(missing.clone())),
        None => Ok(()),
    }
}

/// Resolves `name` in `catalog` and validates `inputs` against it.
///
/// # Errors
///
/// Returns [`ValidationError`] when the tool is unknown or inputs are
/// incomplete.
pub fn validate_request<'a>(
    catalog: &'a ToolCatalog,
    name: &ToolName,
    inputs: &Map<String, Value>,
) -> Result<&'a ToolSpec, ValidationError> {
    let spec =
        catalog.lookup(name.as_str()).ok_or_else(|| ValidationError::UnknownTool(name.clone()))?;
    validate_inputs(spec, inputs)?;
    Ok(spec)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
