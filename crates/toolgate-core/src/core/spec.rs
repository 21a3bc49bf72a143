// crates/toolgate-core/src/core/spec.rs
// ============================================================================
// Module: Tool Specifications
// Description: Catalog entries describing each registered tool.
// Purpose: Define the immutable per-load tool contract consumed by the gateway.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`ToolSpec`] is created wholesale when the catalog is (re)loaded and is
//! never mutated afterwards. The gateway enforces only `required_parameters`
//! (key presence) and `required_permission`; `declared_parameters` is schema
//! metadata surfaced through [`ToolSummary`] for introspection.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::ToolName;
use crate::core::identifiers::ToolType;
use crate::core::tier::PermissionTier;

// ============================================================================
// SECTION: Tool Spec
// ============================================================================

/// Catalog entry for a single tool.
///
/// # Invariants
/// - `required_parameters` preserves declaration order so validation errors
///   are reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Registered tool name.
    pub name: ToolName,
    /// Declared type used to select the execution capability.
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    /// Input keys that must be present on every call.
    pub required_parameters: Vec<String>,
    /// Minimum caller tier.
    pub required_permission: PermissionTier,
    /// Human-readable description.
    pub description: String,
    /// Declared parameter schema (introspection only).
    pub declared_parameters: Value,
}

impl ToolSpec {
    /// Creates a spec with no required parameters, `user` tier, and empty
    /// metadata.
    #[must_use]
    pub fn new(name: impl Into<ToolName>, tool_type: impl Into<ToolType>) -> Self {
        Self {
            name: name.into(),
            tool_type: tool_type.into(),
            required_parameters: Vec::new(),
            required_permission: PermissionTier::User,
            description: String::new(),
            declared_parameters: Value::Object(serde_json::Map::new()),
        }
    }

    /// Returns a copy with the required parameters set.
    #[must_use]
    pub fn with_required_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Returns a copy with the required permission tier set.
    #[must_use]
    pub fn with_required_permission(mut self, tier: impl Into<PermissionTier>) -> Self {
        self.required_permission = tier.into();
        self
    }

    /// Returns a copy with the description set.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns a copy with the declared parameter schema set.
    #[must_use]
    pub fn with_declared_parameters(mut self, parameters: Value) -> Self {
        self.declared_parameters = parameters;
        self
    }

    /// Builds the introspection summary for this tool.
    #[must_use]
    pub fn summary(&self) -> ToolSummary {
        ToolSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.declared_parameters.clone(),
            tool_type: self.tool_type.clone(),
        }
    }
}

// ============================================================================
// SECTION: Tool Summary
// ============================================================================

/// Tool listing record returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSummary {
    /// Registered tool name.
    pub name: ToolName,
    /// Human-readable description.
    pub description: String,
    /// Declared parameter schema.
    pub parameters: Value,
    /// Declared tool type.
    #[serde(rename = "type")]
    pub tool_type: ToolType,
}
