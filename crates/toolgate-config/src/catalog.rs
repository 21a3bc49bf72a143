// crates/toolgate-config/src/catalog.rs
// ============================================================================
// Module: YAML Tool Catalog
// Description: Parser and file-backed source for the tool catalog document.
// Purpose: Turn an operator-edited YAML file into validated tool specs.
// Dependencies: toolgate-core, serde, serde_yaml
// ============================================================================

//! ## Overview
//! The catalog document is a `tools:` mapping from tool name to entry.
//! Omitted fields fall back to an `unknown` type, no required parameters,
//! the `user` tier, and empty metadata. Extra keys are tolerated so registries
//! can carry deployment-specific annotations. Structural problems fail the
//! whole load so the gateway keeps its previous catalog.
//!
//! ```yaml
//! tools:
//!   search:
//!     type: web_search
//!     required_params: [query]
//!     required_permission: user
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use toolgate_core::CatalogSource;
use toolgate_core::CatalogSourceError;
use toolgate_core::ToolSpec;
use toolgate_core::ToolType;

use crate::config::MAX_PATH_COMPONENT_LENGTH;
use crate::config::MAX_TOTAL_PATH_LENGTH;
use crate::config::ReadError;
use crate::config::read_limited;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of tools in one catalog.
const MAX_TOOLS: usize = 4_096;
/// Maximum length of a tool name or type.
const MAX_IDENTIFIER_LENGTH: usize = 256;
/// Maximum required parameters per tool.
const MAX_REQUIRED_PARAMS: usize = 128;

// ============================================================================
// SECTION: Document Model
// ============================================================================

/// Top-level catalog document. Keys other than `tools` are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFile {
    /// Tool entries keyed by name.
    #[serde(default)]
    pub tools: BTreeMap<String, ToolEntry>,
}

/// One tool entry as written in YAML. Unrecognized keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolEntry {
    /// Declared tool type.
    #[serde(rename = "type", default = "default_tool_type")]
    pub tool_type: String,
    /// Keys that must be present in every call's inputs.
    #[serde(default)]
    pub required_params: Vec<String>,
    /// Minimum caller tier.
    #[serde(default = "default_permission")]
    pub required_permission: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Declared parameter schema, surfaced verbatim in listings.
    #[serde(default)]
    pub parameters: Option<Value>,
}

/// Default tool type for entries that omit one.
fn default_tool_type() -> String {
    ToolType::unknown().as_str().to_string()
}

/// Default required tier.
fn default_permission() -> String {
    "user".to_string()
}

impl CatalogFile {
    /// Parses a YAML catalog document. An empty document is an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogSourceError::Parse`] for malformed YAML.
    pub fn parse(content: &str) -> Result<Self, CatalogSourceError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let parsed: Option<Self> = serde_yaml::from_str(content)
            .map_err(|err| CatalogSourceError::Parse(err.to_string()))?;
        Ok(parsed.unwrap_or_default())
    }

    /// Validates entries and converts them to tool specs in name order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogSourceError::Invalid`] naming the first bad entry.
    pub fn into_specs(self) -> Result<Vec<ToolSpec>, CatalogSourceError> {
        if self.tools.len() > MAX_TOOLS {
            return Err(CatalogSourceError::Invalid("too many tools".to_string()));
        }
        self.tools.into_iter().map(|(name, entry)| entry.into_spec(name)).collect()
    }
}

impl ToolEntry {
    /// Validates this entry and builds its spec.
    fn into_spec(self, name: String) -> Result<ToolSpec, CatalogSourceError> {
        validate_identifier(&name, "tool name")?;
        validate_identifier(&self.tool_type, &format!("tools.{name}.type"))?;
        if self.required_params.len() > MAX_REQUIRED_PARAMS {
            return Err(CatalogSourceError::Invalid(format!(
                "tools.{name}.required_params has too many entries"
            )));
        }
        let mut seen = BTreeSet::new();
        for param in &self.required_params {
            if param.trim().is_empty() {
                return Err(CatalogSourceError::Invalid(format!(
                    "tools.{name}.required_params contains an empty name"
                )));
            }
            if !seen.insert(param.as_str()) {
                return Err(CatalogSourceError::Invalid(format!(
                    "tools.{name}.required_params repeats '{param}'"
                )));
            }
        }
        if self.required_permission.trim().is_empty() {
            return Err(CatalogSourceError::Invalid(format!(
                "tools.{name}.required_permission must be non-empty"
            )));
        }
        let mut spec = ToolSpec::new(name, self.tool_type)
            .with_required_parameters(self.required_params)
            .with_required_permission(self.required_permission)
            .with_description(self.description);
        if let Some(parameters) = self.parameters {
            spec = spec.with_declared_parameters(parameters);
        }
        Ok(spec)
    }
}

/// Rejects empty or oversized identifiers.
fn validate_identifier(value: &str, field: &str) -> Result<(), CatalogSourceError> {
    if value.trim().is_empty() {
        return Err(CatalogSourceError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_IDENTIFIER_LENGTH {
        return Err(CatalogSourceError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

/// Parses and validates a catalog document in one step.
///
/// # Errors
///
/// Returns [`CatalogSourceError`] when parsing or validation fails.
pub fn parse_catalog(content: &str) -> Result<Vec<ToolSpec>, CatalogSourceError> {
    CatalogFile::parse(content)?.into_specs()
}

// ============================================================================
// SECTION: File Source
// ============================================================================

/// Catalog source that rereads a YAML file on every load.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    /// Catalog file path.
    path: PathBuf,
}

impl FileCatalogSource {
    /// Creates a source for the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the catalog path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileCatalogSource {
    fn load(&self) -> Result<Vec<ToolSpec>, CatalogSourceError> {
        let text = self.path.to_string_lossy();
        if text.len() > MAX_TOTAL_PATH_LENGTH
            || self
                .path
                .components()
                .any(|part| part.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH)
        {
            return Err(CatalogSourceError::Invalid("catalog path exceeds limits".to_string()));
        }
        let content = read_limited(&self.path).map_err(|err| match err {
            ReadError::Io(_) => CatalogSourceError::Io(err.describe("catalog file")),
            ReadError::TooLarge | ReadError::NotUtf8 => {
                CatalogSourceError::Invalid(err.describe("catalog file"))
            }
        })?;
        parse_catalog(&content)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
