// crates/toolgate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Toolgate Interfaces
// Description: Backend-agnostic contracts for tool execution and catalog loading.
// Purpose: Define the collaborator surfaces the execution pipeline depends on.
// Dependencies: crate::core, async-trait, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the gateway integrates with tool implementations and
//! catalog loaders without knowing what backs them. Execution capabilities are
//! keyed by declared tool type; catalog sources supply whole catalogs that are
//! swapped in atomically.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::ExecutionContext;
use crate::core::ToolName;
use crate::core::ToolSpec;

// ============================================================================
// SECTION: Tool Executor
// ============================================================================

/// Owned invocation handed to an execution capability.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    /// Tool name being invoked.
    pub tool: ToolName,
    /// Validated input bag.
    pub inputs: Map<String, Value>,
    /// Caller context.
    pub context: ExecutionContext,
}

/// Errors raised by execution capabilities.
#[derive(Debug, Error)]
pub enum ToolExecutorError {
    /// Implementation-specific failure; the message is surfaced to callers.
    #[error("{0}")]
    Failed(String),
}

/// Asynchronous execution capability bound to a declared tool type.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Executes the tool and returns its payload.
    ///
    /// # Errors
    ///
    /// Returns [`ToolExecutorError`] when the implementation fails.
    async fn execute(&self, invocation: ToolInvocation) -> Result<Value, ToolExecutorError>;
}

// ============================================================================
// SECTION: Catalog Source
// ============================================================================

/// Errors raised while loading a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogSourceError {
    /// Catalog could not be read.
    #[error("catalog io error: {0}")]
    Io(String),
    /// Catalog could not be parsed.
    #[error("catalog parse error: {0}")]
    Parse(String),
    /// Catalog content is invalid.
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Loader collaborator that supplies whole catalogs.
pub trait CatalogSource: Send + Sync {
    /// Loads the complete set of tool specifications.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogSourceError`] when the catalog cannot be loaded.
    fn load(&self) -> Result<Vec<ToolSpec>, CatalogSourceError>;

    /// Returns a label identifying where the catalog comes from.
    fn describe(&self) -> String;
}
