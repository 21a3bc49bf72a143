// crates/toolgate-core/src/runtime/executors.rs
// ============================================================================
// Module: Executor Registry
// Description: Binding of declared tool types to execution capabilities.
// Purpose: Resolve the capability for a spec without knowing its backing.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The registry maps declared tool types to shared [`ToolExecutor`] handles.
//! A type with no binding resolves to `None`; the dispatcher reports that as
//! a `failure` with a "not implemented" message.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::core::ToolType;
use crate::interfaces::ToolExecutor;

/// Execution capabilities keyed by declared tool type.
///
/// # Invariants
/// - At most one executor is bound per type; later registrations replace
///   earlier ones.
#[derive(Clone, Default)]
pub struct ExecutorRegistry {
    /// Executors keyed by tool type.
    executors: BTreeMap<ToolType, Arc<dyn ToolExecutor>>,
}

impl ExecutorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds an executor to a tool type.
    pub fn register<E>(&mut self, tool_type: impl Into<ToolType>, executor: E)
    where
        E: ToolExecutor + 'static,
    {
        self.register_shared(tool_type, Arc::new(executor));
    }

    /// Binds an already shared executor to a tool type.
    pub fn register_shared(
        &mut self,
        tool_type: impl Into<ToolType>,
        executor: Arc<dyn ToolExecutor>,
    ) {
        self.executors.insert(tool_type.into(), executor);
    }

    /// Returns a builder-style copy with the executor bound.
    #[must_use]
    pub fn with<E>(mut self, tool_type: impl Into<ToolType>, executor: E) -> Self
    where
        E: ToolExecutor + 'static,
    {
        self.register(tool_type, executor);
        self
    }

    /// Resolves the executor bound to a tool type.
    #[must_use]
    pub fn resolve(&self, tool_type: &ToolType) -> Option<Arc<dyn ToolExecutor>> {
        self.executors.get(tool_type).cloned()
    }

    /// Returns true when a type has a bound executor.
    #[must_use]
    pub fn contains(&self, tool_type: &ToolType) -> bool {
        self.executors.contains_key(tool_type)
    }

    /// Returns all bound tool types.
    #[must_use]
    pub fn bound_types(&self) -> BTreeSet<ToolType> {
        self.executors.keys().cloned().collect()
    }
}

impl fmt::Debug for ExecutorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorRegistry").field("types", &self.bound_types()).finish()
    }
}
