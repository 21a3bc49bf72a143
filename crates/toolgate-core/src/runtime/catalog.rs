// crates/toolgate-core/src/runtime/catalog.rs
// ============================================================================
// Module: Tool Catalog
// Description: Immutable per-load catalog and its atomically swapped handle.
// Purpose: Give readers a consistent catalog view across concurrent reloads.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! A [`ToolCatalog`] is built wholesale from a loader's output and never
//! mutated. The [`CatalogHandle`] holds the active [`CatalogSnapshot`] behind
//! an `Arc`; readers clone the pointer and the reloader swaps it, so the lock
//! is held only for a pointer copy and never across an execution.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crate::core::ToolName;
use crate::core::ToolSpec;
use crate::core::ToolType;
use crate::interfaces::CatalogSource;
use crate::interfaces::CatalogSourceError;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Immutable mapping from tool name to specification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCatalog {
    /// Specs keyed by tool name.
    tools: BTreeMap<ToolName, ToolSpec>,
}

impl ToolCatalog {
    /// Returns an empty catalog.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a catalog from loader output.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogSourceError::Invalid`] when a tool name repeats.
    pub fn from_specs(
        specs: impl IntoIterator<Item = ToolSpec>,
    ) -> Result<Self, CatalogSourceError> {
        let mut tools = BTreeMap::new();
        for spec in specs {
            if tools.contains_key(&spec.name) {
                let message = format!("duplicate tool name: {}", spec.name);
                return Err(CatalogSourceError::Invalid(message));
            }
            tools.insert(spec.name.clone(), spec);
        }
        Ok(Self { tools })
    }

    /// Looks up a tool by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.get(name)
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true when no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Iterates specs in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.values()
    }

    /// Returns the distinct declared tool types.
    #[must_use]
    pub fn tool_types(&self) -> BTreeSet<ToolType> {
        self.tools.values().map(|spec| spec.tool_type.clone()).collect()
    }
}

// ============================================================================
// SECTION: Snapshot
// ============================================================================

/// Catalog plus load bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    /// Active catalog.
    pub catalog: ToolCatalog,
    /// Successful load count; zero until the first successful load.
    pub generation: u64,
    /// Wall-clock time of the last successful load (unix millis).
    pub loaded_at_unix_ms: Option<u64>,
}

impl CatalogSnapshot {
    /// Returns the initial empty snapshot.
    #[must_use]
    pub fn initial() -> Self {
        Self { catalog: ToolCatalog::empty(), generation: 0, loaded_at_unix_ms: None }
    }
}

// ============================================================================
// SECTION: Handle
// ============================================================================

/// Atomically swappable reference to the active catalog snapshot.
#[derive(Debug)]
pub struct CatalogHandle {
    /// Active snapshot pointer.
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl Default for CatalogHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogHandle {
    /// Creates a handle holding the initial empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self { current: RwLock::new(Arc::new(CatalogSnapshot::initial())) }
    }

    /// Returns the active snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swaps in a new catalog and returns the installed snapshot.
    pub fn replace(&self, catalog: ToolCatalog) -> Arc<CatalogSnapshot> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(CatalogSnapshot {
            catalog,
            generation: guard.generation.saturating_add(1),
            loaded_at_unix_ms: Some(unix_millis_now()),
        });
        *guard = Arc::clone(&next);
        next
    }

    /// Looks up a tool in the active snapshot.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ToolSpec> {
        self.snapshot().catalog.lookup(name).cloned()
    }
}

/// Returns the current wall-clock time in unix milliseconds.
pub(crate) fn unix_millis_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

// ============================================================================
// SECTION: Static Source
// ============================================================================

/// In-memory catalog source for embedding and tests.
#[derive(Debug, Default)]
pub struct StaticCatalogSource {
    /// Specs returned by the next load.
    specs: Mutex<Vec<ToolSpec>>,
}

impl StaticCatalogSource {
    /// Creates a source serving the given specs.
    #[must_use]
    pub fn new(specs: Vec<ToolSpec>) -> Self {
        Self { specs: Mutex::new(specs) }
    }

    /// Replaces the specs returned by subsequent loads.
    pub fn replace(&self, specs: Vec<ToolSpec>) {
        *self.specs.lock().unwrap_or_else(PoisonError::into_inner) = specs;
    }
}

impl CatalogSource for StaticCatalogSource {
    fn load(&self) -> Result<Vec<ToolSpec>, CatalogSourceError> {
        Ok(self.specs.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
