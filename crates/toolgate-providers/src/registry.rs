// crates/toolgate-providers/src/registry.rs
// ============================================================================
// Module: Executor Registry Wiring
// Description: Builds executor registries from config bindings.
// Purpose: Bind declared tool types to built-in capabilities.
// Dependencies: toolgate-config, toolgate-core
// ============================================================================

//! ## Overview
//! Each `[[executors]]` entry binds one declared tool type to a built-in
//! capability. Simulated bindings start from the preset for their tool type
//! when one exists; explicit `delay_ms` and `response` override it. A
//! simulated binding with no preset and no response returns `{}`.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Map;
use serde_json::Value;
use toolgate_config::ExecutorConfig;
use toolgate_config::ExecutorKind;
use toolgate_core::ExecutorRegistry;
use toolgate_core::ToolExecutor;

use crate::EchoExecutor;
use crate::SimulatedExecutor;

/// Builds the capability for a single binding.
#[must_use]
pub fn executor_for(config: &ExecutorConfig) -> Arc<dyn ToolExecutor> {
    match config.kind {
        ExecutorKind::Echo => Arc::new(EchoExecutor::new()),
        ExecutorKind::Simulated => {
            let mut executor = SimulatedExecutor::preset(&config.tool_type).unwrap_or_else(|| {
                SimulatedExecutor::new(Duration::ZERO, Value::Object(Map::new()))
            });
            if let Some(delay) = config.delay() {
                executor = executor.with_delay(delay);
            }
            if let Some(response) = &config.response {
                executor = executor.with_response(response.clone());
            }
            Arc::new(executor)
        }
    }
}

/// Builds a registry holding one capability per binding.
#[must_use]
pub fn build_registry(bindings: &[ExecutorConfig]) -> ExecutorRegistry {
    let mut registry = ExecutorRegistry::new();
    for binding in bindings {
        registry.register_shared(binding.tool_type.trim(), executor_for(binding));
    }
    registry
}
