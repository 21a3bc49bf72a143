// crates/toolgate-providers/src/echo.rs
// ============================================================================
// Module: Echo Executor
// Description: Returns the caller's `message` input unchanged.
// Purpose: Provide a zero-latency capability for smoke tests and demos.
// Dependencies: toolgate-core
// ============================================================================

//! ## Overview
//! Echo capability that returns the caller's `message` input unchanged.

use async_trait::async_trait;
use serde_json::Value;
use serde_json::json;
use toolgate_core::ToolExecutor;
use toolgate_core::ToolExecutorError;
use toolgate_core::ToolInvocation;

/// Message echoed when the call carries no `message` input.
pub const DEFAULT_ECHO_MESSAGE: &str = "Hello from toolgate!";

/// Echo capability: `{"echo": inputs.message}`.
#[derive(Debug, Clone)]
pub struct EchoExecutor {
    /// Fallback message.
    default_message: String,
}

impl EchoExecutor {
    /// Creates an echo executor with [`DEFAULT_ECHO_MESSAGE`] as fallback.
    #[must_use]
    pub fn new() -> Self {
        Self { default_message: DEFAULT_ECHO_MESSAGE.to_string() }
    }

    /// Returns a copy with a different fallback message.
    #[must_use]
    pub fn with_default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = message.into();
        self
    }
}

impl Default for EchoExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for EchoExecutor {
    async fn execute(&self, invocation: ToolInvocation) -> Result<Value, ToolExecutorError> {
        let message = invocation
            .inputs
            .get("message")
            .cloned()
            .unwrap_or_else(|| Value::String(self.default_message.clone()));
        Ok(json!({ "echo": message }))
    }
}
