// crates/toolgate-providers/src/simulated.rs
// ============================================================================
// Module: Simulated Executor
// Description: Fixed-latency capability returning a canned JSON payload.
// Purpose: Stand in for external services during development.
// Dependencies: toolgate-core, tokio
// ============================================================================

//! ## Overview
//! A [`SimulatedExecutor`] sleeps for its configured delay, then returns its
//! canned response. Selected input keys may be copied into an object
//! response so replies reflect the request; absent keys echo as `""`. The sleep runs on the tokio
//! timer, so the gateway deadline cancels it like any other capability.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use serde_json::json;
use toolgate_core::ToolExecutor;
use toolgate_core::ToolExecutorError;
use toolgate_core::ToolInvocation;

// ============================================================================
// SECTION: Executor
// ============================================================================

/// Capability that sleeps then returns a canned response.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    /// Simulated latency.
    delay: Duration,
    /// Canned response body.
    response: Value,
    /// Input keys copied into object responses.
    echoed_inputs: Vec<String>,
}

impl SimulatedExecutor {
    /// Creates a simulated executor.
    #[must_use]
    pub const fn new(delay: Duration, response: Value) -> Self {
        Self { delay, response, echoed_inputs: Vec::new() }
    }

    /// Returns a copy that copies the named inputs into the response.
    #[must_use]
    pub fn with_echoed_inputs<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.echoed_inputs = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Returns a copy with a different delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns a copy with a different response.
    #[must_use]
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = response;
        self
    }

    /// Returns the simulated latency.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns the preset for a known tool type.
    #[must_use]
    pub fn preset(tool_type: &str) -> Option<Self> {
        match tool_type {
            "web_search" => Some(Self::web_search()),
            "asr" => Some(Self::asr()),
            "tts" => Some(Self::tts()),
            _ => None,
        }
    }

    /// Web search stand-in: 500 ms, one example result, echoes `query`.
    #[must_use]
    pub fn web_search() -> Self {
        Self::new(
            Duration::from_millis(500),
            json!({
                "results": [{
                    "title": "Example Result",
                    "url": "https://example.com",
                    "snippet": "Sample snippet",
                }],
            }),
        )
        .with_echoed_inputs(["query"])
    }

    /// Speech recognition stand-in: 1 s, fixed transcript.
    #[must_use]
    pub fn asr() -> Self {
        Self::new(
            Duration::from_secs(1),
            json!({
                "transcript": "Sample transcribed text",
                "confidence": 0.95,
                "language": "en",
            }),
        )
    }

    /// Speech synthesis stand-in: 800 ms, fixed audio descriptor.
    #[must_use]
    pub fn tts() -> Self {
        Self::new(
            Duration::from_millis(800),
            json!({
                "audio_url": "/tmp/generated_audio.wav",
                "duration_ms": 2000,
                "format": "wav",
            }),
        )
    }
}

#[async_trait]
impl ToolExecutor for SimulatedExecutor {
    async fn execute(&self, invocation: ToolInvocation) -> Result<Value, ToolExecutorError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let mut response = self.response.clone();
        if let Value::Object(map) = &mut response {
            for key in &self.echoed_inputs {
                let value = invocation
                    .inputs
                    .get(key)
                    .cloned()
                    .unwrap_or_else(|| Value::String(String::new()));
                map.insert(key.clone(), value);
            }
        }
        Ok(response)
    }
}
