// crates/toolgate-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared fakes and harness for gateway integration tests.
// Purpose: Provide controllable capabilities, sources, and recording sinks.
// Dependencies: toolgate-core
// ============================================================================

//! ## Overview
//! Fake execution capabilities with controllable delay, outcome, and panic
//! behavior, a catalog source that can be made to fail, and a recording audit
//! sink. [`Harness`] wires them into a gateway with in-memory metrics.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test fixtures favor direct unwraps for setup clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use toolgate_core::CatalogAuditEvent;
use toolgate_core::CatalogSource;
use toolgate_core::CatalogSourceError;
use toolgate_core::ExecutionAuditEvent;
use toolgate_core::ExecutionContext;
use toolgate_core::ExecutorRegistry;
use toolgate_core::GatewayAuditSink;
use toolgate_core::GatewayMetrics;
use toolgate_core::InMemoryMetrics;
use toolgate_core::ToolExecutor;
use toolgate_core::ToolExecutorError;
use toolgate_core::ToolGateway;
use toolgate_core::ToolGatewayConfig;
use toolgate_core::ToolInvocation;
use toolgate_core::ToolSpec;
use toolgate_core::UnknownTierPolicy;

// ============================================================================
// SECTION: Fake Capabilities
// ============================================================================

/// Echoes `inputs.message` and counts invocations.
#[derive(Default)]
pub struct CountingEcho {
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ToolExecutor for CountingEcho {
    async fn execute(&self, invocation: ToolInvocation) -> Result<Value, ToolExecutorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let message = invocation.inputs.get("message").cloned().unwrap_or(Value::Null);
        Ok(json!({ "echo": message }))
    }
}

/// Always fails with a fixed message.
pub struct FailingExecutor(pub &'static str);

#[async_trait]
impl ToolExecutor for FailingExecutor {
    async fn execute(&self, _invocation: ToolInvocation) -> Result<Value, ToolExecutorError> {
        Err(ToolExecutorError::Failed(self.0.to_string()))
    }
}

/// Panics on every call.
pub struct PanickingExecutor;

#[async_trait]
impl ToolExecutor for PanickingExecutor {
    async fn execute(&self, _invocation: ToolInvocation) -> Result<Value, ToolExecutorError> {
        panic!("capability exploded");
    }
}

/// Sleeps before replying; counts starts and completions.
pub struct DelayedExecutor {
    pub delay: Duration,
    pub started: Arc<AtomicUsize>,
    pub completed: Arc<AtomicUsize>,
}

impl DelayedExecutor {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: Arc::new(AtomicUsize::new(0)),
            completed: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl ToolExecutor for DelayedExecutor {
    async fn execute(&self, _invocation: ToolInvocation) -> Result<Value, ToolExecutorError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "slept_ms": self.delay.as_millis() }))
    }
}

// ============================================================================
// SECTION: Catalog Source
// ============================================================================

/// Catalog source whose next load result is controllable.
pub struct ScriptedSource {
    next: Mutex<Result<Vec<ToolSpec>, CatalogSourceError>>,
}

impl ScriptedSource {
    pub fn ok(specs: Vec<ToolSpec>) -> Self {
        Self { next: Mutex::new(Ok(specs)) }
    }

    pub fn failing(message: &str) -> Self {
        Self { next: Mutex::new(Err(CatalogSourceError::Io(message.to_string()))) }
    }

    pub fn set(&self, next: Result<Vec<ToolSpec>, CatalogSourceError>) {
        *self.next.lock().unwrap() = next;
    }
}

impl CatalogSource for ScriptedSource {
    fn load(&self) -> Result<Vec<ToolSpec>, CatalogSourceError> {
        self.next.lock().unwrap().clone()
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

/// Audit sink that keeps every event in memory.
#[derive(Default)]
pub struct RecordingAudit {
    pub executions: Mutex<Vec<ExecutionAuditEvent>>,
    pub reloads: Mutex<Vec<CatalogAuditEvent>>,
}

impl RecordingAudit {
    pub fn executions(&self) -> Vec<ExecutionAuditEvent> {
        self.executions.lock().unwrap().clone()
    }

    pub fn reloads(&self) -> Vec<CatalogAuditEvent> {
        self.reloads.lock().unwrap().clone()
    }
}

impl GatewayAuditSink for RecordingAudit {
    fn record_execution(&self, event: &ExecutionAuditEvent) {
        self.executions.lock().unwrap().push(event.clone());
    }

    fn record_catalog(&self, event: &CatalogAuditEvent) {
        self.reloads.lock().unwrap().push(event.clone());
    }
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Gateway wired to in-memory observability.
pub struct Harness {
    pub gateway: ToolGateway,
    pub metrics: Arc<InMemoryMetrics>,
    pub audit: Arc<RecordingAudit>,
    pub source: Arc<ScriptedSource>,
}

/// Builder for [`Harness`].
pub struct HarnessBuilder {
    source: Arc<ScriptedSource>,
    executors: ExecutorRegistry,
    policy: UnknownTierPolicy,
    cap: Option<Duration>,
}

impl HarnessBuilder {
    pub fn new(specs: Vec<ToolSpec>) -> Self {
        Self::with_source(ScriptedSource::ok(specs))
    }

    pub fn with_source(source: ScriptedSource) -> Self {
        Self {
            source: Arc::new(source),
            executors: ExecutorRegistry::new(),
            policy: UnknownTierPolicy::default(),
            cap: None,
        }
    }

    pub fn executor<E: ToolExecutor + 'static>(mut self, tool_type: &str, executor: E) -> Self {
        self.executors.register(tool_type, executor);
        self
    }

    pub fn policy(mut self, policy: UnknownTierPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn cap(mut self, cap: Duration) -> Self {
        self.cap = Some(cap);
        self
    }

    pub fn build(self) -> Harness {
        let metrics = Arc::new(InMemoryMetrics::new());
        let audit = Arc::new(RecordingAudit::default());
        let source: Arc<dyn CatalogSource> = Arc::clone(&self.source) as Arc<dyn CatalogSource>;
        let mut config = ToolGatewayConfig::new(source);
        config.executors = self.executors;
        config.metrics = Arc::clone(&metrics) as Arc<dyn GatewayMetrics>;
        config.audit = Arc::clone(&audit) as Arc<dyn GatewayAuditSink>;
        config.unknown_tier_policy = self.policy;
        config.max_execution_time_cap = self.cap;
        Harness { gateway: ToolGateway::new(config), metrics, audit, source: self.source }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Standard demo catalog.
pub fn demo_catalog() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new("echo", "echo")
            .with_required_permission("guest")
            .with_description("Echo a message back")
            .with_declared_parameters(json!({"message": {"type": "string"}})),
        ToolSpec::new("search", "web_search")
            .with_required_parameters(["query"])
            .with_required_permission("user")
            .with_description("Search the web"),
        ToolSpec::new("admin_tool", "echo").with_required_permission("admin"),
    ]
}

/// Context for a tier with a fixed tenant and session.
pub fn ctx(tier: &str) -> ExecutionContext {
    ExecutionContext::new("tenant-a", "session-1").with_tier(tier)
}

/// Converts a JSON object literal into an input bag.
pub fn inputs(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("inputs must be an object, got {other}"),
    }
}
