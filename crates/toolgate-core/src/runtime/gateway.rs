// crates/toolgate-core/src/runtime/gateway.rs
// ============================================================================
// Module: Tool Gateway
// Description: Composition of catalog, admission, dispatch, and recording.
// Purpose: Turn an untrusted (tool, inputs, context) triple into one result.
// Dependencies: crate::audit, crate::core, crate::interfaces, crate::telemetry
// ============================================================================

//! ## Overview
//! [`ToolGateway`] is an explicitly constructed, cheaply cloneable handle.
//! `execute` never fails: every path, including panics in admission or in the
//! capability, yields exactly one [`ExecutionResult`] and exactly one set of
//! observability emissions.
//!
//! Pipeline order per call: catalog snapshot, in-flight increment,
//! validation, authorization, deadline-bound dispatch, result construction,
//! recording, in-flight decrement. The deadline clock starts at dispatch;
//! `execution_time_ms` is measured from call entry. A call whose future is
//! dropped mid-flight is still recorded once, as a failure.
//!
//! Reloads are serialized so generations are installed in load order. Readers
//! never take the reload lock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tokio::time::Instant;

use crate::audit::CatalogAuditEvent;
use crate::audit::GatewayAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::ReloadOutcome;
use crate::audit::timestamp_ms_now;
use crate::core::ExecutionContext;
use crate::core::ExecutionOutcome;
use crate::core::ExecutionResult;
use crate::core::ToolName;
use crate::core::ToolSpec;
use crate::core::ToolSummary;
use crate::core::ToolType;
use crate::core::UnknownTierPolicy;
use crate::interfaces::CatalogSource;
use crate::interfaces::CatalogSourceError;
use crate::interfaces::ToolInvocation;
use crate::runtime::authorizer::TierAuthorizer;
use crate::runtime::catalog::CatalogHandle;
use crate::runtime::catalog::CatalogSnapshot;
use crate::runtime::catalog::ToolCatalog;
use crate::runtime::dispatcher::dispatch;
use crate::runtime::dispatcher::panic_message;
use crate::runtime::executors::ExecutorRegistry;
use crate::runtime::recorder::OutcomeRecorder;
use crate::runtime::validator::validate_request;
use crate::telemetry::GatewayMetrics;
use crate::telemetry::NoopMetrics;
use crate::telemetry::UNCATALOGED_TOOL_LABEL;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Collaborators and policy for a [`ToolGateway`].
pub struct ToolGatewayConfig {
    /// Catalog loader.
    pub catalog_source: Arc<dyn CatalogSource>,
    /// Execution capabilities keyed by tool type.
    pub executors: ExecutorRegistry,
    /// Metrics sink.
    pub metrics: Arc<dyn GatewayMetrics>,
    /// Audit sink.
    pub audit: Arc<dyn GatewayAuditSink>,
    /// Ranking policy for unrecognized tiers.
    pub unknown_tier_policy: UnknownTierPolicy,
    /// Upper bound applied to caller budgets.
    pub max_execution_time_cap: Option<Duration>,
}

impl ToolGatewayConfig {
    /// Creates a config with no executors, no-op sinks, and default policy.
    #[must_use]
    pub fn new(catalog_source: Arc<dyn CatalogSource>) -> Self {
        Self {
            catalog_source,
            executors: ExecutorRegistry::new(),
            metrics: Arc::new(NoopMetrics),
            audit: Arc::new(NoopAuditSink),
            unknown_tier_policy: UnknownTierPolicy::default(),
            max_execution_time_cap: None,
        }
    }
}

// ============================================================================
// SECTION: Status Records
// ============================================================================

/// Outcome of a successful catalog reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogReload {
    /// Generation installed by the reload.
    pub generation: u64,
    /// Number of tools in the installed catalog.
    pub tools_loaded: usize,
}

/// Overall readiness classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// Catalog loaded and every declared type has a bound executor.
    Healthy,
    /// No catalog loaded yet, or some declared types are unbound.
    Degraded,
}

/// Read-only gateway status snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayHealth {
    /// Readiness classification.
    pub status: HealthStatus,
    /// Tool count of the active catalog.
    pub tools_loaded: usize,
    /// Catalog source label.
    pub catalog_source: String,
    /// Active catalog generation.
    pub catalog_generation: u64,
    /// Wall-clock time of the last successful reload (unix millis).
    pub last_reload_unix_ms: Option<u64>,
    /// Tool types with a bound executor.
    pub executor_types: Vec<ToolType>,
    /// Declared tool types with no bound executor.
    pub unbound_tool_types: Vec<ToolType>,
    /// Executions currently in flight.
    pub in_flight: u64,
}

// ============================================================================
// SECTION: Gateway
// ============================================================================

/// Shared gateway state.
struct GatewayInner {
    /// Active catalog snapshot.
    catalog: CatalogHandle,
    /// Catalog loader.
    source: Arc<dyn CatalogSource>,
    /// Execution capabilities.
    executors: ExecutorRegistry,
    /// Observability emitter.
    recorder: OutcomeRecorder,
    /// Audit sink for reload events.
    audit: Arc<dyn GatewayAuditSink>,
    /// Tier authorizer.
    authorizer: TierAuthorizer,
    /// Optional budget cap.
    budget_cap: Option<Duration>,
    /// Serializes reloads across load and swap.
    reload_lock: Mutex<()>,
}

/// Tool-invocation gateway.
///
/// # Invariants
/// - No lock is held across an execution.
/// - Each execution uses the catalog snapshot taken at call entry.
#[derive(Clone)]
pub struct ToolGateway {
    /// Shared state.
    inner: Arc<GatewayInner>,
}

impl ToolGateway {
    /// Builds a gateway and performs the initial catalog load.
    ///
    /// A failed initial load is audited and leaves the catalog empty.
    #[must_use]
    pub fn new(config: ToolGatewayConfig) -> Self {
        let gateway = Self {
            inner: Arc::new(GatewayInner {
                catalog: CatalogHandle::new(),
                source: config.catalog_source,
                executors: config.executors,
                recorder: OutcomeRecorder::new(config.metrics, Arc::clone(&config.audit)),
                audit: config.audit,
                authorizer: TierAuthorizer::new(config.unknown_tier_policy),
                budget_cap: config.max_execution_time_cap,
                reload_lock: Mutex::new(()),
            }),
        };
        let _ = gateway.reload_catalog();
        gateway
    }

    /// Executes a tool and returns its classified result.
    pub async fn execute(
        &self,
        tool_name: impl Into<ToolName>,
        inputs: Map<String, Value>,
        context: ExecutionContext,
    ) -> ExecutionResult {
        let started = Instant::now();
        let tool = tool_name.into();
        let snapshot = self.inner.catalog.snapshot();
        let metric_tool = if snapshot.catalog.lookup(tool.as_str()).is_some() {
            tool.clone()
        } else {
            ToolName::new(UNCATALOGED_TOOL_LABEL)
        };
        let record =
            self.inner.recorder.begin(tool.clone(), metric_tool, context.clone(), started);

        let admission = panic::catch_unwind(AssertUnwindSafe(|| {
            self.admit(&snapshot.catalog, &tool, &inputs, &context)
        }));
        match admission {
            Ok(Ok(spec)) => {
                let executor = self.inner.executors.resolve(&spec.tool_type);
                let budget = self.budget_for(&context);
                let invocation = ToolInvocation { tool, inputs, context };
                let report = dispatch(executor, &spec.tool_type, invocation, budget).await;
                let outcome = report.outcome.clone();
                record.finish(outcome, Some(&report))
            }
            Ok(Err(rejection)) => record.finish(rejection, None),
            Err(payload) => record.finish(
                ExecutionOutcome::Failure(format!(
                    "internal gateway error: {}",
                    panic_message(payload.as_ref())
                )),
                None,
            ),
        }
    }

    /// Runs validation then authorization against one snapshot.
    fn admit<'a>(
        &self,
        catalog: &'a ToolCatalog,
        tool: &ToolName,
        inputs: &Map<String, Value>,
        context: &ExecutionContext,
    ) -> Result<&'a ToolSpec, ExecutionOutcome> {
        let spec = validate_request(catalog, tool, inputs)
            .map_err(|err| ExecutionOutcome::ValidationError(err.to_string()))?;
        if !self.inner.authorizer.authorize(Some(spec), context) {
            return Err(ExecutionOutcome::PermissionDenied(format!(
                "Insufficient permissions for tool '{tool}'"
            )));
        }
        Ok(spec)
    }

    /// Returns the effective budget for a caller.
    fn budget_for(&self, context: &ExecutionContext) -> Duration {
        let requested = context.execution_budget();
        self.inner.budget_cap.map_or(requested, |cap| requested.min(cap))
    }

    /// Lists the tools the caller is authorized to execute, in name order.
    #[must_use]
    pub fn list_available(&self, context: &ExecutionContext) -> Vec<ToolSummary> {
        let snapshot = self.inner.catalog.snapshot();
        snapshot
            .catalog
            .iter()
            .filter(|spec| self.inner.authorizer.authorize(Some(*spec), context))
            .map(ToolSpec::summary)
            .collect()
    }

    /// Loads the catalog from the source and swaps it in atomically.
    ///
    /// In-flight executions keep the snapshot they started with. On failure
    /// the previous catalog stays active.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogSourceError`] when loading or building the catalog
    /// fails.
    pub fn reload_catalog(&self) -> Result<CatalogReload, CatalogSourceError> {
        let _serialized = self.inner.reload_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let source = self.inner.source.describe();
        let loaded = self.inner.source.load().and_then(ToolCatalog::from_specs);
        match loaded {
            Ok(catalog) => {
                let snapshot = self.inner.catalog.replace(catalog);
                let reload = CatalogReload {
                    generation: snapshot.generation,
                    tools_loaded: snapshot.catalog.len(),
                };
                self.audit_reload(source, &snapshot, ReloadOutcome::Ok, None);
                Ok(reload)
            }
            Err(err) => {
                let snapshot = self.inner.catalog.snapshot();
                self.audit_reload(source, &snapshot, ReloadOutcome::Error, Some(err.to_string()));
                Err(err)
            }
        }
    }

    /// Emits a reload audit event.
    fn audit_reload(
        &self,
        source: String,
        snapshot: &CatalogSnapshot,
        outcome: ReloadOutcome,
        error: Option<String>,
    ) {
        self.inner.audit.record_catalog(&CatalogAuditEvent {
            event: CatalogAuditEvent::EVENT,
            timestamp_ms: timestamp_ms_now(),
            outcome,
            source,
            generation: snapshot.generation,
            tools_loaded: snapshot.catalog.len(),
            error,
        });
    }

    /// Returns a read-only status snapshot.
    #[must_use]
    pub fn health(&self) -> GatewayHealth {
        let snapshot = self.inner.catalog.snapshot();
        let executor_types: Vec<ToolType> =
            self.inner.executors.bound_types().into_iter().collect();
        let unbound_tool_types: Vec<ToolType> = snapshot
            .catalog
            .tool_types()
            .into_iter()
            .filter(|tool_type| !self.inner.executors.contains(tool_type))
            .collect();
        let status = if snapshot.generation == 0 || !unbound_tool_types.is_empty() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };
        GatewayHealth {
            status,
            tools_loaded: snapshot.catalog.len(),
            catalog_source: self.inner.source.describe(),
            catalog_generation: snapshot.generation,
            last_reload_unix_ms: snapshot.loaded_at_unix_ms,
            executor_types,
            unbound_tool_types,
            in_flight: self.inner.recorder.in_flight(),
        }
    }

    /// Returns the active catalog snapshot.
    #[must_use]
    pub fn catalog_snapshot(&self) -> Arc<CatalogSnapshot> {
        self.inner.catalog.snapshot()
    }

    /// Returns the configured unknown-tier policy.
    #[must_use]
    pub fn unknown_tier_policy(&self) -> UnknownTierPolicy {
        self.inner.authorizer.policy()
    }
}
