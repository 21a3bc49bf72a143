// crates/toolgate-core/src/telemetry.rs
// ============================================================================
// Module: Gateway Telemetry
// Description: Observability hooks for tool executions.
// Purpose: Provide metric events and latency buckets without hard deps.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for execution counters,
//! latency histograms, and the in-flight gauge. Deployments plug in their own
//! exporter by implementing [`GatewayMetrics`]; [`InMemoryMetrics`] keeps
//! labeled aggregates in process for tests and the JSON metrics endpoint.
//! Security posture: labels come from untrusted callers and must never be
//! used to build exporter queries without escaping. Tool labels are bounded by
//! the catalog; unknown names collapse into [`UNCATALOGED_TOOL_LABEL`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;

use serde::Serialize;

use crate::core::ExecutionStatus;
use crate::core::TenantId;
use crate::core::ToolName;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Counter name for completed executions (labels: tool_name, status, tenant_id).
pub const TOOL_EXECUTIONS_TOTAL: &str = "toolgate_tool_executions_total";
/// Histogram name for execution latency (labels: tool_name, tenant_id).
pub const TOOL_EXECUTION_DURATION_SECONDS: &str = "toolgate_tool_execution_duration_seconds";
/// Gauge name for executions in flight (labels: tool_name, tenant_id).
pub const ACTIVE_TOOL_EXECUTIONS: &str = "toolgate_active_tool_executions";

/// Tool label used for calls naming a tool absent from the active catalog.
pub const UNCATALOGED_TOOL_LABEL: &str = "unknown";

/// Default latency buckets in seconds for execution histograms.
pub const EXECUTION_LATENCY_BUCKETS_SECONDS: &[f64] =
    &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0];

// ============================================================================
// SECTION: Metric Events
// ============================================================================

/// Execution metric event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricEvent {
    /// Catalog tool name, or [`UNCATALOGED_TOOL_LABEL`].
    pub tool: ToolName,
    /// Tenant the call was made for.
    pub tenant_id: TenantId,
    /// Final status.
    pub status: ExecutionStatus,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for tool executions.
pub trait GatewayMetrics: Send + Sync {
    /// Records one execution counter increment.
    fn record_execution(&self, event: &ExecutionMetricEvent);
    /// Records one latency observation.
    fn record_latency(&self, event: &ExecutionMetricEvent, latency: Duration);
    /// Applies a delta to the in-flight gauge.
    fn adjust_in_flight(&self, tool: &ToolName, tenant_id: &TenantId, delta: i64);
}

/// No-op metrics sink.
///
/// # Invariants
/// - Metrics are intentionally discarded.
pub struct NoopMetrics;

impl GatewayMetrics for NoopMetrics {
    fn record_execution(&self, _event: &ExecutionMetricEvent) {}

    fn record_latency(&self, _event: &ExecutionMetricEvent, _latency: Duration) {}

    fn adjust_in_flight(&self, _tool: &ToolName, _tenant_id: &TenantId, _delta: i64) {}
}

// ============================================================================
// SECTION: In-Memory Metrics
// ============================================================================

/// Counter sample in a metrics snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterSample {
    /// Tool label.
    pub tool_name: String,
    /// Status label.
    pub status: String,
    /// Tenant label.
    pub tenant_id: String,
    /// Accumulated count.
    pub value: u64,
}

/// Histogram sample in a metrics snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSample {
    /// Tool label.
    pub tool_name: String,
    /// Tenant label.
    pub tenant_id: String,
    /// Observation count.
    pub count: u64,
    /// Sum of observations in seconds.
    pub sum_seconds: f64,
    /// Cumulative counts per upper bound in [`EXECUTION_LATENCY_BUCKETS_SECONDS`].
    pub buckets: Vec<u64>,
}

/// Gauge sample in a metrics snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GaugeSample {
    /// Tool label.
    pub tool_name: String,
    /// Tenant label.
    pub tenant_id: String,
    /// Current value.
    pub value: i64,
}

/// Serializable view of all in-memory metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Execution counter samples.
    pub toolgate_tool_executions_total: Vec<CounterSample>,
    /// Latency histogram samples.
    pub toolgate_tool_execution_duration_seconds: Vec<HistogramSample>,
    /// In-flight gauge samples.
    pub toolgate_active_tool_executions: Vec<GaugeSample>,
}

/// Label key for counters.
type CounterKey = (String, ExecutionStatus, String);
/// Label key for histograms and gauges.
type SeriesKey = (String, String);

/// Running histogram state.
#[derive(Debug, Clone, Default)]
struct Histogram {
    /// Observation count.
    count: u64,
    /// Sum of observations in seconds.
    sum_seconds: f64,
    /// Non-cumulative counts per bucket.
    buckets: Vec<u64>,
}

impl Histogram {
    /// Adds one observation.
    fn observe(&mut self, seconds: f64) {
        if self.buckets.is_empty() {
            self.buckets = vec![0; EXECUTION_LATENCY_BUCKETS_SECONDS.len()];
        }
        self.count = self.count.saturating_add(1);
        self.sum_seconds += seconds;
        if let Some(index) =
            EXECUTION_LATENCY_BUCKETS_SECONDS.iter().position(|bound| seconds <= *bound)
            && let Some(slot) = self.buckets.get_mut(index)
        {
            *slot = slot.saturating_add(1);
        }
    }

    /// Returns cumulative bucket counts.
    fn cumulative(&self) -> Vec<u64> {
        let mut running = 0_u64;
        self.buckets
            .iter()
            .map(|count| {
                running = running.saturating_add(*count);
                running
            })
            .collect()
    }
}

/// Mutable metric state guarded by one lock.
#[derive(Debug, Default)]
struct MetricState {
    /// Execution counters.
    counters: BTreeMap<CounterKey, u64>,
    /// Latency histograms.
    histograms: BTreeMap<SeriesKey, Histogram>,
    /// In-flight gauges.
    gauges: BTreeMap<SeriesKey, i64>,
}

/// Thread-safe in-process metrics sink.
///
/// # Invariants
/// - Updates from concurrent callers are never lost.
#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    /// Guarded metric state.
    state: Mutex<MetricState>,
}

impl InMemoryMetrics {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with the locked state.
    fn with_state<T>(&self, f: impl FnOnce(&mut MetricState) -> T) -> T {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Returns the counter value for one label set.
    #[must_use]
    pub fn execution_count(&self, tool: &str, status: ExecutionStatus, tenant_id: &str) -> u64 {
        self.with_state(|state| {
            state
                .counters
                .get(&(tool.to_string(), status, tenant_id.to_string()))
                .copied()
                .unwrap_or(0)
        })
    }

    /// Returns the sum of all execution counters.
    #[must_use]
    pub fn total_executions(&self) -> u64 {
        self.with_state(|state| state.counters.values().sum())
    }

    /// Returns the number of latency observations for one series.
    #[must_use]
    pub fn latency_count(&self, tool: &str, tenant_id: &str) -> u64 {
        self.with_state(|state| {
            state
                .histograms
                .get(&(tool.to_string(), tenant_id.to_string()))
                .map_or(0, |histogram| histogram.count)
        })
    }

    /// Returns the sum of latency observations across all series.
    #[must_use]
    pub fn total_latency_observations(&self) -> u64 {
        self.with_state(|state| state.histograms.values().map(|histogram| histogram.count).sum())
    }

    /// Returns the in-flight gauge for one series.
    #[must_use]
    pub fn in_flight(&self, tool: &str, tenant_id: &str) -> i64 {
        self.with_state(|state| {
            state.gauges.get(&(tool.to_string(), tenant_id.to_string())).copied().unwrap_or(0)
        })
    }

    /// Returns a serializable view of every series.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.with_state(|state| MetricsSnapshot {
            toolgate_tool_executions_total: state
                .counters
                .iter()
                .map(|((tool, status, tenant), value)| CounterSample {
                    tool_name: tool.clone(),
                    status: status.as_str().to_string(),
                    tenant_id: tenant.clone(),
                    value: *value,
                })
                .collect(),
            toolgate_tool_execution_duration_seconds: state
                .histograms
                .iter()
                .map(|((tool, tenant), histogram)| HistogramSample {
                    tool_name: tool.clone(),
                    tenant_id: tenant.clone(),
                    count: histogram.count,
                    sum_seconds: histogram.sum_seconds,
                    buckets: histogram.cumulative(),
                })
                .collect(),
            toolgate_active_tool_executions: state
                .gauges
                .iter()
                .map(|((tool, tenant), value)| GaugeSample {
                    tool_name: tool.clone(),
                    tenant_id: tenant.clone(),
                    value: *value,
                })
                .collect(),
        })
    }
}

impl GatewayMetrics for InMemoryMetrics {
    fn record_execution(&self, event: &ExecutionMetricEvent) {
        let key = (event.tool.to_string(), event.status, event.tenant_id.to_string());
        self.with_state(|state| {
            let counter = state.counters.entry(key).or_insert(0);
            *counter = counter.saturating_add(1);
        });
    }

    fn record_latency(&self, event: &ExecutionMetricEvent, latency: Duration) {
        let key = (event.tool.to_string(), event.tenant_id.to_string());
        self.with_state(|state| {
            state.histograms.entry(key).or_default().observe(latency.as_secs_f64());
        });
    }

    fn adjust_in_flight(&self, tool: &ToolName, tenant_id: &TenantId, delta: i64) {
        let key = (tool.to_string(), tenant_id.to_string());
        self.with_state(|state| {
            let gauge = state.gauges.entry(key).or_insert(0);
            *gauge = gauge.saturating_add(delta);
        });
    }
}
