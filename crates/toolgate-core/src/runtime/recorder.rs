// crates/toolgate-core/src/runtime/recorder.rs
// ============================================================================
// Module: Outcome Recorder
// Description: Observability emissions for finished executions.
// Purpose: Emit exactly one counter, latency, and audit record per call.
// Dependencies: crate::audit, crate::core, crate::telemetry, tokio
// ============================================================================

//! ## Overview
//! The recorder owns the in-flight accounting and the per-call emissions.
//! [`OutcomeRecorder::begin`] increments the gauge and returns an
//! [`ExecutionRecord`]. [`ExecutionRecord::finish`] emits the counter, the
//! latency observation, and the audit event and builds the caller's result.
//!
//! Dropping a record that was never finished (the caller abandoned the
//! `execute` future) records a `failure` with [`CANCELLED_BY_CALLER`]. Either
//! way the gauge is released exactly once, after the emissions.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use crate::audit::ExecutionAuditEvent;
use crate::audit::GatewayAuditSink;
use crate::audit::timestamp_ms_now;
use crate::core::ExecutionContext;
use crate::core::ExecutionOutcome;
use crate::core::ExecutionResult;
use crate::core::ToolName;
use crate::runtime::dispatcher::DispatchReport;
use crate::telemetry::ExecutionMetricEvent;
use crate::telemetry::GatewayMetrics;

/// Failure message recorded for calls abandoned before completion.
pub const CANCELLED_BY_CALLER: &str = "execution cancelled by caller";

/// Per-call observability emitter shared by all executions.
#[derive(Clone)]
pub struct OutcomeRecorder {
    /// Metrics sink.
    metrics: Arc<dyn GatewayMetrics>,
    /// Audit sink.
    audit: Arc<dyn GatewayAuditSink>,
    /// Process-local in-flight count across all labels.
    in_flight: Arc<AtomicU64>,
}

impl OutcomeRecorder {
    /// Creates a recorder over the given sinks.
    #[must_use]
    pub fn new(metrics: Arc<dyn GatewayMetrics>, audit: Arc<dyn GatewayAuditSink>) -> Self {
        Self { metrics, audit, in_flight: Arc::new(AtomicU64::new(0)) }
    }

    /// Marks one execution as in flight.
    ///
    /// `metric_tool` is the tool label used for metric series; `tool` is the
    /// name as requested and goes into the audit event and result metadata.
    #[must_use = "dropping the record immediately records a cancelled call"]
    pub fn begin(
        &self,
        tool: ToolName,
        metric_tool: ToolName,
        context: ExecutionContext,
        started: Instant,
    ) -> ExecutionRecord {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.metrics.adjust_in_flight(&metric_tool, &context.tenant_id, 1);
        ExecutionRecord {
            recorder: self.clone(),
            tool,
            metric_tool,
            context,
            started,
            finished: false,
        }
    }

    /// Returns the number of executions currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::SeqCst)
    }
}

/// Accounting span for one execute call.
///
/// # Invariants
/// - Emissions happen exactly once, from `finish` or from `drop`.
/// - The in-flight gauge is released exactly once, in `drop`.
pub struct ExecutionRecord {
    /// Owning recorder.
    recorder: OutcomeRecorder,
    /// Tool name as requested.
    tool: ToolName,
    /// Tool label for metric series.
    metric_tool: ToolName,
    /// Caller context.
    context: ExecutionContext,
    /// Call entry time.
    started: Instant,
    /// Set once emissions have happened.
    finished: bool,
}

impl ExecutionRecord {
    /// Builds the result for `outcome`, emits its observability, and closes
    /// the span.
    pub fn finish(
        mut self,
        outcome: ExecutionOutcome,
        dispatch: Option<&DispatchReport>,
    ) -> ExecutionResult {
        let result = self.emit(outcome, dispatch);
        self.finished = true;
        result
    }

    /// Emits the counter, latency observation, and audit event.
    fn emit(
        &self,
        outcome: ExecutionOutcome,
        dispatch: Option<&DispatchReport>,
    ) -> ExecutionResult {
        let elapsed = self.started.elapsed();
        let result = ExecutionResult::from_outcome(outcome, elapsed, self.metadata());
        let recorder = &self.recorder;
        let event = ExecutionMetricEvent {
            tool: self.metric_tool.clone(),
            tenant_id: self.context.tenant_id.clone(),
            status: result.status,
        };
        recorder.metrics.record_execution(&event);
        recorder.metrics.record_latency(&event, elapsed);
        recorder.audit.record_execution(&ExecutionAuditEvent {
            event: ExecutionAuditEvent::EVENT,
            timestamp_ms: timestamp_ms_now(),
            tool: self.tool.clone(),
            tenant_id: self.context.tenant_id.clone(),
            session_id: self.context.session_id.clone(),
            permission_tier: self.context.permission_tier.to_string(),
            status: result.status,
            execution_time_ms: result.execution_time_ms,
            error: result.error.clone(),
            dispatch_state: dispatch.map(|report| report.state.as_str()),
            dispatch_ms: dispatch.map(|report| duration_to_millis(report.elapsed)),
        });
        result
    }

    /// Result metadata for the call.
    fn metadata(&self) -> BTreeMap<String, Value> {
        BTreeMap::from([
            ("tool_name".to_string(), Value::String(self.tool.to_string())),
            ("session_id".to_string(), Value::String(self.context.session_id.to_string())),
        ])
    }
}

impl Drop for ExecutionRecord {
    fn drop(&mut self) {
        if !self.finished {
            self.finished = true;
            let _ = self.emit(ExecutionOutcome::Failure(CANCELLED_BY_CALLER.to_string()), None);
        }
        let recorder = &self.recorder;
        recorder.metrics.adjust_in_flight(&self.metric_tool, &self.context.tenant_id, -1);
        recorder.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Converts a duration into whole milliseconds, saturating at `u64::MAX`.
fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
