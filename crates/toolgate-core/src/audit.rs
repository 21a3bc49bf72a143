// crates/toolgate-core/src/audit.rs
// ============================================================================
// Module: Gateway Audit Logging
// Description: Structured audit events for executions and catalog reloads.
// Purpose: Emit JSON-lines logs without hard dependencies.
// Dependencies: crate::core, serde, serde_json
// ============================================================================

//! ## Overview
//! Audit events are the gateway's structured log. Every execute call yields
//! exactly one `tool_execution` event and every reload attempt yields one
//! `catalog_reload` event. Sinks serialize events as JSON lines; routing them
//! into a log pipeline is left to the deployment.
//! Security posture: events carry labels and error messages only, never tool
//! inputs or payloads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::ExecutionStatus;
use crate::core::SessionId;
use crate::core::TenantId;
use crate::core::ToolName;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Execution audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Tool name as requested.
    pub tool: ToolName,
    /// Tenant identifier.
    pub tenant_id: TenantId,
    /// Session identifier.
    pub session_id: SessionId,
    /// Caller tier label.
    pub permission_tier: String,
    /// Final status.
    pub status: ExecutionStatus,
    /// Latency from call entry to result emission.
    pub execution_time_ms: u64,
    /// Error message for non-success outcomes.
    pub error: Option<String>,
    /// Terminal dispatch state; absent when the call never reached dispatch.
    pub dispatch_state: Option<&'static str>,
    /// Time spent in dispatch, in milliseconds.
    pub dispatch_ms: Option<u64>,
}

impl ExecutionAuditEvent {
    /// Event identifier for execution events.
    pub const EVENT: &'static str = "tool_execution";
}

/// Catalog reload outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadOutcome {
    /// New catalog installed.
    Ok,
    /// Load failed; previous catalog kept.
    Error,
}

/// Catalog reload audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Reload outcome.
    pub outcome: ReloadOutcome,
    /// Catalog source label.
    pub source: String,
    /// Active generation after the attempt.
    pub generation: u64,
    /// Tool count of the active catalog after the attempt.
    pub tools_loaded: usize,
    /// Load error message when the attempt failed.
    pub error: Option<String>,
}

impl CatalogAuditEvent {
    /// Event identifier for reload events.
    pub const EVENT: &'static str = "catalog_reload";
}

/// Returns the current time in milliseconds since epoch.
#[must_use]
pub fn timestamp_ms_now() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |elapsed| elapsed.as_millis())
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for gateway events.
pub trait GatewayAuditSink: Send + Sync {
    /// Record an execution event.
    fn record_execution(&self, event: &ExecutionAuditEvent);

    /// Record a catalog reload event.
    fn record_catalog(&self, _event: &CatalogAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl GatewayAuditSink for StderrAuditSink {
    fn record_execution(&self, event: &ExecutionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_catalog(&self, event: &CatalogAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file: Mutex::new(file) })
    }

    /// Appends one serialized line.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl GatewayAuditSink for FileAuditSink {
    fn record_execution(&self, event: &ExecutionAuditEvent) {
        self.append(event);
    }

    fn record_catalog(&self, event: &CatalogAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl GatewayAuditSink for NoopAuditSink {
    fn record_execution(&self, _event: &ExecutionAuditEvent) {}

    fn record_catalog(&self, _event: &CatalogAuditEvent) {}
}
