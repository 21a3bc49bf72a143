// crates/toolgate-core/src/core/result.rs
// ============================================================================
// Module: Execution Results
// Description: Closed outcome taxonomy and the caller-facing result record.
// Purpose: Guarantee every execution maps to exactly one of five statuses.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every gateway execution produces exactly one [`ExecutionResult`]. Results
//! are built from an [`ExecutionOutcome`] so the "error present iff status is
//! not success" rule cannot be violated by construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Status
// ============================================================================

/// Closed execution status enumeration.
///
/// # Invariants
/// - Variants are stable for telemetry labeling and wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Tool returned a value before the deadline.
    Success,
    /// Tool failed, panicked, or has no bound capability.
    Failure,
    /// Deadline elapsed before the tool completed.
    Timeout,
    /// Unknown tool or missing required parameter.
    ValidationError,
    /// Caller tier below the tool's required tier.
    PermissionDenied,
}

impl ExecutionStatus {
    /// All statuses in declaration order.
    pub const ALL: [Self; 5] =
        [Self::Success, Self::Failure, Self::Timeout, Self::ValidationError, Self::PermissionDenied];

    /// Returns a stable label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Timeout => "timeout",
            Self::ValidationError => "validation_error",
            Self::PermissionDenied => "permission_denied",
        }
    }
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Classified outcome of one execution, before latency accounting.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// Successful payload.
    Success(Value),
    /// Failure message.
    Failure(String),
    /// Timeout message.
    Timeout(String),
    /// Validation message.
    ValidationError(String),
    /// Authorization message.
    PermissionDenied(String),
}

impl ExecutionOutcome {
    /// Returns the status for the outcome.
    #[must_use]
    pub const fn status(&self) -> ExecutionStatus {
        match self {
            Self::Success(_) => ExecutionStatus::Success,
            Self::Failure(_) => ExecutionStatus::Failure,
            Self::Timeout(_) => ExecutionStatus::Timeout,
            Self::ValidationError(_) => ExecutionStatus::ValidationError,
            Self::PermissionDenied(_) => ExecutionStatus::PermissionDenied,
        }
    }

    /// Returns the error message for non-success outcomes.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message)
            | Self::Timeout(message)
            | Self::ValidationError(message)
            | Self::PermissionDenied(message) => Some(message),
        }
    }
}

// ============================================================================
// SECTION: Result
// ============================================================================

/// Caller-facing execution result.
///
/// # Invariants
/// - `error` is `Some` iff `status` is not [`ExecutionStatus::Success`].
/// - `data` is `None` unless `status` is [`ExecutionStatus::Success`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Closed status classification.
    pub status: ExecutionStatus,
    /// Tool payload on success.
    pub data: Option<Value>,
    /// Human-readable error on non-success.
    pub error: Option<String>,
    /// Wall-clock time from call entry to result emission.
    pub execution_time_ms: u64,
    /// Token accounting reported for the call; empty when none is reported.
    #[serde(default)]
    pub token_usage: BTreeMap<String, u64>,
    /// Result metadata (tool name and session id at minimum).
    pub metadata: BTreeMap<String, Value>,
}

impl ExecutionResult {
    /// Builds a result from a classified outcome.
    #[must_use]
    pub fn from_outcome(
        outcome: ExecutionOutcome,
        elapsed: Duration,
        metadata: BTreeMap<String, Value>,
    ) -> Self {
        let status = outcome.status();
        let (data, error) = match outcome {
            ExecutionOutcome::Success(data) => (Some(data), None),
            ExecutionOutcome::Failure(message)
            | ExecutionOutcome::Timeout(message)
            | ExecutionOutcome::ValidationError(message)
            | ExecutionOutcome::PermissionDenied(message) => (None, Some(message)),
        };
        Self {
            status,
            data,
            error,
            execution_time_ms: duration_to_millis(elapsed),
            token_usage: BTreeMap::new(),
            metadata,
        }
    }

    /// Returns true when the status is success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }

    /// Returns the measured latency as a duration.
    #[must_use]
    pub const fn execution_time(&self) -> Duration {
        Duration::from_millis(self.execution_time_ms)
    }
}

/// Converts a duration into whole milliseconds, saturating at `u64::MAX`.
fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
