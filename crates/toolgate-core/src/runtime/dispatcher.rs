// crates/toolgate-core/src/runtime/dispatcher.rs
// ============================================================================
// Module: Deadline Dispatcher
// Description: Deadline-bound invocation of execution capabilities.
// Purpose: Classify every capability outcome into a closed dispatch state.
// Dependencies: crate::core, crate::interfaces, tokio, thiserror
// ============================================================================

//! ## Overview
//! Dispatch runs the capability on its own task and races it against the
//! budget. The state machine is `pending -> running -> {succeeded, failed,
//! timed_out}`; terminal states accept no further events.
//!
//! On expiry the task is aborted and its handle dropped, so a late completion
//! can never reach the caller or be recorded. The task is also aborted when
//! the dispatch future itself is dropped. Panics inside a capability surface
//! as a [`tokio::task::JoinError`] and are classified as failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::AbortHandle;
use tokio::task::JoinError;
use tokio::time::Instant;

use crate::core::ExecutionOutcome;
use crate::core::ToolType;
use crate::interfaces::ToolExecutor;
use crate::interfaces::ToolInvocation;

// ============================================================================
// SECTION: State Machine
// ============================================================================

/// Dispatch lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Admitted but not yet started.
    Pending,
    /// Capability invocation in progress.
    Running,
    /// Capability returned a value before the deadline.
    Succeeded,
    /// Capability failed, panicked, or was not bound.
    Failed,
    /// Deadline elapsed first.
    TimedOut,
}

/// Events driving dispatch transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEvent {
    /// Dispatch begins.
    Start,
    /// Capability returned a value.
    Complete,
    /// Capability returned an error.
    Fail,
    /// Deadline elapsed.
    Expire,
}

impl DispatchEvent {
    /// Returns a stable label for the event.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Fail => "fail",
            Self::Expire => "expire",
        }
    }
}

/// Rejected dispatch transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchStateError {
    /// Event is not valid in the current state.
    #[error("invalid dispatch transition: {event} while {state}")]
    InvalidTransition {
        /// State label at the time of the event.
        state: &'static str,
        /// Event label.
        event: &'static str,
    },
}

impl DispatchState {
    /// Applies an event and returns the next state.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchStateError::InvalidTransition`] for events that are
    /// not valid in the current state.
    pub const fn apply(self, event: DispatchEvent) -> Result<Self, DispatchStateError> {
        match (self, event) {
            (Self::Pending, DispatchEvent::Start) => Ok(Self::Running),
            (Self::Running, DispatchEvent::Complete) => Ok(Self::Succeeded),
            (Self::Running, DispatchEvent::Fail) => Ok(Self::Failed),
            (Self::Running, DispatchEvent::Expire) => Ok(Self::TimedOut),
            (state, event) => Err(DispatchStateError::InvalidTransition {
                state: state.as_str(),
                event: event.as_str(),
            }),
        }
    }

    /// Returns true for states that accept no further events.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::TimedOut)
    }

    /// Returns a stable label for the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::TimedOut => "timed_out",
        }
    }
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Result of one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    /// Terminal state reached.
    pub state: DispatchState,
    /// Classified outcome.
    pub outcome: ExecutionOutcome,
    /// Time spent from dispatch start to classification.
    pub elapsed: Duration,
}

/// Invokes `executor` for `invocation` under `budget`.
///
/// `executor` is `None` when no capability is bound to `tool_type`; that is
/// reported as a failure rather than a fault.
pub async fn dispatch(
    executor: Option<Arc<dyn ToolExecutor>>,
    tool_type: &ToolType,
    invocation: ToolInvocation,
    budget: Duration,
) -> DispatchReport {
    let started = Instant::now();
    let (event, outcome) = match executor {
        None => (
            DispatchEvent::Fail,
            ExecutionOutcome::Failure(format!("Tool type '{tool_type}' not implemented")),
        ),
        Some(executor) => run_with_deadline(executor, invocation, budget).await,
    };
    let state = DispatchState::Pending
        .apply(DispatchEvent::Start)
        .and_then(|running| running.apply(event))
        .unwrap_or(DispatchState::Failed);
    DispatchReport { state, outcome, elapsed: started.elapsed() }
}

/// Races the capability task against the deadline.
async fn run_with_deadline(
    executor: Arc<dyn ToolExecutor>,
    invocation: ToolInvocation,
    budget: Duration,
) -> (DispatchEvent, ExecutionOutcome) {
    let mut handle = tokio::spawn(async move { executor.execute(invocation).await });
    let _abort = AbortOnDrop(handle.abort_handle());
    match tokio::time::timeout(budget, &mut handle).await {
        Ok(Ok(Ok(data))) => (DispatchEvent::Complete, ExecutionOutcome::Success(data)),
        Ok(Ok(Err(err))) => (DispatchEvent::Fail, ExecutionOutcome::Failure(err.to_string())),
        Ok(Err(err)) => (DispatchEvent::Fail, ExecutionOutcome::Failure(join_error_message(err))),
        Err(_) => {
            handle.abort();
            (
                DispatchEvent::Expire,
                ExecutionOutcome::Timeout(format!(
                    "Tool execution timed out after {}s",
                    budget.as_secs()
                )),
            )
        }
    }
}

/// Aborts the capability task when dispatch ends or is abandoned.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Renders a join failure as a failure message.
fn join_error_message(err: JoinError) -> String {
    if err.is_panic() {
        let payload = err.into_panic();
        format!("tool execution panicked: {}", panic_message(payload.as_ref()))
    } else {
        "tool execution cancelled".to_string()
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
