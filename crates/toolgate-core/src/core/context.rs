// crates/toolgate-core/src/core/context.rs
// ============================================================================
// Module: Execution Context
// Description: Per-call caller context supplied with every tool execution.
// Purpose: Carry tenant, session, tier, and budget through the pipeline.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The execution context is supplied by the caller, is immutable for the
//! duration of one execution, and is never persisted by the gateway.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::SessionId;
use crate::core::identifiers::TenantId;
use crate::core::tier::PermissionTier;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default execution budget in seconds.
pub const DEFAULT_MAX_EXECUTION_TIME_SECS: u64 = 30;

// ============================================================================
// SECTION: Execution Context
// ============================================================================

/// Caller context for a single tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Tenant the call is billed and labeled against.
    pub tenant_id: TenantId,
    /// Agent session identifier.
    pub session_id: SessionId,
    /// Optional end-user identifier.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Optional agent identifier.
    #[serde(default)]
    pub agent_id: Option<String>,
    /// Caller permission tier.
    #[serde(default)]
    pub permission_tier: PermissionTier,
    /// Execution budget in seconds, measured from dispatch start.
    #[serde(default = "default_max_execution_time")]
    pub max_execution_time: u64,
    /// Free-form caller metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl ExecutionContext {
    /// Creates a context with the default tier and budget.
    #[must_use]
    pub fn new(tenant_id: impl Into<TenantId>, session_id: impl Into<SessionId>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            session_id: session_id.into(),
            user_id: None,
            agent_id: None,
            permission_tier: PermissionTier::default(),
            max_execution_time: DEFAULT_MAX_EXECUTION_TIME_SECS,
            metadata: BTreeMap::new(),
        }
    }

    /// Returns a copy with the permission tier set.
    #[must_use]
    pub fn with_tier(mut self, tier: impl Into<PermissionTier>) -> Self {
        self.permission_tier = tier.into();
        self
    }

    /// Returns a copy with the execution budget set in seconds.
    #[must_use]
    pub const fn with_max_execution_time(mut self, seconds: u64) -> Self {
        self.max_execution_time = seconds;
        self
    }

    /// Returns a copy with the user identifier set.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Returns a copy with the agent identifier set.
    #[must_use]
    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    /// Returns the execution budget as a duration.
    #[must_use]
    pub const fn execution_budget(&self) -> Duration {
        Duration::from_secs(self.max_execution_time)
    }
}

/// Serde default for [`ExecutionContext::max_execution_time`].
const fn default_max_execution_time() -> u64 {
    DEFAULT_MAX_EXECUTION_TIME_SECS
}
