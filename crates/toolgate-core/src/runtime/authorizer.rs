// crates/toolgate-core/src/runtime/authorizer.rs
// ============================================================================
// Module: Tier Authorizer
// Description: Caller tier versus required tier comparison.
// Purpose: Deny executions whose caller ranks below the tool's requirement.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Authorization succeeds iff the caller's tier rank is at least the tool's
//! required rank. Unrecognized labels are ranked by the configured
//! [`UnknownTierPolicy`]. A tool absent from the catalog is never authorized.
//!
//! Security posture: [`UnknownTierPolicy::FailOpenUser`] ranks misconfigured
//! tiers as `user`; hardened deployments select
//! [`UnknownTierPolicy::FailClosed`].

use crate::core::ExecutionContext;
use crate::core::PermissionTier;
use crate::core::ToolSpec;
use crate::core::UnknownTierPolicy;

/// Tier-based authorizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierAuthorizer {
    /// Ranking policy for unrecognized labels.
    policy: UnknownTierPolicy,
}

impl TierAuthorizer {
    /// Creates an authorizer with the given unknown-tier policy.
    #[must_use]
    pub const fn new(policy: UnknownTierPolicy) -> Self {
        Self { policy }
    }

    /// Returns the configured policy.
    #[must_use]
    pub const fn policy(&self) -> UnknownTierPolicy {
        self.policy
    }

    /// Returns true when `context` may execute the tool described by `spec`.
    #[must_use]
    pub fn authorize(&self, spec: Option<&ToolSpec>, context: &ExecutionContext) -> bool {
        spec.is_some_and(|spec| self.permits(&context.permission_tier, &spec.required_permission))
    }

    /// Returns true when `caller` ranks at or above `required`.
    #[must_use]
    pub fn permits(&self, caller: &PermissionTier, required: &PermissionTier) -> bool {
        self.policy.caller_rank(caller) >= self.policy.required_rank(required)
    }
}

#[cfg(test)]
mod tests;
