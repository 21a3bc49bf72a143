// crates/toolgate-core/src/runtime/authorizer/tests.rs
// ============================================================================
// Module: Tier Authorizer Tests
// Description: Tier ordering and unknown-tier policy coverage.
// Dependencies: toolgate-core
// ============================================================================

use super::TierAuthorizer;
use crate::core::ExecutionContext;
use crate::core::PermissionTier;
use crate::core::ToolSpec;
use crate::core::UnknownTierPolicy;

fn ctx(tier: &str) -> ExecutionContext {
    ExecutionContext::new("tenant-1", "session-1").with_tier(tier)
}

fn tool(required: &str) -> ToolSpec {
    ToolSpec::new("tool", "echo").with_required_permission(required)
}

#[test]
fn total_order_is_guest_user_admin() {
    let authz = TierAuthorizer::default();
    let tiers = ["guest", "user", "admin"];
    for (caller_rank, caller) in tiers.iter().enumerate() {
        for (required_rank, required) in tiers.iter().enumerate() {
            assert_eq!(
                authz.authorize(Some(&tool(required)), &ctx(caller)),
                caller_rank >= required_rank,
                "caller {caller} vs required {required}"
            );
        }
    }
}

#[test]
fn guest_is_denied_user_tool() {
    let authz = TierAuthorizer::default();
    assert!(!authz.authorize(Some(&tool("user")), &ctx("guest")));
}

#[test]
fn unknown_tool_is_never_authorized() {
    let authz = TierAuthorizer::default();
    assert!(!authz.authorize(None, &ctx("admin")));
}

#[test]
fn unrecognized_caller_tier_ranks_as_user_by_default() {
    let authz = TierAuthorizer::default();
    assert!(!authz.authorize(Some(&tool("admin")), &ctx("superuser")));
    assert!(authz.authorize(Some(&tool("user")), &ctx("superuser")));
}

#[test]
fn tier_labels_are_case_sensitive() {
    let authz = TierAuthorizer::default();
    assert!(!PermissionTier::parse("Admin").is_recognized());
    assert!(!authz.authorize(Some(&tool("admin")), &ctx("Admin")));
}

#[test]
fn unrecognized_required_tier_ranks_as_user_by_default() {
    let authz = TierAuthorizer::default();
    assert!(authz.authorize(Some(&tool("operators")), &ctx("user")));
    assert!(!authz.authorize(Some(&tool("operators")), &ctx("guest")));
}

#[test]
fn fail_closed_policy_ranks_unknown_caller_lowest_and_unknown_requirement_highest() {
    let authz = TierAuthorizer::new(UnknownTierPolicy::FailClosed);
    assert_eq!(authz.policy(), UnknownTierPolicy::FailClosed);
    assert!(!authz.authorize(Some(&tool("user")), &ctx("superuser")));
    assert!(authz.authorize(Some(&tool("guest")), &ctx("superuser")));
    assert!(!authz.authorize(Some(&tool("operators")), &ctx("user")));
    assert!(authz.authorize(Some(&tool("operators")), &ctx("admin")));
}
