// crates/toolgate-core/src/core/mod.rs
// ============================================================================
// Module: Toolgate Core Types
// Description: Canonical tool catalog, caller context, and result structures.
// Purpose: Provide stable, serializable types for the execution pipeline.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core types define tool specifications, caller context, permission tiers,
//! and the closed execution result taxonomy. These types are the canonical
//! source of truth for any derived surfaces (HTTP, CLI).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod context;
pub mod identifiers;
pub mod result;
pub mod spec;
pub mod tier;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::DEFAULT_MAX_EXECUTION_TIME_SECS;
pub use context::ExecutionContext;
pub use identifiers::SessionId;
pub use identifiers::TenantId;
pub use identifiers::ToolName;
pub use identifiers::ToolType;
pub use result::ExecutionOutcome;
pub use result::ExecutionResult;
pub use result::ExecutionStatus;
pub use spec::ToolSpec;
pub use spec::ToolSummary;
pub use tier::ADMIN_RANK;
pub use tier::GUEST_RANK;
pub use tier::PermissionTier;
pub use tier::USER_RANK;
pub use tier::UnknownTierPolicy;
