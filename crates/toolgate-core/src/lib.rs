// crates/toolgate-core/src/lib.rs
// ============================================================================
// Module: Toolgate Core Library
// Description: Public API surface for the Toolgate execution pipeline.
// Purpose: Expose core types, interfaces, runtime, and observability hooks.
// Dependencies: crate::{audit, core, interfaces, runtime, telemetry}
// ============================================================================

//! ## Overview
//! Toolgate core turns an untrusted `(tool_name, inputs, context)` triple into
//! a bounded, classified [`ExecutionResult`]. It validates required inputs,
//! enforces tiered permissions, dispatches to a capability under a deadline,
//! and records every outcome exactly once. Catalog loading and tool
//! implementations integrate through the traits in [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use audit::CatalogAuditEvent;
pub use audit::ExecutionAuditEvent;
pub use audit::FileAuditSink;
pub use audit::GatewayAuditSink;
pub use audit::NoopAuditSink;
pub use audit::ReloadOutcome;
pub use audit::StderrAuditSink;
pub use interfaces::CatalogSource;
pub use interfaces::CatalogSourceError;
pub use interfaces::ToolExecutor;
pub use interfaces::ToolExecutorError;
pub use interfaces::ToolInvocation;
pub use runtime::CatalogReload;
pub use runtime::CatalogSnapshot;
pub use runtime::ExecutorRegistry;
pub use runtime::GatewayHealth;
pub use runtime::HealthStatus;
pub use runtime::StaticCatalogSource;
pub use runtime::TierAuthorizer;
pub use runtime::ToolCatalog;
pub use runtime::ToolGateway;
pub use runtime::ToolGatewayConfig;
pub use runtime::ValidationError;
pub use telemetry::ExecutionMetricEvent;
pub use telemetry::GatewayMetrics;
pub use telemetry::InMemoryMetrics;
pub use telemetry::MetricsSnapshot;
pub use telemetry::NoopMetrics;
pub use telemetry::UNCATALOGED_TOOL_LABEL;
