// crates/toolgate-core/src/runtime/mod.rs
// ============================================================================
// Module: Toolgate Runtime
// Description: Execution pipeline composed from catalog to recorder.
// Purpose: Group the pipeline stages and the gateway that composes them.
// Dependencies: crate::core, crate::interfaces, tokio
// ============================================================================

//! ## Overview
//! Execution pipeline stages and the gateway that composes them.

pub mod authorizer;
pub mod catalog;
pub mod dispatcher;
pub mod executors;
pub mod gateway;
pub mod recorder;
pub mod validator;

pub use authorizer::TierAuthorizer;
pub use catalog::CatalogHandle;
pub use catalog::CatalogSnapshot;
pub use catalog::StaticCatalogSource;
pub use catalog::ToolCatalog;
pub use dispatcher::DispatchEvent;
pub use dispatcher::DispatchReport;
pub use dispatcher::DispatchState;
pub use dispatcher::DispatchStateError;
pub use dispatcher::dispatch;
pub use executors::ExecutorRegistry;
pub use gateway::CatalogReload;
pub use gateway::GatewayHealth;
pub use gateway::HealthStatus;
pub use gateway::ToolGateway;
pub use gateway::ToolGatewayConfig;
pub use recorder::CANCELLED_BY_CALLER;
pub use recorder::ExecutionRecord;
pub use recorder::OutcomeRecorder;
pub use validator::ValidationError;
pub use validator::validate_inputs;
pub use validator::validate_request;
