// crates/toolgate-server/src/lib.rs
// ============================================================================
// Module: Toolgate Server
// Description: HTTP surface and config-driven gateway assembly.
// Purpose: Expose execute, list, reload, health, and metrics over HTTP.
// Dependencies: toolgate-core, toolgate-config, toolgate-providers, axum, tokio
// ============================================================================

//! ## Overview
//! [`build_gateway`] assembles a [`toolgate_core::ToolGateway`] from a
//! validated [`toolgate_config::GatewayConfig`]. [`GatewayServer`] serves it
//! over HTTP with axum. Request bodies are untrusted; malformed bodies are
//! rejected before they reach the gateway.

pub mod routes;
pub mod server;

pub use routes::ExecuteRequest;
pub use routes::ROUTE_CATALOG_RELOAD;
pub use routes::ROUTE_EXECUTE;
pub use routes::ROUTE_HEALTH;
pub use routes::ROUTE_LIST;
pub use routes::ROUTE_METRICS;
pub use server::BuiltGateway;
pub use server::GatewayServer;
pub use server::ServerError;
pub use server::build_gateway;
