// crates/toolgate-server/src/server.rs
// ============================================================================
// Module: Gateway Server
// Description: Gateway assembly and the HTTP listener.
// Purpose: Turn configuration into a running gateway service.
// Dependencies: toolgate-core, toolgate-config, toolgate-providers, axum, tokio
// ============================================================================

//! ## Overview
//! Gateway assembly from configuration and the HTTP listener.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use toolgate_config::AuditConfig;
use toolgate_config::FileCatalogSource;
use toolgate_config::GatewayConfig;
use toolgate_core::FileAuditSink;
use toolgate_core::GatewayAuditSink;
use toolgate_core::GatewayMetrics;
use toolgate_core::InMemoryMetrics;
use toolgate_core::NoopAuditSink;
use toolgate_core::StderrAuditSink;
use toolgate_core::ToolGateway;
use toolgate_core::ToolGatewayConfig;
use toolgate_providers::build_registry;

use crate::routes::ServerState;
use crate::routes::build_router;

// ============================================================================
// SECTION: Assembly
// ============================================================================

/// Gateway plus the metrics sink it reports into.
#[derive(Clone)]
pub struct BuiltGateway {
    /// Assembled gateway.
    pub gateway: ToolGateway,
    /// In-memory metrics exposed at `/metrics`.
    pub metrics: Arc<InMemoryMetrics>,
}

/// Builds a gateway from configuration and performs the initial catalog load.
///
/// A failed initial load does not fail assembly; the gateway serves an empty
/// catalog and reports itself degraded.
///
/// # Errors
///
/// Returns [`ServerError`] when the config is invalid or the audit log
/// cannot be opened.
pub fn build_gateway(config: &GatewayConfig) -> Result<BuiltGateway, ServerError> {
    config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
    let metrics = Arc::new(InMemoryMetrics::new());
    let source = Arc::new(FileCatalogSource::new(config.resolved_catalog_path()));
    let mut gateway_config = ToolGatewayConfig::new(source);
    gateway_config.executors = build_registry(&config.executors);
    gateway_config.metrics = Arc::clone(&metrics) as Arc<dyn GatewayMetrics>;
    gateway_config.audit = build_audit_sink(&config.audit)?;
    gateway_config.unknown_tier_policy = config.execution.unknown_tier_policy;
    gateway_config.max_execution_time_cap = config.execution.max_execution_time_cap();
    Ok(BuiltGateway { gateway: ToolGateway::new(gateway_config), metrics })
}

/// Selects the audit sink for the configured destination.
fn build_audit_sink(config: &AuditConfig) -> Result<Arc<dyn GatewayAuditSink>, ServerError> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &config.path {
        Some(path) => {
            let sink = FileAuditSink::new(path).map_err(|err| {
                ServerError::Init(format!("audit log {}: {err}", path.display()))
            })?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// HTTP server instance.
pub struct GatewayServer {
    /// Validated configuration.
    config: GatewayConfig,
    /// Assembled gateway and metrics.
    built: BuiltGateway,
}

impl GatewayServer {
    /// Builds a new server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when initialization fails.
    pub fn from_config(config: GatewayConfig) -> Result<Self, ServerError> {
        let built = build_gateway(&config)?;
        Ok(Self { config, built })
    }

    /// Returns the gateway served by this instance.
    #[must_use]
    pub const fn gateway(&self) -> &ToolGateway {
        &self.built.gateway
    }

    /// Builds the axum router for this server.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(ServerState {
            gateway: self.built.gateway.clone(),
            metrics: Arc::clone(&self.built.metrics),
            max_body_bytes: self.config.server.max_body_bytes,
        })
    }

    /// Binds the configured address and serves until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr =
            self.config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
        self.serve_listener(listener).await
    }

    /// Serves on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when serving fails.
    pub async fn serve_listener(self, listener: TcpListener) -> Result<(), ServerError> {
        let app = self.router();
        axum::serve(listener, app)
            .await
            .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
