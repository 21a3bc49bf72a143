// crates/toolgate-server/src/routes.rs
// ============================================================================
// Module: HTTP Routes
// Description: axum handlers for the gateway operation surface.
// Purpose: Decode untrusted request bodies and map gateway calls to HTTP.
// Dependencies: toolgate-core, axum, serde, tokio
// ============================================================================

//! ## Overview
//! Execution responses are always `200 OK` carrying the
//! [`toolgate_core::ExecutionResult`]; the status field inside the body is
//! the classification. Malformed bodies are `400`, bodies above the
//! configured limit are `413`. Each execute call runs on its own task so a
//! disconnecting client cannot abandon an execution between dispatch and
//! recording.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use toolgate_core::ExecutionContext;
use toolgate_core::InMemoryMetrics;
use toolgate_core::ToolGateway;

// ============================================================================
// SECTION: Routes
// ============================================================================

/// Execute a tool by name.
pub const ROUTE_EXECUTE: &str = "/v1/tools/{name}/execute";
/// List tools visible to a caller context.
pub const ROUTE_LIST: &str = "/v1/tools/list";
/// Reload the catalog from its source.
pub const ROUTE_CATALOG_RELOAD: &str = "/v1/catalog/reload";
/// Gateway health snapshot.
pub const ROUTE_HEALTH: &str = "/v1/health";
/// In-memory metrics snapshot.
pub const ROUTE_METRICS: &str = "/metrics";

/// Shared state for route handlers.
#[derive(Clone)]
pub(crate) struct ServerState {
    /// Gateway handling requests.
    pub(crate) gateway: ToolGateway,
    /// Metrics sink shared with the gateway.
    pub(crate) metrics: Arc<InMemoryMetrics>,
    /// Maximum allowed request body size.
    pub(crate) max_body_bytes: usize,
}

/// Builds the router with every gateway route.
pub(crate) fn build_router(state: ServerState) -> Router {
    // One byte over the limit reaches the handler, which answers 413 in JSON.
    let transport_limit = state.max_body_bytes.saturating_add(1);
    Router::new()
        .route(ROUTE_EXECUTE, post(handle_execute))
        .route(ROUTE_LIST, post(handle_list))
        .route(ROUTE_CATALOG_RELOAD, post(handle_reload))
        .route(ROUTE_HEALTH, get(handle_health))
        .route(ROUTE_METRICS, get(handle_metrics))
        .layer(DefaultBodyLimit::max(transport_limit))
        .with_state(Arc::new(state))
}

// ============================================================================
// SECTION: Payloads
// ============================================================================

/// Body of an execute request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecuteRequest {
    /// Input bag passed to the tool.
    #[serde(default)]
    pub inputs: Map<String, Value>,
    /// Caller context.
    pub context: ExecutionContext,
}

/// Error body for transport-level rejections.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Human-readable reason.
    error: String,
}

/// Builds an error response.
fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { error: message.into() })).into_response()
}

/// Decodes a size-checked JSON body.
fn decode_body<T: DeserializeOwned>(state: &ServerState, bytes: &Bytes) -> Result<T, Response> {
    if bytes.len() > state.max_body_bytes {
        return Err(error_response(StatusCode::PAYLOAD_TOO_LARGE, "request body too large"));
    }
    serde_json::from_slice(bytes).map_err(|err| {
        error_response(StatusCode::BAD_REQUEST, format!("invalid request body: {err}"))
    })
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles `POST /v1/tools/{name}/execute`.
async fn handle_execute(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
    bytes: Bytes,
) -> Response {
    let request: ExecuteRequest = match decode_body(&state, &bytes) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let gateway = state.gateway.clone();
    let task =
        tokio::spawn(async move { gateway.execute(name, request.inputs, request.context).await });
    match task.await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("execution task failed: {err}"),
        ),
    }
}

/// Handles `POST /v1/tools/list`.
async fn handle_list(State(state): State<Arc<ServerState>>, bytes: Bytes) -> Response {
    let context: ExecutionContext = match decode_body(&state, &bytes) {
        Ok(context) => context,
        Err(response) => return response,
    };
    (StatusCode::OK, Json(state.gateway.list_available(&context))).into_response()
}

/// Handles `POST /v1/catalog/reload`.
async fn handle_reload(State(state): State<Arc<ServerState>>) -> Response {
    let gateway = state.gateway.clone();
    match tokio::task::spawn_blocking(move || gateway.reload_catalog()).await {
        Ok(Ok(reload)) => (StatusCode::OK, Json(reload)).into_response(),
        Ok(Err(err)) => error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        Err(err) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("reload task failed: {err}"))
        }
    }
}

/// Handles `GET /v1/health`.
async fn handle_health(State(state): State<Arc<ServerState>>) -> Response {
    (StatusCode::OK, Json(state.gateway.health())).into_response()
}

/// Handles `GET /metrics`.
async fn handle_metrics(State(state): State<Arc<ServerState>>) -> Response {
    (StatusCode::OK, Json(state.metrics.snapshot())).into_response()
}
