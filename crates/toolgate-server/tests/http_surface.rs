// crates/toolgate-server/tests/http_surface.rs
// ============================================================================
// Module: HTTP Surface Tests
// Description: Loopback tests for every gateway route.
// Purpose: Ensure HTTP status mapping and body handling match the contract.
// Dependencies: toolgate-server, toolgate-config, reqwest, tempfile, tokio
// ============================================================================

//! ## Overview
//! Each test writes a catalog and config to a temp dir, serves the gateway
//! on an ephemeral loopback port, and drives it with `reqwest`.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use reqwest::StatusCode;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;
use toolgate_config::GatewayConfig;
use toolgate_server::GatewayServer;

const CATALOG: &str = r"
tools:
  echo:
    type: echo
    required_permission: guest
    description: Echo a message back
  search:
    type: web_search
    required_params: [query]
  admin_tool:
    type: echo
    required_permission: admin
";

struct TestServer {
    base: String,
    catalog_path: PathBuf,
    client: reqwest::Client,
    _dir: TempDir,
}

impl TestServer {
    async fn start(extra_config: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("tools.yaml");
        fs::write(&catalog_path, CATALOG).unwrap();
        let config = write_config(dir.path(), extra_config);
        let server = GatewayServer::from_config(config).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = server.serve_listener(listener).await;
        });
        Self {
            base: format!("http://{addr}"),
            catalog_path,
            client: reqwest::Client::new(),
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn post_json(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let response = self.client.post(self.url(path)).json(body).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn get_json(&self, path: &str) -> Value {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        response.json().await.unwrap()
    }
}

fn write_config(dir: &Path, extra: &str) -> GatewayConfig {
    let path = dir.join("toolgate.toml");
    let content = format!(
        "[catalog]\npath = \"tools.yaml\"\n\n[audit]\nenabled = false\n\n[[executors]]\ntype = \
         \"echo\"\nkind = \"echo\"\n{extra}"
    );
    fs::write(&path, content).unwrap();
    GatewayConfig::load(Some(&path)).unwrap()
}

fn context(tier: &str) -> Value {
    json!({"tenant_id": "tenant-a", "session_id": "session-1", "permission_tier": tier})
}

#[tokio::test]
async fn execute_success_returns_result_body() {
    let server = TestServer::start("").await;
    let (status, body) = server
        .post_json(
            "/v1/tools/echo/execute",
            &json!({"inputs": {"message": "hi"}, "context": context("guest")}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("success"));
    assert_eq!(body["data"], json!({"echo": "hi"}));
    assert_eq!(body["error"], Value::Null);
    assert_eq!(body["metadata"]["tool_name"], json!("echo"));
    assert_eq!(body["token_usage"], json!({}));
}

#[tokio::test]
async fn classified_failures_are_still_http_ok() {
    let server = TestServer::start("").await;
    let (status, body) = server
        .post_json("/v1/tools/admin_tool/execute", &json!({"context": context("user")}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("permission_denied"));

    let (status, body) =
        server.post_json("/v1/tools/missing/execute", &json!({"context": context("admin")})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("validation_error"));
    assert_eq!(body["error"], json!("Tool 'missing' not found in catalog"));

    let (_, body) = server
        .post_json(
            "/v1/tools/search/execute",
            &json!({"inputs": {"query": "q"}, "context": context("user")}),
        )
        .await;
    assert_eq!(body["status"], json!("failure"));
    assert_eq!(body["error"], json!("Tool type 'web_search' not implemented"));
}

#[tokio::test]
async fn malformed_bodies_are_bad_request() {
    let server = TestServer::start("").await;
    let response = server
        .client
        .post(server.url("/v1/tools/echo/execute"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) =
        server.post_json("/v1/tools/echo/execute", &json!({"inputs": {}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("context"));

    let (status, _) = server.post_json("/v1/tools/list", &json!({"tenant_id": "t"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = TestServer::start("\n[server]\nmax_body_bytes = 256\n").await;
    let padding = "x".repeat(512);
    let response = server
        .client
        .post(server.url("/v1/tools/echo/execute"))
        .json(&json!({"inputs": {"message": padding}, "context": context("guest")}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn list_filters_by_caller_tier() {
    let server = TestServer::start("").await;
    let (status, body) = server.post_json("/v1/tools/list", &context("guest")).await;
    assert_eq!(status, StatusCode::OK);
    let tools = body.as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], json!("echo"));
    assert_eq!(tools[0]["description"], json!("Echo a message back"));
    assert_eq!(tools[0]["type"], json!("echo"));

    let (_, body) = server.post_json("/v1/tools/list", &context("admin")).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn reload_swaps_catalog_and_reports_failures() {
    let server = TestServer::start("").await;
    fs::write(&server.catalog_path, "tools:\n  only: {type: echo, required_permission: guest}\n")
        .unwrap();
    let (status, body) = server.post_json("/v1/catalog/reload", &Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"generation": 2, "tools_loaded": 1}));

    fs::write(&server.catalog_path, "tools: [broken").unwrap();
    let (status, body) = server.post_json("/v1/catalog/reload", &Value::Null).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().starts_with("catalog parse error"));

    let health = server.get_json("/v1/health").await;
    assert_eq!(health["tools_loaded"], json!(1));
    assert_eq!(health["catalog_generation"], json!(2));
}

#[tokio::test]
async fn health_reports_unbound_types() {
    let server = TestServer::start("").await;
    let health = server.get_json("/v1/health").await;
    assert_eq!(health["status"], json!("degraded"));
    assert_eq!(health["unbound_tool_types"], json!(["web_search"]));
    assert_eq!(health["tools_loaded"], json!(3));
    assert_eq!(health["in_flight"], json!(0));

    let bound = TestServer::start(
        "\n[[executors]]\ntype = \"web_search\"\nkind = \"simulated\"\ndelay_ms = 0\n",
    )
    .await;
    let health = bound.get_json("/v1/health").await;
    assert_eq!(health["status"], json!("healthy"));
}

#[tokio::test]
async fn metrics_reflect_executions() {
    let server = TestServer::start("").await;
    for _ in 0..2 {
        server
            .post_json("/v1/tools/echo/execute", &json!({"context": context("guest")}))
            .await;
    }
    let metrics = server.get_json("/metrics").await;
    let counters = metrics["toolgate_tool_executions_total"].as_array().unwrap();
    assert_eq!(counters.len(), 1);
    assert_eq!(counters[0]["tool_name"], json!("echo"));
    assert_eq!(counters[0]["status"], json!("success"));
    assert_eq!(counters[0]["value"], json!(2));
    let latency = metrics["toolgate_tool_execution_duration_seconds"].as_array().unwrap();
    assert_eq!(latency[0]["count"], json!(2));
}
