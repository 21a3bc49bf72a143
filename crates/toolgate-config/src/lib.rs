// crates/toolgate-config/src/lib.rs
// ============================================================================
// Module: Toolgate Config Library
// Description: Gateway configuration and catalog file loading.
// Purpose: Provide validated TOML config and YAML catalog sources.
// Dependencies: crate::{catalog, config}
// ============================================================================

//! ## Overview
//! [`GatewayConfig`] is the single source of truth for server, execution,
//! audit, and executor binding settings. [`FileCatalogSource`] plugs the YAML
//! catalog file into the gateway's reload path.

pub mod catalog;
pub mod config;

pub use catalog::CatalogFile;
pub use catalog::FileCatalogSource;
pub use catalog::ToolEntry;
pub use catalog::parse_catalog;
pub use config::AuditConfig;
pub use config::CONFIG_ENV_VAR;
pub use config::CatalogConfig;
pub use config::ConfigError;
pub use config::ExecutionConfig;
pub use config::ExecutorConfig;
pub use config::ExecutorKind;
pub use config::GatewayConfig;
pub use config::MAX_CONFIG_FILE_SIZE;
pub use config::ServerConfig;
