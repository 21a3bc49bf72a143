// crates/toolgate-config/src/config.rs
// ============================================================================
// Module: Toolgate Configuration
// Description: Configuration loading and validation for the gateway.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: toolgate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed; every validation error
//! names the offending field.
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use toolgate_core::UnknownTierPolicy;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "toolgate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "TOOLGATE_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default HTTP bind address.
const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Default maximum request body size in bytes.
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Upper bound for `server.max_body_bytes`.
const MAX_BODY_BYTES_LIMIT: usize = 16 * 1024 * 1024;
/// Default catalog path.
const DEFAULT_CATALOG_PATH: &str = "tools.yaml";
/// Upper bound for `execution.max_execution_time_cap_secs`.
const MAX_EXECUTION_CAP_SECS: u64 = 3_600;
/// Upper bound for simulated executor delays.
const MAX_SIMULATED_DELAY_MS: u64 = 600_000;
/// Maximum number of executor bindings.
const MAX_EXECUTORS: usize = 256;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Gateway Config
// ============================================================================

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Catalog file settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Execution policy settings.
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// Audit logging settings.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Executor bindings keyed by declared tool type.
    #[serde(default)]
    pub executors: Vec<ExecutorConfig>,
    /// Path the config was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl GatewayConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit path, then `TOOLGATE_CONFIG`, then
    /// `toolgate.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path, env::var(CONFIG_ENV_VAR).ok())?;
        validate_path(&resolved)?;
        let content = read_limited(&resolved)
            .map_err(|err| err.with_subject("config file"))?;
        let mut config = Self::parse(&content)?;
        config.source_path = Some(resolved);
        Ok(config)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.catalog.validate()?;
        self.execution.validate()?;
        self.audit.validate()?;
        if self.executors.len() > MAX_EXECUTORS {
            return Err(ConfigError::Invalid("too many executors".to_string()));
        }
        let mut seen = BTreeSet::new();
        for (index, executor) in self.executors.iter().enumerate() {
            executor.validate(index)?;
            if !seen.insert(executor.tool_type.trim()) {
                return Err(ConfigError::Invalid(format!(
                    "executors[{index}].type duplicates '{}'",
                    executor.tool_type
                )));
            }
        }
        Ok(())
    }

    /// Returns the catalog path, resolved against the config file directory
    /// when relative.
    #[must_use]
    pub fn resolved_catalog_path(&self) -> PathBuf {
        let path = &self.catalog.path;
        if path.is_absolute() {
            return path.clone();
        }
        self.source_path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| path.clone(), |dir| dir.join(path))
    }
}

// ============================================================================
// SECTION: Sections
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), max_body_bytes: default_max_body_bytes() }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind.trim().parse().map_err(|_| {
            ConfigError::Invalid("server.bind is not a valid socket address".to_string())
        })
    }

    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_body_bytes > MAX_BODY_BYTES_LIMIT {
            return Err(ConfigError::Invalid("server.max_body_bytes too large".to_string()));
        }
        self.bind_addr()?;
        Ok(())
    }
}

/// Catalog file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Path to the YAML catalog.
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { path: default_catalog_path() }
    }
}

impl CatalogConfig {
    /// Validates catalog configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("catalog.path", &self.path.to_string_lossy())
    }
}

/// Execution policy configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Optional upper bound on caller budgets in seconds.
    #[serde(default)]
    pub max_execution_time_cap_secs: Option<u64>,
    /// Ranking policy for unrecognized tier labels.
    #[serde(default)]
    pub unknown_tier_policy: UnknownTierPolicy,
}

impl ExecutionConfig {
    /// Returns the configured cap as a duration.
    #[must_use]
    pub fn max_execution_time_cap(&self) -> Option<Duration> {
        self.max_execution_time_cap_secs.map(Duration::from_secs)
    }

    /// Validates execution configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.max_execution_time_cap_secs {
            Some(0) => Err(ConfigError::Invalid(
                "execution.max_execution_time_cap_secs must be greater than zero".to_string(),
            )),
            Some(cap) if cap > MAX_EXECUTION_CAP_SECS => Err(ConfigError::Invalid(
                "execution.max_execution_time_cap_secs too large".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Audit logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Enables audit logging.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional JSON-lines file; stderr when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { enabled: default_audit_enabled(), path: None }
    }
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Built-in executor implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    /// Echoes `inputs.message`.
    Echo,
    /// Sleeps then returns a canned response.
    Simulated,
}

/// Binding of a declared tool type to a built-in executor.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutorConfig {
    /// Declared tool type served by this executor.
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Executor implementation.
    pub kind: ExecutorKind,
    /// Simulated latency in milliseconds; presets supply one when absent.
    #[serde(default)]
    pub delay_ms: Option<u64>,
    /// Canned response for simulated executors.
    #[serde(default)]
    pub response: Option<Value>,
}

impl ExecutorConfig {
    /// Returns the configured simulated delay, if any.
    #[must_use]
    pub fn delay(&self) -> Option<Duration> {
        self.delay_ms.map(Duration::from_millis)
    }

    /// Validates one executor binding.
    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.tool_type.trim().is_empty() {
            return Err(ConfigError::Invalid(format!("executors[{index}].type must be non-empty")));
        }
        if self.delay_ms.is_some_and(|delay| delay > MAX_SIMULATED_DELAY_MS) {
            return Err(ConfigError::Invalid(format!("executors[{index}].delay_ms too large")));
        }
        if self.kind == ExecutorKind::Echo && (self.delay_ms.is_some() || self.response.is_some()) {
            return Err(ConfigError::Invalid(format!(
                "executors[{index}] echo executors take no delay_ms or response"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Default max body size.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Default catalog path.
fn default_catalog_path() -> PathBuf {
    PathBuf::from(DEFAULT_CATALOG_PATH)
}

/// Audit logging is on unless disabled.
const fn default_audit_enabled() -> bool {
    true
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
pub(crate) fn resolve_path(
    path: Option<&Path>,
    env_path: Option<String>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Some(env_path) = env_path {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates a resolved path against security limits.
pub(crate) fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} component too long")));
        }
    }
    Ok(())
}

/// File read failure before parsing.
#[derive(Debug)]
pub(crate) enum ReadError {
    /// Underlying I/O error.
    Io(std::io::Error),
    /// File exceeds [`MAX_CONFIG_FILE_SIZE`].
    TooLarge,
    /// File is not UTF-8.
    NotUtf8,
}

impl ReadError {
    /// Maps to a config error naming the file kind.
    fn with_subject(self, subject: &str) -> ConfigError {
        match self {
            Self::Io(err) => ConfigError::Io(err.to_string()),
            Self::TooLarge => ConfigError::Invalid(format!("{subject} exceeds size limit")),
            Self::NotUtf8 => ConfigError::Invalid(format!("{subject} must be utf-8")),
        }
    }

    /// Renders the failure as a message naming the file kind.
    pub(crate) fn describe(&self, subject: &str) -> String {
        match self {
            Self::Io(err) => err.to_string(),
            Self::TooLarge => format!("{subject} exceeds size limit"),
            Self::NotUtf8 => format!("{subject} must be utf-8"),
        }
    }
}

/// Reads a UTF-8 file no larger than [`MAX_CONFIG_FILE_SIZE`].
pub(crate) fn read_limited(path: &Path) -> Result<String, ReadError> {
    let bytes = fs::read(path).map_err(ReadError::Io)?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ReadError::TooLarge);
    }
    String::from_utf8(bytes).map_err(|_| ReadError::NotUtf8)
}
