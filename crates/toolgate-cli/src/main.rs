// crates/toolgate-cli/src/main.rs
// ============================================================================
// Module: Toolgate CLI Entry Point
// Description: Command dispatcher for serving and exercising the gateway.
// Purpose: Provide operator commands for serve, tools, catalog, and config.
// Dependencies: clap, toolgate-core, toolgate-config, toolgate-server, tokio
// ============================================================================

//! ## Overview
//! `toolgate serve` runs the HTTP gateway. The remaining commands assemble
//! the same gateway in-process from config so operators can list tools, make
//! one-off calls, check readiness, and validate files without a server.


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;
use toolgate_config::FileCatalogSource;
use toolgate_config::GatewayConfig;
use toolgate_core::CatalogSource;
use toolgate_core::DEFAULT_MAX_EXECUTION_TIME_SECS;
use toolgate_core::ExecutionContext;
use toolgate_core::ExecutionStatus;
use toolgate_core::HealthStatus;
use toolgate_server::BuiltGateway;
use toolgate_server::GatewayServer;
use toolgate_server::build_gateway;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "toolgate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve(ConfigArgs),
    /// Inspect and call catalog tools in-process.
    Tools {
        /// Selected tools subcommand.
        #[command(subcommand)]
        command: ToolsCommand,
    },
    /// Catalog file utilities.
    Catalog {
        /// Selected catalog subcommand.
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Print gateway readiness for a config; exits non-zero when degraded.
    Health(ConfigArgs),
}

/// Config file selection shared by several commands.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Optional config file path (defaults to toolgate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Caller identity used for in-process calls.
#[derive(Args, Debug)]
struct CallerArgs {
    /// Caller permission tier.
    #[arg(long, default_value = "user")]
    tier: String,
    /// Tenant identifier.
    #[arg(long, default_value = "cli")]
    tenant: String,
    /// Session identifier.
    #[arg(long, default_value = "cli")]
    session: String,
}

/// Tools subcommands.
#[derive(Subcommand, Debug)]
enum ToolsCommand {
    /// List tools visible to the caller tier.
    List(ToolsListCommand),
    /// Execute one tool and print the result.
    Call(ToolsCallCommand),
}

/// Arguments for `tools list`.
#[derive(Args, Debug)]
struct ToolsListCommand {
    /// Config selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Caller identity.
    #[command(flatten)]
    caller: CallerArgs,
}

/// Arguments for `tools call`.
#[derive(Args, Debug)]
struct ToolsCallCommand {
    /// Tool name.
    name: String,
    /// Inputs as a JSON object.
    #[arg(long, value_name = "JSON", default_value = "{}")]
    input: String,
    /// Execution budget in seconds.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_MAX_EXECUTION_TIME_SECS)]
    timeout_secs: u64,
    /// Config selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Caller identity.
    #[command(flatten)]
    caller: CallerArgs,
}

/// Catalog subcommands.
#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Parse and validate a catalog file.
    Validate {
        /// Catalog YAML path.
        path: PathBuf,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Parse and validate a config file.
    Validate(ConfigArgs),
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run(cli: Cli) -> CliResult<ExitCode> {
    if cli.show_version {
        write_line(&format!("toolgate {}", env!("CARGO_PKG_VERSION")))?;
        return Ok(ExitCode::SUCCESS);
    }
    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };
    match command {
        Commands::Serve(args) => command_serve(&args).await,
        Commands::Tools { command: ToolsCommand::List(command) } => command_tools_list(&command),
        Commands::Tools { command: ToolsCommand::Call(command) } => {
            command_tools_call(command).await
        }
        Commands::Catalog { command: CatalogCommand::Validate { path } } => {
            command_catalog_validate(&path)
        }
        Commands::Config { command: ConfigCommand::Validate(args) } => {
            command_config_validate(&args)
        }
        Commands::Health(args) => command_health(&args),
    }
}

/// Prints CLI help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_line("")
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `serve`.
async fn command_serve(args: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(args)?;
    let bind = config.server.bind.clone();
    let server = tokio::task::spawn_blocking(move || GatewayServer::from_config(config))
        .await
        .map_err(|err| CliError::new(format!("server init failed: init join failed: {err}")))?
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    write_stderr_line(&format!("toolgate: listening on {bind}"))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `tools list`.
fn command_tools_list(command: &ToolsListCommand) -> CliResult<ExitCode> {
    let built = load_gateway(&command.config)?;
    let context = caller_context(&command.caller, DEFAULT_MAX_EXECUTION_TIME_SECS);
    write_json(&built.gateway.list_available(&context))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `tools call`.
async fn command_tools_call(command: ToolsCallCommand) -> CliResult<ExitCode> {
    let inputs = parse_inputs(&command.input)?;
    let built = load_gateway(&command.config)?;
    let context = caller_context(&command.caller, command.timeout_secs);
    let result = built.gateway.execute(command.name, inputs, context).await;
    write_json(&result)?;
    if result.status == ExecutionStatus::Success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Executes `catalog validate`.
fn command_catalog_validate(path: &Path) -> CliResult<ExitCode> {
    let specs = FileCatalogSource::new(path)
        .load()
        .map_err(|err| CliError::new(format!("catalog {}: {err}", path.display())))?;
    write_line(&format!("catalog ok: {} tools", specs.len()))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `config validate`.
fn command_config_validate(args: &ConfigArgs) -> CliResult<ExitCode> {
    let _config = load_config(args)?;
    write_line("config ok")?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `health`.
fn command_health(args: &ConfigArgs) -> CliResult<ExitCode> {
    let built = load_gateway(args)?;
    let health = built.gateway.health();
    write_json(&health)?;
    if health.status == HealthStatus::Healthy {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads and validates configuration.
fn load_config(args: &ConfigArgs) -> CliResult<GatewayConfig> {
    GatewayConfig::load(args.config.as_deref())
        .map_err(|err| CliError::new(format!("config load failed: {err}")))
}

/// Assembles an in-process gateway from configuration.
fn load_gateway(args: &ConfigArgs) -> CliResult<BuiltGateway> {
    let config = load_config(args)?;
    build_gateway(&config).map_err(|err| CliError::new(format!("gateway init failed: {err}")))
}

/// Builds the execution context for an in-process call.
fn caller_context(caller: &CallerArgs, budget_secs: u64) -> ExecutionContext {
    ExecutionContext::new(caller.tenant.as_str(), caller.session.as_str())
        .with_tier(caller.tier.as_str())
        .with_max_execution_time(budget_secs)
}

/// Parses `--input` as a JSON object.
fn parse_inputs(raw: &str) -> CliResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CliError::new("--input must be a JSON object")),
        Err(err) => Err(CliError::new(format!("--input is not valid JSON: {err}"))),
    }
}

/// Writes a value as pretty JSON to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(format!("json output failed: {err}")))?;
    write_line(&text)
}

/// Writes a line to stdout, mapping failures to [`CliError`].
fn write_line(message: &str) -> CliResult<()> {
    write_stdout_line(message).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
