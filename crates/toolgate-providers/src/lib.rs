// crates/toolgate-providers/src/lib.rs
// ============================================================================
// Module: Toolgate Providers
// Description: Built-in execution capabilities and registry wiring.
// Purpose: Give development deployments working tools without bespoke code.
// Dependencies: toolgate-core, toolgate-config, tokio
// ============================================================================

//! ## Overview
//! This crate ships the built-in [`toolgate_core::ToolExecutor`]
//! implementations: an echo capability and a simulated capability that
//! sleeps for a fixed latency before returning a canned payload. Presets
//! cover the `web_search`, `asr`, and `tts` tool types.
//! [`build_registry`] turns `[[executors]]` config bindings into an
//! [`toolgate_core::ExecutorRegistry`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod echo;
pub mod registry;
pub mod simulated;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use echo::DEFAULT_ECHO_MESSAGE;
pub use echo::EchoExecutor;
pub use registry::build_registry;
pub use registry::executor_for;
pub use simulated::SimulatedExecutor;
