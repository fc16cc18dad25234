//! Presentation layer for agent-battle
//!
//! This crate contains the HTTP API with its SSE event framing, the CLI
//! definitions, and the console renderer used by `agent-battle debate`.

pub mod api;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use api::{AppState, router, serve};
pub use cli::commands::{Cli, Command, parse_agents};
pub use output::console::{ConsoleRenderer, format_catalog};
