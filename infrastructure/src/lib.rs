//! Infrastructure layer for agent-battle
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: provider HTTP clients, the JSONL transcript
//! logger, and configuration file loading.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use catalog::build_catalog;
pub use config::{
    ConfigLoader, ConfigValidationError, FileCatalogConfig, FileConfig, FileDebateConfig,
    FileLoggingConfig, FileProvidersConfig, FileServerConfig, FileSessionsConfig,
};
pub use logging::JsonlTranscriptLogger;
pub use providers::{
    AnthropicAdapter, OpenAiCompatAdapter, ProviderAdapter, ProviderSettings, RoutingClient,
};
