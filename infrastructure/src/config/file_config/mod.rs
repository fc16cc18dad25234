//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application settings
//! by the `to_*` methods, which also validate.

mod catalog;
mod debate;
mod logging;
mod providers;
mod server;
mod sessions;

pub use catalog::{FileCatalogConfig, FileCatalogModel};
pub use debate::FileDebateConfig;
pub use logging::FileLoggingConfig;
pub use providers::{
    FileAnthropicConfig, FileGeminiConfig, FileOpenAiConfig, FileProvidersConfig,
};
pub use server::FileServerConfig;
pub use sessions::FileSessionsConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("round counts cannot be 0")]
    InvalidRounds,

    #[error("default_max_rounds ({default}) exceeds max_rounds_limit ({limit})")]
    RoundsAboveLimit { default: u32, limit: u32 },

    #[error("{0}: model name cannot be empty")]
    EmptyModelName(String),

    #[error("debate.default_models must list exactly 2 models, got {0}")]
    InvalidModelCount(usize),

    #[error("{field}: invalid model '{value}': {reason}")]
    InvalidModel {
        field: String,
        value: String,
        reason: String,
    },

    #[error("debate.critique_target: unknown value '{0}' (expected 'latest' or 'previous_round')")]
    InvalidCritiqueTarget(String),

    #[error("unknown provider '{0}'")]
    UnknownProvider(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP server settings
    pub server: FileServerConfig,
    /// Debate defaults and pacing
    pub debate: FileDebateConfig,
    /// Session lifetimes
    pub sessions: FileSessionsConfig,
    /// Provider endpoints and credentials
    pub providers: FileProvidersConfig,
    /// Extra or replacement catalog models
    pub catalog: FileCatalogConfig,
    /// Transcript logging
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration.
    ///
    /// Stops at the first problem; every `to_*` conversion runs the same
    /// checks, so a config that validates always converts.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.debate.to_settings()?;
        self.sessions.to_policy()?;
        if self.server.keep_alive_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout(
                "server.keep_alive_seconds",
            ));
        }
        for model in &self.catalog.models {
            model.parse()?;
        }
        Ok(())
    }
}
