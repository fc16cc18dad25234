//! Configuration file loading for agent-battle
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `AGENT_BATTLE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./battle.toml` or `./.battle.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/agent-battle/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAnthropicConfig, FileCatalogConfig, FileCatalogModel, FileConfig,
    FileDebateConfig, FileGeminiConfig, FileLoggingConfig, FileOpenAiConfig, FileProvidersConfig, FileServerConfig,
    FileSessionsConfig,
};
pub use loader::ConfigLoader;
