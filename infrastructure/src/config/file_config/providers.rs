//! Provider configuration from TOML (`[providers]` section)

use crate::providers::ProviderSettings;
use battle_domain::Provider;
use serde::{Deserialize, Serialize};

/// Read an API key: an explicit value wins, otherwise the named env var.
fn resolve_api_key(api_key: Option<&str>, api_key_env: &str) -> Option<String> {
    if let Some(key) = api_key
        && !key.trim().is_empty()
    {
        return Some(key.trim().to_string());
    }
    std::env::var(api_key_env)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended; prefer the env var).
    pub api_key: Option<String>,
    /// Base URL including the API version (can be overridden for proxies).
    pub base_url: String,
    /// Max tokens per response; unset leaves the provider default.
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: None,
            temperature: None,
        }
    }
}

impl FileOpenAiConfig {
    pub fn to_settings(&self) -> ProviderSettings {
        ProviderSettings {
            provider: Provider::OpenAi,
            base_url: self.base_url.clone(),
            api_key: resolve_api_key(self.api_key.as_deref(), &self.api_key_env),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Google Gemini provider configuration (OpenAI-compatible endpoint).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// Environment variable name for the API key (default: "GOOGLE_API_KEY").
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GOOGLE_API_KEY".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            max_tokens: None,
            temperature: None,
        }
    }
}

impl FileGeminiConfig {
    pub fn to_settings(&self) -> ProviderSettings {
        ProviderSettings {
            provider: Provider::Gemini,
            base_url: self.base_url.clone(),
            api_key: resolve_api_key(self.api_key.as_deref(), &self.api_key_env),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Anthropic Messages API configuration.
///
/// `max_tokens` is always sent; unset means 8192.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.anthropic.com/v1".to_string(),
            max_tokens: None,
            temperature: None,
        }
    }
}

impl FileAnthropicConfig {
    pub fn to_settings(&self) -> ProviderSettings {
        ProviderSettings {
            provider: Provider::Anthropic,
            base_url: self.base_url.clone(),
            api_key: resolve_api_key(self.api_key.as_deref(), &self.api_key_env),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// OpenAI API settings.
    pub openai: FileOpenAiConfig,
    /// Gemini API settings.
    pub gemini: FileGeminiConfig,
    /// Anthropic API settings.
    pub anthropic: FileAnthropicConfig,
}

impl FileProvidersConfig {
    /// Settings for every supported provider, configured or not
    pub fn to_settings(&self) -> Vec<ProviderSettings> {
        vec![
            self.openai.to_settings(),
            self.gemini.to_settings(),
            self.anthropic.to_settings(),
        ]
    }
}
