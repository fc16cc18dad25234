//! Model catalog configuration from TOML (`[catalog]` section)

use super::ConfigValidationError;
use battle_domain::{ModelInfo, Provider};
use serde::{Deserialize, Serialize};

/// Raw catalog configuration from TOML
///
/// ```toml
/// [catalog]
/// include_builtin = true
/// require_credentials = true
///
/// [[catalog.models]]
/// provider = "openai"
/// id = "gpt-5"
/// name = "GPT-5"
/// description = "Newest flagship"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCatalogConfig {
    /// Start from the built-in model list
    pub include_builtin: bool,
    /// Only list providers with an API key
    pub require_credentials: bool,
    /// Extra models; an entry with a built-in id replaces it
    pub models: Vec<FileCatalogModel>,
}

impl Default for FileCatalogConfig {
    fn default() -> Self {
        Self {
            include_builtin: true,
            require_credentials: true,
            models: Vec::new(),
        }
    }
}

/// One extra catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCatalogModel {
    pub provider: String,
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl FileCatalogModel {
    pub fn parse(&self) -> Result<(Provider, ModelInfo), ConfigValidationError> {
        let provider: Provider = self
            .provider
            .parse()
            .map_err(|_| ConfigValidationError::UnknownProvider(self.provider.clone()))?;
        let id = self.id.trim();
        if id.is_empty() {
            return Err(ConfigValidationError::EmptyModelName(
                "catalog.models.id".to_string(),
            ));
        }
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(id);
        Ok((provider, ModelInfo::new(id, name, self.description.clone())))
    }
}
