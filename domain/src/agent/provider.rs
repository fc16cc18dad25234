//! Provider and agent identity value objects

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// LLM provider backing one debater (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    Gemini,
    Anthropic,
}

impl Provider {
    /// Every supported provider, in catalog order
    pub const ALL: [Provider; 3] = [Provider::OpenAi, Provider::Gemini, Provider::Anthropic];

    /// Get the wire identifier for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
            Provider::Anthropic => "anthropic",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "gemini" | "google" => Ok(Provider::Gemini),
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

/// One configured debater: a provider plus a model served by it (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentSpec {
    pub provider: Provider,
    pub model_id: String,
}

impl AgentSpec {
    pub fn new(provider: Provider, model_id: impl Into<String>) -> Self {
        Self {
            provider,
            model_id: model_id.into(),
        }
    }

    /// The default OpenAI debater
    pub fn default_openai() -> Self {
        Self::new(Provider::OpenAi, "gpt-4.1")
    }

    /// The default Gemini debater
    pub fn default_gemini() -> Self {
        Self::new(Provider::Gemini, "gemini-2.5-flash")
    }

    /// The pair used when a request does not name its models
    pub fn default_pair() -> Vec<AgentSpec> {
        vec![Self::default_openai(), Self::default_gemini()]
    }

    /// Stable key for maps and logs: `provider/model_id`
    pub fn key(&self) -> String {
        format!("{}/{}", self.provider, self.model_id)
    }
}

impl std::fmt::Display for AgentSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider, self.model_id)
    }
}

impl std::str::FromStr for AgentSpec {
    type Err = DomainError;

    /// Parse `provider/model_id`, as accepted on the command line
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, model_id) = s
            .split_once('/')
            .ok_or_else(|| DomainError::InvalidAgentSpec(format!("expected provider/model, got '{}'", s)))?;
        let provider: Provider = provider.parse()?;
        let model_id = model_id.trim();
        if model_id.is_empty() {
            return Err(DomainError::EmptyModelId(provider));
        }
        Ok(Self::new(provider, model_id))
    }
}
