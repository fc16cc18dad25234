//! LLM provider adapters
//!
//! Each [`ProviderAdapter`] speaks to one provider: OpenAI and Gemini
//! through the OpenAI-compatible chat completions API, Anthropic through its
//! Messages API. [`RoutingClient`] picks
//! the adapter for an agent's provider and implements the application's
//! [`AgentClient`](battle_application::AgentClient) port.

pub mod anthropic;
pub mod openai_compat;
pub mod routing;
pub mod sse;

pub use anthropic::AnthropicAdapter;
pub use openai_compat::OpenAiCompatAdapter;
pub use routing::RoutingClient;

use async_trait::async_trait;
use battle_application::{AdapterError, StreamHandle};
use battle_domain::Provider;

/// Resolved connection settings for one provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub provider: Provider,
    /// Base URL including the API version, without a trailing endpoint
    pub base_url: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl ProviderSettings {
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> Provider;
    /// Whether requests can be sent at all (an API key is present)
    fn is_configured(&self) -> bool;
    async fn stream(&self, model_id: &str, prompt: &str) -> Result<StreamHandle, AdapterError>;
}
