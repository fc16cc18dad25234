use super::{AnthropicAdapter, OpenAiCompatAdapter, ProviderAdapter, ProviderSettings};
use async_trait::async_trait;
use battle_application::{AdapterError, AgentClient, StreamHandle};
use battle_domain::{AgentSpec, Provider};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Routes each agent to the adapter for its provider
pub struct RoutingClient {
    providers: HashMap<Provider, Arc<dyn ProviderAdapter>>,
}

impl RoutingClient {
    pub fn new(providers: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        let providers = providers
            .into_iter()
            .map(|adapter| (adapter.provider(), adapter))
            .collect();
        Self { providers }
    }

    /// One adapter per provider, speaking that provider's API
    pub fn from_settings(settings: Vec<ProviderSettings>) -> Self {
        Self::new(settings.into_iter().map(adapter_for).collect())
    }

    /// Providers that can actually be called, in stable order
    pub fn available_providers(&self) -> Vec<Provider> {
        Provider::ALL
            .iter()
            .copied()
            .filter(|p| self.providers.get(p).is_some_and(|a| a.is_configured()))
            .collect()
    }

    fn resolve_provider(&self, provider: Provider) -> Result<&dyn ProviderAdapter, AdapterError> {
        let adapter = self
            .providers
            .get(&provider)
            .ok_or(AdapterError::ProviderNotAvailable(provider))?;
        if !adapter.is_configured() {
            return Err(AdapterError::MissingCredentials(provider));
        }
        Ok(adapter.as_ref())
    }
}

fn adapter_for(settings: ProviderSettings) -> Arc<dyn ProviderAdapter> {
    match settings.provider {
        Provider::OpenAi | Provider::Gemini => Arc::new(OpenAiCompatAdapter::new(settings)),
        Provider::Anthropic => Arc::new(AnthropicAdapter::new(settings)),
    }
}

#[async_trait]
impl AgentClient for RoutingClient {
    async fn stream(&self, agent: &AgentSpec, prompt: &str) -> Result<StreamHandle, AdapterError> {
        let adapter = self.resolve_provider(agent.provider)?;
        debug!("Routing {} to {} adapter", agent, adapter.provider());
        adapter.stream(&agent.model_id, prompt).await
    }
}
