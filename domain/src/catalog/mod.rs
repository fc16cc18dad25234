//! Model catalog
//!
//! Lists, per provider, the models a debate may be configured with. Session
//! creation rejects any agent whose model is not listed here.

use crate::agent::provider::{AgentSpec, Provider};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One selectable model (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
}

impl ModelInfo {
    pub fn new(
        model_id: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            display_name: display_name.into(),
            description: description.into(),
        }
    }
}

/// Models available per provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelCatalog {
    entries: BTreeMap<Provider, Vec<ModelInfo>>,
}

impl ModelCatalog {
    /// Empty catalog, every lookup fails
    pub fn empty() -> Self {
        Self::default()
    }

    /// The models shipped with agent-battle
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for info in [
            ModelInfo::new("gpt-4.1", "GPT-4.1", "Flagship GPT model for complex tasks"),
            ModelInfo::new("gpt-4.1-mini", "GPT-4.1 Mini", "Balanced for intelligence, speed, and cost"),
            ModelInfo::new("gpt-4o", "GPT-4o", "Fast, intelligent, flexible GPT model"),
            ModelInfo::new("gpt-4o-mini", "GPT-4o Mini", "Fast, affordable small model"),
            ModelInfo::new("o3-mini", "o3-mini", "Small reasoning model"),
        ] {
            catalog.insert(Provider::OpenAi, info);
        }
        for info in [
            ModelInfo::new("gemini-2.5-flash", "Gemini 2.5 Flash", "Best price-performance model"),
            ModelInfo::new("gemini-2.5-pro", "Gemini 2.5 Pro", "Most capable thinking model"),
            ModelInfo::new("gemini-2.0-flash", "Gemini 2.0 Flash", "Fast multimodal model"),
        ] {
            catalog.insert(Provider::Gemini, info);
        }
        for info in [
            ModelInfo::new("claude-sonnet-4-5", "Claude Sonnet 4.5", "Balanced model for coding and reasoning"),
            ModelInfo::new("claude-opus-4-1", "Claude Opus 4.1", "Most capable model for complex tasks"),
            ModelInfo::new("claude-3-5-haiku-latest", "Claude 3.5 Haiku", "Fastest, most compact model"),
        ] {
            catalog.insert(Provider::Anthropic, info);
        }
        catalog
    }

    /// Add a model, replacing an existing entry with the same id
    pub fn insert(&mut self, provider: Provider, info: ModelInfo) {
        let models = self.entries.entry(provider).or_default();
        match models.iter_mut().find(|m| m.model_id == info.model_id) {
            Some(existing) => *existing = info,
            None => models.push(info),
        }
    }

    /// Keep only the given providers (e.g. the ones with credentials)
    pub fn retain_providers(&mut self, providers: &[Provider]) {
        self.entries.retain(|p, _| providers.contains(p));
    }

    /// Providers with at least one model, in catalog order
    pub fn providers(&self) -> Vec<Provider> {
        self.entries
            .iter()
            .filter(|(_, models)| !models.is_empty())
            .map(|(p, _)| *p)
            .collect()
    }

    /// Models listed for one provider
    pub fn models(&self, provider: Provider) -> &[ModelInfo] {
        self.entries
            .get(&provider)
            .map(|m| m.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate over every `(provider, models)` pair
    pub fn iter(&self) -> impl Iterator<Item = (Provider, &[ModelInfo])> {
        self.entries.iter().map(|(p, m)| (*p, m.as_slice()))
    }

    pub fn get(&self, agent: &AgentSpec) -> Option<&ModelInfo> {
        self.models(agent.provider)
            .iter()
            .find(|m| m.model_id == agent.model_id)
    }

    pub fn contains(&self, agent: &AgentSpec) -> bool {
        self.get(agent).is_some()
    }

    /// Human-readable name, falls back to the raw model id
    pub fn display_name(&self, agent: &AgentSpec) -> String {
        self.get(agent)
            .map(|m| m.display_name.clone())
            .unwrap_or_else(|| agent.model_id.clone())
    }

    /// Reject agents whose model is not in the catalog
    pub fn validate(&self, agent: &AgentSpec) -> Result<(), DomainError> {
        if agent.model_id.trim().is_empty() {
            return Err(DomainError::EmptyModelId(agent.provider));
        }
        if !self.contains(agent) {
            return Err(DomainError::UnknownModel {
                provider: agent.provider,
                model_id: agent.model_id.clone(),
            });
        }
        Ok(())
    }
}
