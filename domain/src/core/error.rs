//! Domain error types

use crate::agent::provider::Provider;
use thiserror::Error;

/// Domain-level errors
///
/// Every variant describes a malformed debate request. They are raised
/// synchronously while a session is being created and never reach a running
/// debate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("A debate needs exactly {expected} agents, got {actual}")]
    InvalidAgentCount { expected: usize, actual: usize },

    #[error("max_rounds must be between 1 and {limit}, got {actual}")]
    InvalidMaxRounds { actual: u32, limit: u32 },

    #[error("Model id cannot be empty (provider {0})")]
    EmptyModelId(Provider),

    #[error("Model {model_id} is not available for provider {provider}")]
    UnknownModel { provider: Provider, model_id: String },

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Session id already in use: {0}")]
    DuplicateSessionId(String),

    #[error("Invalid agent spec: {0}")]
    InvalidAgentSpec(String),
}

impl DomainError {
    /// Check if this error was caused by the model catalog rather than the request shape
    pub fn is_catalog_error(&self) -> bool {
        matches!(
            self,
            DomainError::UnknownModel { .. } | DomainError::UnknownProvider(_)
        )
    }
}
