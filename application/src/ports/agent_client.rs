//! Agent Client port
//!
//! Defines the interface for streaming a completion out of an LLM provider.

use async_trait::async_trait;
use battle_domain::{AgentSpec, GenerationEvent, Provider};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur while an agent is generating
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Provider returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Malformed stream: {0}")]
    MalformedStream(String),

    #[error("Stream closed before the response completed")]
    StreamClosed,

    #[error("No API key configured for {0}")]
    MissingCredentials(Provider),

    #[error("Provider not available: {0}")]
    ProviderNotAvailable(Provider),

    #[error("Timeout")]
    Timeout,
}

/// Client for one or more LLM providers
///
/// This port defines how the debate engine talks to models. Implementations
/// (adapters) live in the infrastructure layer; the engine never retries a
/// failed call.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Start a generation and return its fragment stream
    async fn stream(&self, agent: &AgentSpec, prompt: &str) -> Result<StreamHandle, AdapterError>;
}

/// Handle for receiving streaming events from one generation.
///
/// Wraps an `mpsc::Receiver<GenerationEvent>`. Dropping the handle tells the
/// producing task nobody is listening any more.
pub struct StreamHandle {
    receiver: mpsc::Receiver<GenerationEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<GenerationEvent>) -> Self {
        Self { receiver }
    }

    /// A handle that yields one complete response
    pub fn from_text(text: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel(1);
        // capacity 1 and a fresh channel: try_send cannot fail
        let _ = tx.try_send(GenerationEvent::Completed(text.into()));
        Self::new(rx)
    }

    /// Next event, `None` once the producer is gone
    pub async fn next(&mut self) -> Option<GenerationEvent> {
        self.receiver.recv().await
    }
}
