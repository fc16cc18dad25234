//! OpenAI-compatible chat completions adapter.
//!
//! Used for OpenAI itself and for Gemini's OpenAI-compatible endpoint. The
//! request is a single user message with `"stream": true`; the response body
//! is decoded on a background task and forwarded as [`GenerationEvent`]s.
//!
//! [`GenerationEvent`]: battle_domain::GenerationEvent

use super::sse::{classify_openai_event, forward_stream};
use super::{ProviderAdapter, ProviderSettings};
use async_trait::async_trait;
use battle_application::{AdapterError, StreamHandle};
use battle_domain::{Provider, preview};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Buffered fragments between the HTTP reader and the debate engine
const STREAM_CHANNEL_CAPACITY: usize = 64;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct OpenAiCompatAdapter {
    settings: ProviderSettings,
    http: reqwest::Client,
}

impl OpenAiCompatAdapter {
    pub fn new(settings: ProviderSettings) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("HTTP client builder failed ({}), using defaults", e);
                reqwest::Client::new()
            });
        Self { settings, http }
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// Full chat completions URL
    pub fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    /// JSON request body for one streamed completion
    pub fn request_body(&self, model_id: &str, prompt: &str) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": model_id,
            "stream": true,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        });
        if let Some(max_tokens) = self.settings.max_tokens {
            body["max_tokens"] = max_tokens.into();
        }
        if let Some(temperature) = self.settings.temperature {
            body["temperature"] = temperature.into();
        }
        body
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatAdapter {
    fn provider(&self) -> Provider {
        self.settings.provider
    }

    fn is_configured(&self) -> bool {
        self.settings.has_credentials()
    }

    async fn stream(&self, model_id: &str, prompt: &str) -> Result<StreamHandle, AdapterError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(AdapterError::MissingCredentials(self.settings.provider))?;

        debug!(
            "POST {} model={} ({} prompt chars)",
            self.endpoint(),
            model_id,
            prompt.chars().count()
        );
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&self.request_body(model_id, prompt))
            .send()
            .await
            .map_err(|e| AdapterError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::HttpStatus {
                status: status.as_u16(),
                body: preview(&body, 300),
            });
        }

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        tokio::spawn(forward_stream(
            response.bytes_stream(),
            tx,
            classify_openai_event,
        ));
        Ok(StreamHandle::new(rx))
    }
}
