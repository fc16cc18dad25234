//! Anthropic Messages API adapter.
//!
//! Sends a single user message with `"stream": true` to `/messages` and
//! translates the typed event stream (`content_block_delta`, `message_delta`,
//! `message_stop`, `error`) into [`GenerationEvent`]s.
//!
//! [`GenerationEvent`]: battle_domain::GenerationEvent

use super::sse::{ChunkKind, forward_stream};
use super::{ProviderAdapter, ProviderSettings};
use async_trait::async_trait;
use battle_application::{AdapterError, StreamHandle};
use battle_domain::{Provider, preview};
use eventsource_stream::Event;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// The Messages API requires `max_tokens`
pub const DEFAULT_MAX_TOKENS: u32 = 8192;

const STREAM_CHANNEL_CAPACITY: usize = 64;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct AnthropicAdapter {
    settings: ProviderSettings,
    http: reqwest::Client,
}

impl AnthropicAdapter {
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

    pub fn endpoint(&self) -> String {
        format!("{}/messages", self.settings.base_url.trim_end_matches('/'))
    }

    pub fn request_body(&self, model_id: &str, prompt: &str) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": model_id,
            "stream": true,
            "max_tokens": self.settings.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "messages": [
                { "role": "user", "content": prompt }
            ],
        });
        if let Some(temperature) = self.settings.temperature {
            body["temperature"] = temperature.into();
        }
        body
    }
}

/// Classify one Messages API stream event.
///
/// `event_name` is the SSE `event:` field; when it is missing the payload's
/// own `type` is used.
pub fn classify_anthropic_chunk(event_name: &str, payload: &str) -> Result<ChunkKind, AdapterError> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Ok(ChunkKind::Ignore);
    }
    let json: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| AdapterError::MalformedStream(format!("{}: {}", e, payload)))?;

    let kind = match event_name {
        "" | "message" => json.get("type").and_then(|t| t.as_str()).unwrap_or(""),
        name => name,
    };

    match kind {
        "content_block_delta" => {
            let delta = &json["delta"];
            match delta["text"].as_str() {
                Some(text) if delta["type"] == "text_delta" && !text.is_empty() => {
                    Ok(ChunkKind::Delta(text.to_string()))
                }
                _ => Ok(ChunkKind::Ignore),
            }
        }
        "message_delta" if !json["delta"]["stop_reason"].is_null() => Ok(ChunkKind::Finished),
        "message_stop" => Ok(ChunkKind::Done),
        "error" => {
            let message = json["error"]["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| json["error"].to_string());
            Err(AdapterError::ProviderError(message))
        }
        _ => Ok(ChunkKind::Ignore),
    }
}

fn classify_anthropic_event(event: &Event) -> Result<ChunkKind, AdapterError> {
    classify_anthropic_chunk(&event.event, &event.data)
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
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
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
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
            classify_anthropic_event,
        ));
        Ok(StreamHandle::new(rx))
    }
}
