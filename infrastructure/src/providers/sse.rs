//! Server-sent event streams from chat completion endpoints.
//!
//! Provider response bodies are framed by `eventsource-stream`; a
//! provider-specific [`ChunkClassifier`] interprets each event, and
//! [`forward_stream`] drives both into a [`GenerationEvent`] channel.
//! OpenAI-compatible endpoints send `data: {json}` events terminated by
//! `data: [DONE]`, which [`classify_chunk`] understands.

use battle_application::AdapterError;
use battle_domain::GenerationEvent;
use eventsource_stream::{Event, EventStreamError, Eventsource};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Meaning of one SSE event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkKind {
    /// Text to append
    Delta(String),
    /// `finish_reason` was set; `[DONE]` normally follows
    Finished,
    /// `[DONE]` sentinel
    Done,
    /// Role-only deltas, usage blocks and the like
    Ignore,
}

/// Classify one OpenAI-compatible `data:` payload.
///
/// This is a pure function with no side effects, called once per payload.
pub fn classify_chunk(payload: &str) -> Result<ChunkKind, AdapterError> {
    let payload = payload.trim();
    if payload == "[DONE]" {
        return Ok(ChunkKind::Done);
    }
    if payload.is_empty() {
        return Ok(ChunkKind::Ignore);
    }

    let json: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| AdapterError::MalformedStream(format!("{}: {}", e, payload)))?;

    if let Some(error) = json.get("error") {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(AdapterError::ProviderError(message));
    }

    let Some(choice) = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
    else {
        return Ok(ChunkKind::Ignore);
    };

    if let Some(text) = choice
        .get("delta")
        .and_then(|d| d.get("content"))
        .and_then(|c| c.as_str())
        && !text.is_empty()
    {
        return Ok(ChunkKind::Delta(text.to_string()));
    }

    if choice
        .get("finish_reason")
        .is_some_and(|reason| !reason.is_null())
    {
        return Ok(ChunkKind::Finished);
    }

    Ok(ChunkKind::Ignore)
}

/// Interprets one decoded SSE event
pub type ChunkClassifier = fn(&Event) -> Result<ChunkKind, AdapterError>;

/// [`ChunkClassifier`] for OpenAI-compatible chat completion streams
pub fn classify_openai_event(event: &Event) -> Result<ChunkKind, AdapterError> {
    classify_chunk(&event.data)
}

/// Pump a response body into a generation channel.
///
/// Returns as soon as the receiver is dropped, abandoning the body.
pub async fn forward_stream<S, B, E>(
    body: S,
    tx: mpsc::Sender<GenerationEvent>,
    classify: ChunkClassifier,
) where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut events = std::pin::pin!(body.eventsource());
    let mut finished = false;
    let mut fragments = 0usize;

    while let Some(event) = events.next().await {
        let event = match event {
            Ok(event) => event,
            Err(EventStreamError::Transport(e)) => {
                let _ = tx
                    .send(GenerationEvent::Error(format!("connection lost: {}", e)))
                    .await;
                return;
            }
            Err(e) => {
                let _ = tx
                    .send(GenerationEvent::Error(format!("malformed event stream: {}", e)))
                    .await;
                return;
            }
        };

        trace!("SSE {}: {}", event.event, event.data);
        match classify(&event) {
            Ok(ChunkKind::Delta(text)) => {
                fragments += 1;
                if tx.send(GenerationEvent::Delta(text)).await.is_err() {
                    debug!("Receiver dropped after {} fragments", fragments);
                    return;
                }
            }
            Ok(ChunkKind::Finished) => finished = true,
            Ok(ChunkKind::Done) => {
                let _ = tx.send(GenerationEvent::Completed(String::new())).await;
                return;
            }
            Ok(ChunkKind::Ignore) => {}
            Err(e) => {
                let _ = tx.send(GenerationEvent::Error(e.to_string())).await;
                return;
            }
        }
    }

    let last = if finished {
        GenerationEvent::Completed(String::new())
    } else {
        GenerationEvent::Error("stream ended before the response completed".to_string())
    };
    let _ = tx.send(last).await;
}
