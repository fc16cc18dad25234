//! Wire types for the debate HTTP API.
//!
//! Request and response bodies, plus [`WireEvent`], the flat JSON object every
//! SSE frame carries. Every event has the same four core fields
//! (`provider`, `content`, `message_id`, `round_number`) so a client can
//! decode any frame with one type; event-specific extras are omitted when
//! they don't apply.

use battle_application::SessionSummary;
use battle_domain::{
    AgentSpec, EndReason, Message, ModelCatalog, Provider, Session, SessionStatus, StreamEvent,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One debater as named in a request or response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedModel {
    pub provider: String,
    pub model_id: String,
}

impl From<&AgentSpec> for SelectedModel {
    fn from(agent: &AgentSpec) -> Self {
        Self {
            provider: agent.provider.to_string(),
            model_id: agent.model_id.clone(),
        }
    }
}

impl SelectedModel {
    pub fn to_agent(&self) -> Result<AgentSpec, battle_domain::DomainError> {
        Ok(AgentSpec::new(self.provider.parse()?, self.model_id.trim()))
    }
}

/// `POST /debate/start` body
#[derive(Debug, Clone, Deserialize)]
pub struct StartDebateRequest {
    pub question: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub max_rounds: Option<u32>,
    #[serde(default)]
    pub models: Option<Vec<SelectedModel>>,
    #[serde(default)]
    pub streaming: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartDebateResponse {
    pub session_id: String,
    pub question: String,
    pub max_rounds: u32,
    pub models: Vec<SelectedModel>,
}

impl From<&Session> for StartDebateResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id().to_string(),
            question: session.question().content().to_string(),
            max_rounds: session.config().max_rounds,
            models: session.config().agents.iter().map(SelectedModel::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StopResponse {
    pub session_id: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelEntry {
    pub provider: Provider,
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub models: BTreeMap<String, Vec<ModelEntry>>,
    pub available_providers: Vec<Provider>,
}

impl From<&ModelCatalog> for ModelsResponse {
    fn from(catalog: &ModelCatalog) -> Self {
        let models = catalog
            .iter()
            .filter(|(_, models)| !models.is_empty())
            .map(|(provider, models)| {
                let entries = models
                    .iter()
                    .map(|m| ModelEntry {
                        provider,
                        id: m.model_id.clone(),
                        name: m.display_name.clone(),
                        description: m.description.clone(),
                    })
                    .collect();
                (provider.to_string(), entries)
            })
            .collect();
        Self {
            models,
            available_providers: catalog.providers(),
        }
    }
}

/// A completed message in a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub id: String,
    pub provider: Provider,
    pub model_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_critique: bool,
    pub round_number: u32,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            provider: message.agent.provider,
            model_id: message.agent.model_id.clone(),
            content: message.content.clone(),
            timestamp: message.created_at,
            is_critique: message.is_critique,
            round_number: message.round,
        }
    }
}

/// `GET /debate/{id}` body
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub question: String,
    pub status: SessionStatus,
    pub current_round: u32,
    pub max_rounds: u32,
    pub models: Vec<SelectedModel>,
    pub messages: Vec<MessageView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id().to_string(),
            question: session.question().content().to_string(),
            status: session.status(),
            current_round: session.current_round(),
            max_rounds: session.config().max_rounds,
            models: session.config().agents.iter().map(SelectedModel::from).collect(),
            messages: session
                .transcript()
                .messages()
                .iter()
                .map(MessageView::from)
                .collect(),
            error: session.error().map(str::to_string),
        }
    }
}

/// `GET /debates` body
#[derive(Debug, Clone, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionSummary>,
}

/// Error body for 4xx responses
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// The JSON payload of one SSE frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireEvent {
    pub event_type: &'static str,
    pub provider: Option<Provider>,
    pub content: String,
    pub message_id: Option<String>,
    pub round_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_critique: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<EndReason>,
}

impl WireEvent {
    fn bare(event_type: &'static str) -> Self {
        Self {
            event_type,
            provider: None,
            content: String::new(),
            message_id: None,
            round_number: 0,
            model_id: None,
            max_rounds: None,
            is_critique: None,
            timestamp: None,
            reason: None,
        }
    }
}

impl From<&StreamEvent> for WireEvent {
    fn from(event: &StreamEvent) -> Self {
        let mut wire = WireEvent::bare(event.event_type());
        match event {
            StreamEvent::RoundStart { round, max_rounds } => {
                wire.round_number = *round;
                wire.max_rounds = Some(*max_rounds);
            }
            StreamEvent::StreamStart {
                agent,
                message_id,
                round,
                ..
            } => {
                wire.provider = Some(agent.provider);
                wire.model_id = Some(agent.model_id.clone());
                wire.message_id = Some(message_id.to_string());
                wire.round_number = *round;
            }
            StreamEvent::StreamChunk {
                message_id,
                content,
            } => {
                wire.message_id = Some(message_id.to_string());
                wire.content = content.clone();
            }
            StreamEvent::StreamEnd { message_id } => {
                wire.message_id = Some(message_id.to_string());
            }
            StreamEvent::Message(message) => {
                wire.provider = Some(message.agent.provider);
                wire.model_id = Some(message.agent.model_id.clone());
                wire.message_id = Some(message.id.to_string());
                wire.content = message.content.clone();
                wire.round_number = message.round;
                wire.is_critique = Some(message.is_critique);
                wire.timestamp = Some(message.created_at);
            }
            StreamEvent::RoundEnd { round } => {
                wire.round_number = *round;
            }
            StreamEvent::DebateEnd { reason } => {
                wire.reason = Some(*reason);
            }
            StreamEvent::Error { message } => {
                wire.content = message.clone();
            }
        }
        wire
    }
}
