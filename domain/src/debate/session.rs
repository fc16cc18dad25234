//! Debate session entity and lifecycle status

use super::config::DebateConfig;
use super::event::{EndReason, StreamEvent};
use super::message::Message;
use super::transcript::Transcript;
use crate::core::question::Question;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Allocate a fresh random id
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Created, no subscriber has started it yet
    Pending,
    Running,
    Stopped,
    Completed,
    Errored,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Running => "running",
            SessionStatus::Stopped => "stopped",
            SessionStatus::Completed => "completed",
            SessionStatus::Errored => "errored",
        }
    }

    /// Terminal states never change again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Stopped | SessionStatus::Completed | SessionStatus::Errored
        )
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One debate from creation to its terminal state (Entity)
///
/// Transitions out of a terminal status are refused, so a late stop request
/// cannot turn a completed debate into a stopped one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    question: Question,
    config: DebateConfig,
    status: SessionStatus,
    current_round: u32,
    transcript: Transcript,
    error: Option<String>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId, question: Question, config: DebateConfig) -> Self {
        let now = Utc::now();
        Self {
            id,
            question,
            config,
            status: SessionStatus::Pending,
            current_round: 0,
            transcript: Transcript::new(),
            error: None,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn config(&self) -> &DebateConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Record that the session did something observable
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Pending → Running. Returns false if the session already left Pending.
    pub fn begin(&mut self) -> bool {
        if self.status != SessionStatus::Pending {
            return false;
        }
        self.status = SessionStatus::Running;
        self.touch();
        true
    }

    pub fn set_round(&mut self, round: u32) {
        self.current_round = round;
        self.touch();
    }

    /// Append a completed message to the transcript
    pub fn record(&mut self, message: Message) {
        self.transcript.append(message);
        self.touch();
    }

    pub fn complete(&mut self) -> bool {
        self.finish(SessionStatus::Completed)
    }

    pub fn stop(&mut self) -> bool {
        self.finish(SessionStatus::Stopped)
    }

    pub fn fail(&mut self, error: impl Into<String>) -> bool {
        let changed = self.finish(SessionStatus::Errored);
        if changed {
            self.error = Some(error.into());
        }
        changed
    }

    /// The event that closed this session's stream, once it is terminal
    pub fn closing_event(&self) -> Option<StreamEvent> {
        match self.status {
            SessionStatus::Completed => Some(StreamEvent::DebateEnd {
                reason: EndReason::Completed,
            }),
            SessionStatus::Stopped => Some(StreamEvent::DebateEnd {
                reason: EndReason::Stopped,
            }),
            SessionStatus::Errored => Some(StreamEvent::Error {
                message: self.error.clone().unwrap_or_default(),
            }),
            SessionStatus::Pending | SessionStatus::Running => None,
        }
    }

    fn finish(&mut self, status: SessionStatus) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = status;
        self.touch();
        true
    }
}
