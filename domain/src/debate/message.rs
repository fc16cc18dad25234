//! Debate message entity

use crate::agent::provider::AgentSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of one message, unique within its session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Allocate a fresh random id
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One completed turn (Entity)
///
/// Immutable once built: the transcript stores it and nothing edits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub agent: AgentSpec,
    /// Position of the producing agent in the speaking order
    pub agent_index: usize,
    pub round: u32,
    /// False only for round 0 answers
    pub is_critique: bool,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        id: MessageId,
        agent: AgentSpec,
        agent_index: usize,
        round: u32,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            agent,
            agent_index,
            round,
            is_critique: round > 0,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_zero_is_not_critique() {
        let msg = Message::new(MessageId::new(), AgentSpec::default_openai(), 0, 0, "Hello");
        assert!(!msg.is_critique);
        assert_eq!(msg.round, 0);
    }

    #[test]
    fn test_later_rounds_are_critiques() {
        let msg = Message::new(
            MessageId::from("test-456"),
            AgentSpec::default_gemini(),
            1,
            1,
            "I disagree because...",
        );
        assert!(msg.is_critique);
        assert_eq!(msg.id.as_str(), "test-456");
    }

    #[test]
    fn test_message_ids_are_unique() {
        assert_ne!(MessageId::new(), MessageId::new());
    }
}
