//! Transcript store
//!
//! The ordered record of every message a session produced. It only grows:
//! there is no API to edit or remove a message.

use super::message::Message;
use serde::{Deserialize, Serialize};

/// Append-only list of completed messages, in production order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed message
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recent message produced by an agent
    pub fn latest_from(&self, agent_index: usize) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.agent_index == agent_index)
    }

    /// Message an agent produced in a given round
    pub fn from_agent_in_round(&self, agent_index: usize, round: u32) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.agent_index == agent_index && m.round == round)
    }
}
