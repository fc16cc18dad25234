//! Protocol events emitted by a running debate.
//!
//! The closed set of events a subscriber can observe, in the order the state
//! machine produced them. Wire framing lives in the presentation layer; this
//! type only fixes the vocabulary and which events end a stream.

use super::message::{Message, MessageId};
use crate::agent::provider::AgentSpec;
use serde::{Deserialize, Serialize};

/// Why a debate ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Every round ran
    Completed,
    /// A stop request was honored
    Stopped,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Completed => "completed",
            EndReason::Stopped => "stopped",
        }
    }
}

/// An event in a debate's output stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    RoundStart {
        round: u32,
        max_rounds: u32,
    },
    StreamStart {
        agent: AgentSpec,
        agent_index: usize,
        message_id: MessageId,
        round: u32,
    },
    StreamChunk {
        message_id: MessageId,
        content: String,
    },
    StreamEnd {
        message_id: MessageId,
    },
    /// A whole message at once (non-streaming sessions)
    Message(Message),
    RoundEnd {
        round: u32,
    },
    DebateEnd {
        reason: EndReason,
    },
    Error {
        message: String,
    },
}

impl StreamEvent {
    /// The `event_type` tag used on the wire
    pub fn event_type(&self) -> &'static str {
        match self {
            StreamEvent::RoundStart { .. } => "round_start",
            StreamEvent::StreamStart { .. } => "stream_start",
            StreamEvent::StreamChunk { .. } => "stream_chunk",
            StreamEvent::StreamEnd { .. } => "stream_end",
            StreamEvent::Message(_) => "message",
            StreamEvent::RoundEnd { .. } => "round_end",
            StreamEvent::DebateEnd { .. } => "debate_end",
            StreamEvent::Error { .. } => "error",
        }
    }

    /// No event follows a terminal event on the same stream
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamEvent::DebateEnd { .. } | StreamEvent::Error { .. }
        )
    }
}
