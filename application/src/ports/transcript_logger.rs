//! Port for structured transcript logging.
//!
//! Defines the [`TranscriptLogger`] trait for recording debate lifecycle
//! events (session start, completed messages, session end) to a structured
//! log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the debate
//! transcript in a machine-readable format (JSONL).

use battle_domain::SessionId;
use serde_json::Value;

/// A structured transcript event for logging.
pub struct TranscriptEvent {
    /// Event type identifier (e.g., "debate_started", "message", "debate_ended").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl TranscriptEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// True for the event that closes a session's log
    pub fn is_final(&self) -> bool {
        matches!(self.event_type, "debate_ended" | "debate_failed")
    }
}

/// Port for logging transcript events to a structured log.
///
/// The `log` method is synchronous and non-fallible so a logging failure
/// never disturbs a running debate.
pub trait TranscriptLogger: Send + Sync {
    /// Record an event for one session.
    fn log(&self, session_id: &SessionId, event: TranscriptEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoTranscriptLogger;

impl TranscriptLogger for NoTranscriptLogger {
    fn log(&self, _session_id: &SessionId, _event: TranscriptEvent) {}
}
