//! Application layer for agent-battle
//!
//! This crate contains the debate state machine, the session registry, the
//! event fan-out, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DebateSettings, SessionPolicy};
pub use ports::{
    agent_client::{AdapterError, AgentClient, StreamHandle},
    transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger},
};
pub use use_cases::event_publisher::{EventPublisher, EventSubscription};
pub use use_cases::run_debate::{DebateStateMachine, SharedSession};
pub use use_cases::session_registry::{
    CreateDebateInput, RegistryError, SessionRegistry, SessionSummary, StopOutcome, SweepReport,
};
