//! Domain layer for agent-battle
//!
//! This crate contains the core debate entities, value objects and policies.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Debate
//!
//! Two agents answer a question blind (round 0), then take turns critiquing
//! each other's latest message (rounds ≥ 1). Every message lands in an
//! append-only [`Transcript`].
//!
//! ## Turn scheduling
//!
//! [`TurnScheduler`] is a pure function of the config and transcript: it picks
//! the speaking order and the context each speaker is shown.

pub mod agent;
pub mod catalog;
pub mod core;
pub mod debate;
pub mod prompt;

// Re-export commonly used types
pub use agent::{
    generation::GenerationEvent,
    provider::{AgentSpec, Provider},
};
pub use catalog::{ModelCatalog, ModelInfo};
pub use core::{error::DomainError, question::Question, string::preview};
pub use debate::{
    config::{CritiqueTarget, DEBATE_AGENT_COUNT, DEFAULT_MAX_ROUNDS, DebateConfig},
    event::{EndReason, StreamEvent},
    message::{Message, MessageId},
    scheduler::{Turn, TurnScheduler},
    session::{Session, SessionId, SessionStatus},
    transcript::Transcript,
};
pub use prompt::PromptTemplate;
