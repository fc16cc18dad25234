//! Debate domain.
//!
//! - [`session::Session`]: one debate and its lifecycle status
//! - [`message::Message`] / [`transcript::Transcript`]: what was said
//! - [`scheduler::TurnScheduler`]: who speaks next and what they see
//! - [`event::StreamEvent`]: what subscribers observe

pub mod config;
pub mod event;
pub mod message;
pub mod scheduler;
pub mod session;
pub mod transcript;
