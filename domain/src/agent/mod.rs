//! Agent identity and generation output.
//!
//! - [`provider::Provider`] / [`provider::AgentSpec`]: who is debating
//! - [`generation::GenerationEvent`]: what a provider adapter streams back

pub mod generation;
pub mod provider;
