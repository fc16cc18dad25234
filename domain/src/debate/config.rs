//! Debate configuration value object

use crate::agent::provider::AgentSpec;
use crate::catalog::ModelCatalog;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Number of debaters the protocol supports
pub const DEBATE_AGENT_COUNT: usize = 2;

/// Rounds used when a request does not say
pub const DEFAULT_MAX_ROUNDS: u32 = 5;

/// Which of the other agent's messages a critique responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CritiqueTarget {
    /// The other agent's most recent message, including one produced earlier
    /// in the same round.
    #[default]
    Latest,
    /// The other agent's message from the immediately preceding round.
    PreviousRound,
}

impl std::str::FromStr for CritiqueTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(CritiqueTarget::Latest),
            "previous_round" => Ok(CritiqueTarget::PreviousRound),
            other => Err(format!("unknown critique target: {}", other)),
        }
    }
}

/// How one debate is run (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateConfig {
    /// Debaters in speaking order
    pub agents: Vec<AgentSpec>,
    /// Number of rounds, round 0 included
    pub max_rounds: u32,
    #[serde(default)]
    pub critique_target: CritiqueTarget,
    /// `false` emits one collapsed `message` event per turn
    #[serde(default = "default_streaming")]
    pub streaming: bool,
}

fn default_streaming() -> bool {
    true
}

impl DebateConfig {
    pub fn new(agents: Vec<AgentSpec>, max_rounds: u32) -> Self {
        Self {
            agents,
            max_rounds,
            critique_target: CritiqueTarget::default(),
            streaming: true,
        }
    }

    pub fn with_critique_target(mut self, target: CritiqueTarget) -> Self {
        self.critique_target = target;
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Check agent count, round bounds and catalog membership
    pub fn validate(&self, catalog: &ModelCatalog, max_rounds_limit: u32) -> Result<(), DomainError> {
        if self.agents.len() != DEBATE_AGENT_COUNT {
            return Err(DomainError::InvalidAgentCount {
                expected: DEBATE_AGENT_COUNT,
                actual: self.agents.len(),
            });
        }
        if self.max_rounds == 0 || self.max_rounds > max_rounds_limit {
            return Err(DomainError::InvalidMaxRounds {
                actual: self.max_rounds,
                limit: max_rounds_limit,
            });
        }
        for agent in &self.agents {
            catalog.validate(agent)?;
        }
        Ok(())
    }
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self::new(AgentSpec::default_pair(), DEFAULT_MAX_ROUNDS)
    }
}
