//! Turn scheduling policy
//!
//! Decides who speaks, in what order, and what each speaker sees. Everything
//! here is a pure function of the config and the transcript so far.
//!
//! Ordering guarantee: agents speak in index order within every round, and
//! each turn completes before the next one is planned. Agent 0 therefore
//! always finishes strictly before agent 1 starts.

use super::config::{CritiqueTarget, DebateConfig};
use super::message::Message;
use super::transcript::Transcript;

/// One unit of work for the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub agent_index: usize,
    pub round: u32,
    /// Prior messages visible to the agent, oldest first
    pub context: Vec<Message>,
    /// The other agent's message this turn critiques
    pub critique_target: Option<Message>,
}

impl Turn {
    pub fn is_critique(&self) -> bool {
        self.round > 0
    }
}

/// Stateless scheduler
pub struct TurnScheduler;

impl TurnScheduler {
    /// Agent indices in the order they speak each round
    pub fn speaking_order(config: &DebateConfig) -> std::ops::Range<usize> {
        0..config.agents.len()
    }

    /// Index of the agent whose output `agent_index` critiques
    pub fn opponent_of(config: &DebateConfig, agent_index: usize) -> usize {
        let n = config.agents.len().max(1);
        (agent_index + 1) % n
    }

    /// Build the turn for `agent_index` in `round`
    ///
    /// Round 0 is blind: the context is empty and only the question is shown.
    /// Later rounds see the whole transcript plus a critique target.
    pub fn plan(
        config: &DebateConfig,
        transcript: &Transcript,
        round: u32,
        agent_index: usize,
    ) -> Turn {
        if round == 0 {
            return Turn {
                agent_index,
                round,
                context: Vec::new(),
                critique_target: None,
            };
        }

        let opponent = Self::opponent_of(config, agent_index);
        let critique_target = match config.critique_target {
            CritiqueTarget::Latest => transcript.latest_from(opponent),
            CritiqueTarget::PreviousRound => transcript.from_agent_in_round(opponent, round - 1),
        }
        .cloned();

        Turn {
            agent_index,
            round,
            context: transcript.messages().to_vec(),
            critique_target,
        }
    }
}
