//! Debate and session parameters.
//!
//! [`DebateSettings`] controls how a single debate runs (defaults for omitted
//! request fields, pacing, timeouts). [`SessionPolicy`] controls how long the
//! registry keeps sessions around. Both are application-layer concerns; the
//! infrastructure config loader fills them from the file/env layers.

use battle_domain::{AgentSpec, CritiqueTarget, DEFAULT_MAX_ROUNDS};
use std::time::Duration;

/// Upper bound on `max_rounds` accepted from a client.
pub const DEFAULT_MAX_ROUNDS_LIMIT: u32 = 20;

/// Parameters for running debates.
#[derive(Debug, Clone, PartialEq)]
pub struct DebateSettings {
    /// Rounds used when a request omits `max_rounds`.
    pub default_max_rounds: u32,
    /// Largest `max_rounds` a request may ask for.
    pub max_rounds_limit: u32,
    /// Agents used when a request omits `models`.
    pub default_agents: Vec<AgentSpec>,
    pub critique_target: CritiqueTarget,
    /// Pause between a `round_end` and the next `round_start`.
    pub inter_round_delay: Duration,
    /// Wall-clock limit for one agent turn. `None` waits forever.
    pub turn_timeout: Option<Duration>,
}

impl Default for DebateSettings {
    fn default() -> Self {
        Self {
            default_max_rounds: DEFAULT_MAX_ROUNDS,
            max_rounds_limit: DEFAULT_MAX_ROUNDS_LIMIT,
            default_agents: AgentSpec::default_pair(),
            critique_target: CritiqueTarget::default(),
            inter_round_delay: Duration::from_millis(500),
            turn_timeout: None,
        }
    }
}

impl DebateSettings {
    // ==================== Builder Methods ====================

    pub fn with_default_max_rounds(mut self, rounds: u32) -> Self {
        self.default_max_rounds = rounds;
        self
    }

    pub fn with_max_rounds_limit(mut self, limit: u32) -> Self {
        self.max_rounds_limit = limit;
        self
    }

    pub fn with_default_agents(mut self, agents: Vec<AgentSpec>) -> Self {
        self.default_agents = agents;
        self
    }

    pub fn with_critique_target(mut self, target: CritiqueTarget) -> Self {
        self.critique_target = target;
        self
    }

    pub fn with_inter_round_delay(mut self, delay: Duration) -> Self {
        self.inter_round_delay = delay;
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.turn_timeout = timeout;
        self
    }
}

/// Session lifetime policy for the registry sweeper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPolicy {
    /// A session nobody ever subscribed to is stopped after this long.
    pub idle_timeout: Duration,
    /// A running session with no activity for this long is stopped.
    pub activity_timeout: Duration,
    /// Terminal sessions stay queryable for this long, then are evicted.
    pub terminal_retention: Duration,
    /// How often the reaper runs a sweep.
    pub sweep_interval: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(300),
            activity_timeout: Duration::from_secs(600),
            terminal_retention: Duration::from_secs(300),
            sweep_interval: Duration::from_secs(30),
        }
    }
}

impl SessionPolicy {
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_activity_timeout(mut self, timeout: Duration) -> Self {
        self.activity_timeout = timeout;
        self
    }

    pub fn with_terminal_retention(mut self, retention: Duration) -> Self {
        self.terminal_retention = retention;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}
