//! Debate defaults from TOML (`[debate]` section)

use super::ConfigValidationError;
use battle_application::DebateSettings;
use battle_domain::{AgentSpec, CritiqueTarget};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw debate configuration from TOML
///
/// # Example
///
/// ```toml
/// [debate]
/// default_max_rounds = 3
/// max_rounds_limit = 10
/// default_models = ["openai/gpt-4.1", "gemini/gemini-2.5-flash"]
/// inter_round_delay_ms = 500
/// turn_timeout_seconds = 120
/// critique_target = "latest"   # or "previous_round"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    pub default_max_rounds: u32,
    pub max_rounds_limit: u32,
    /// `provider/model` strings, exactly two
    pub default_models: Vec<String>,
    pub inter_round_delay_ms: u64,
    pub turn_timeout_seconds: Option<u64>,
    pub critique_target: String,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        let defaults = DebateSettings::default();
        Self {
            default_max_rounds: defaults.default_max_rounds,
            max_rounds_limit: defaults.max_rounds_limit,
            default_models: defaults
                .default_agents
                .iter()
                .map(|a| a.to_string())
                .collect(),
            inter_round_delay_ms: defaults.inter_round_delay.as_millis() as u64,
            turn_timeout_seconds: None,
            critique_target: "latest".to_string(),
        }
    }
}

impl FileDebateConfig {
    /// Parse `default_models` into agent specs
    pub fn parse_default_models(&self) -> Result<Vec<AgentSpec>, ConfigValidationError> {
        if self.default_models.len() != battle_domain::DEBATE_AGENT_COUNT {
            return Err(ConfigValidationError::InvalidModelCount(
                self.default_models.len(),
            ));
        }
        self.default_models
            .iter()
            .map(|raw| {
                if raw.trim().is_empty() {
                    return Err(ConfigValidationError::EmptyModelName(
                        "debate.default_models".to_string(),
                    ));
                }
                raw.parse::<AgentSpec>()
                    .map_err(|e| ConfigValidationError::InvalidModel {
                        field: "debate.default_models".to_string(),
                        value: raw.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect()
    }

    pub fn parse_critique_target(&self) -> Result<CritiqueTarget, ConfigValidationError> {
        self.critique_target
            .parse()
            .map_err(|_| ConfigValidationError::InvalidCritiqueTarget(self.critique_target.clone()))
    }

    /// Convert to application settings, validating every field
    pub fn to_settings(&self) -> Result<DebateSettings, ConfigValidationError> {
        if self.default_max_rounds == 0 || self.max_rounds_limit == 0 {
            return Err(ConfigValidationError::InvalidRounds);
        }
        if self.default_max_rounds > self.max_rounds_limit {
            return Err(ConfigValidationError::RoundsAboveLimit {
                default: self.default_max_rounds,
                limit: self.max_rounds_limit,
            });
        }
        if self.turn_timeout_seconds == Some(0) {
            return Err(ConfigValidationError::InvalidTimeout(
                "debate.turn_timeout_seconds",
            ));
        }

        Ok(DebateSettings::default()
            .with_default_max_rounds(self.default_max_rounds)
            .with_max_rounds_limit(self.max_rounds_limit)
            .with_default_agents(self.parse_default_models()?)
            .with_critique_target(self.parse_critique_target()?)
            .with_inter_round_delay(Duration::from_millis(self.inter_round_delay_ms))
            .with_turn_timeout(self.turn_timeout_seconds.map(Duration::from_secs)))
    }
}
