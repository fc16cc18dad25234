//! Session lifetime configuration from TOML (`[sessions]` section)

use super::ConfigValidationError;
use battle_application::SessionPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw session policy from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionsConfig {
    /// Stop sessions nobody subscribed to after this long
    pub idle_timeout_seconds: u64,
    /// Stop running sessions with no activity for this long
    pub activity_timeout_seconds: u64,
    /// Keep finished sessions queryable for this long
    pub terminal_retention_seconds: u64,
    pub sweep_interval_seconds: u64,
}

impl Default for FileSessionsConfig {
    fn default() -> Self {
        let policy = SessionPolicy::default();
        Self {
            idle_timeout_seconds: policy.idle_timeout.as_secs(),
            activity_timeout_seconds: policy.activity_timeout.as_secs(),
            terminal_retention_seconds: policy.terminal_retention.as_secs(),
            sweep_interval_seconds: policy.sweep_interval.as_secs(),
        }
    }
}

impl FileSessionsConfig {
    pub fn to_policy(&self) -> Result<SessionPolicy, ConfigValidationError> {
        for (field, value) in [
            ("sessions.idle_timeout_seconds", self.idle_timeout_seconds),
            ("sessions.activity_timeout_seconds", self.activity_timeout_seconds),
            ("sessions.sweep_interval_seconds", self.sweep_interval_seconds),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::InvalidTimeout(field));
            }
        }

        Ok(SessionPolicy::default()
            .with_idle_timeout(Duration::from_secs(self.idle_timeout_seconds))
            .with_activity_timeout(Duration::from_secs(self.activity_timeout_seconds))
            .with_terminal_retention(Duration::from_secs(self.terminal_retention_seconds))
            .with_sweep_interval(Duration::from_secs(self.sweep_interval_seconds)))
    }
}
