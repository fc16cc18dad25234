//! Application-level configuration.
//!
//! - [`DebateSettings`]: request defaults, pacing and timeouts for one debate
//! - [`SessionPolicy`]: registry lifetimes and sweep cadence

pub mod debate_settings;

pub use debate_settings::{DEFAULT_MAX_ROUNDS_LIMIT, DebateSettings, SessionPolicy};
