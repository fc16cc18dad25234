//! Use cases (application services)

pub mod event_publisher;
pub mod run_debate;
pub mod session_registry;
