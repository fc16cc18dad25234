//! Prompt domain
//!
//! Templates for turning a scheduled turn into the text an agent receives.

mod template;

pub use template::PromptTemplate;
