//! Streaming events produced by one agent generation.
//!
//! [`GenerationEvent`] is what a provider adapter hands back while a model is
//! writing: incremental text, then exactly one terminal event.

/// An event in a streaming LLM response.
///
/// Bridges provider-level streaming (SSE chunks from a chat completions API)
/// to the debate engine, which re-emits each delta as a protocol event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    /// A text fragment from the model.
    Delta(String),
    /// The complete response text (signals stream end).
    ///
    /// Adapters that only stream deltas may send an empty string here; the
    /// consumer keeps what it accumulated from the deltas.
    Completed(String),
    /// An error that occurred during streaming.
    Error(String),
}
