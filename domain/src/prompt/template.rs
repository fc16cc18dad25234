//! Prompt templates for debate turns

use crate::agent::provider::AgentSpec;
use crate::core::question::Question;
use crate::debate::message::Message;
use crate::debate::scheduler::Turn;

/// Templates for generating the prompt of each turn
pub struct PromptTemplate;

impl PromptTemplate {
    /// Round 0 prompt: the question, verbatim
    pub fn opening(question: &str) -> String {
        question.to_string()
    }

    /// Critique prompt for rounds ≥ 1
    ///
    /// `history` is the transcript so far as `(speaker, content)` pairs.
    pub fn critique(
        question: &str,
        opponent_name: &str,
        opponent_response: &str,
        history: &[(String, String)],
    ) -> String {
        let mut prompt = String::new();

        if !history.is_empty() {
            prompt.push_str("Debate so far:\n");
            for (speaker, content) in history {
                prompt.push_str(&format!("\n--- {} ---\n{}\n", speaker, content));
            }
            prompt.push('\n');
        }

        prompt.push_str(&format!(
            r#"The other AI ({}) responded:

"{}"

Please critique this response, point out any flaws or missing perspectives, and provide your improved answer to the original question: {}"#,
            opponent_name, opponent_response, question
        ));

        prompt
    }

    /// Render the prompt for a scheduled turn
    ///
    /// `name_of` resolves an agent to its display name.
    pub fn for_turn(
        question: &Question,
        turn: &Turn,
        name_of: impl Fn(&AgentSpec) -> String,
    ) -> String {
        let Some(target) = &turn.critique_target else {
            return Self::opening(question.content());
        };

        let history: Vec<(String, String)> = turn
            .context
            .iter()
            .filter(|m| m.id != target.id)
            .map(|m| (Self::speaker_label(m, &name_of), m.content.clone()))
            .collect();

        Self::critique(
            question.content(),
            &name_of(&target.agent),
            &target.content,
            &history,
        )
    }

    fn speaker_label(message: &Message, name_of: &impl Fn(&AgentSpec) -> String) -> String {
        format!("Round {} · {}", message.round + 1, name_of(&message.agent))
    }
}
