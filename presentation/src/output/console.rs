//! Console rendering of a debate's event stream

use colored::Colorize;
use battle_domain::{AgentSpec, EndReason, ModelCatalog, StreamEvent};
use std::sync::Arc;

/// Turns debate events into terminal text
pub struct ConsoleRenderer {
    catalog: Arc<ModelCatalog>,
}

impl ConsoleRenderer {
    pub fn new(catalog: Arc<ModelCatalog>) -> Self {
        Self { catalog }
    }

    /// Banner printed before the first event
    pub fn header(&self, question: &str, agents: &[AgentSpec], max_rounds: u32) -> String {
        let mut output = String::new();
        output.push_str(&Self::rule());
        output.push_str(&format!("{:^60}\n", "Agent Battle".bold()));
        output.push_str(&Self::rule());
        output.push_str(&format!("{} {}\n", "Question:".cyan().bold(), question));
        output.push_str(&format!(
            "{} {}\n",
            "Debaters:".cyan().bold(),
            agents
                .iter()
                .map(|a| self.label(a))
                .collect::<Vec<_>>()
                .join(" vs ")
        ));
        output.push_str(&format!("{} {}\n", "Rounds:".cyan().bold(), max_rounds));
        output
    }

    /// Text for one event; `None` for events with nothing to show.
    ///
    /// Chunks come back without a trailing newline so streamed text flows.
    pub fn render(&self, event: &StreamEvent) -> Option<String> {
        match event {
            StreamEvent::RoundStart { round, max_rounds } => {
                let title = if *round == 0 {
                    format!("Round {}/{}: opening answers", round + 1, max_rounds)
                } else {
                    format!("Round {}/{}: critiques", round + 1, max_rounds)
                };
                Some(format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40)))
            }
            StreamEvent::StreamStart { agent, .. } => Some(format!(
                "\n{}\n",
                format!("── {} ──", self.label(agent)).yellow().bold()
            )),
            StreamEvent::StreamChunk { content, .. } => Some(content.clone()),
            StreamEvent::StreamEnd { .. } => Some("\n".to_string()),
            StreamEvent::Message(message) => {
                let kind = if message.is_critique { "critique" } else { "answer" };
                Some(format!(
                    "\n{}\n{}\n",
                    format!("── {} ({}) ──", self.label(&message.agent), kind)
                        .yellow()
                        .bold(),
                    message.content
                ))
            }
            StreamEvent::RoundEnd { .. } => None,
            StreamEvent::DebateEnd { reason } => {
                let text = match reason {
                    EndReason::Completed => "Debate complete".green().bold(),
                    EndReason::Stopped => "Debate stopped".yellow().bold(),
                };
                Some(format!("\n{}{}\n", Self::rule(), text))
            }
            StreamEvent::Error { message } => Some(format!(
                "\n{}{} {}\n",
                Self::rule(),
                "Error:".red().bold(),
                message
            )),
        }
    }

    fn label(&self, agent: &AgentSpec) -> String {
        format!("{} ({})", self.catalog.display_name(agent), agent.provider)
    }

    fn rule() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}

/// Catalog listing for `agent-battle models`
pub fn format_catalog(catalog: &ModelCatalog) -> String {
    let mut output = String::new();
    for (provider, models) in catalog.iter() {
        if models.is_empty() {
            continue;
        }
        output.push_str(&format!("{}\n", provider.as_str().cyan().bold()));
        for model in models {
            output.push_str(&format!(
                "  {}/{:<22} {}",
                provider, model.model_id, model.display_name
            ));
            if !model.description.is_empty() {
                output.push_str(&format!("  {}", model.description.dimmed()));
            }
            output.push('\n');
        }
    }
    if output.is_empty() {
        output.push_str("No models available (is an API key configured?)\n");
    }
    output
}
