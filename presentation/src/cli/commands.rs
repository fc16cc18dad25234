//! CLI command definitions

use battle_domain::{AgentSpec, DomainError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for agent-battle
#[derive(Parser, Debug)]
#[command(name = "agent-battle")]
#[command(author, version, about = "Agent Battle - two LLMs debate a question, round by round")]
#[command(long_about = r#"
Agent Battle runs a debate between two language models.

Round 0: both agents answer the question without seeing each other.
Round 1+: each agent critiques the other's latest answer.

Configuration files are loaded from (in priority order):
1. AGENT_BATTLE_* environment variables (nested keys use "__")
2. --config <path>     Explicit config file
3. ./battle.toml       Project-level config
4. ~/.config/agent-battle/config.toml   Global config

Example:
  agent-battle serve --port 8000
  agent-battle debate "Is P=NP?" -r 3
  agent-battle debate "Tabs or spaces?" -m openai/gpt-4o -m gemini/gemini-2.5-pro
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long, global = true)]
    pub show_config: bool,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API (the default when no command is given)
    Serve {
        /// Address to bind (overrides [server] host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides [server] port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run one debate in this terminal
    Debate {
        /// The question to debate
        question: String,

        /// Debater as provider/model (give exactly two, or none for the defaults)
        #[arg(short, long = "model", value_name = "PROVIDER/MODEL")]
        models: Vec<String>,

        /// Number of rounds, the opening round included
        #[arg(short, long, value_name = "N")]
        rounds: Option<u32>,

        /// Print each answer when it is complete instead of streaming it
        #[arg(long)]
        no_stream: bool,
    },

    /// List the models available for debates
    Models,
}

impl Cli {
    /// The subcommand to run, `serve` when none was given
    pub fn action(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            host: None,
            port: None,
        })
    }
}

/// Parse `-m provider/model` flags. An empty list means "use the defaults".
pub fn parse_agents(models: &[String]) -> Result<Option<Vec<AgentSpec>>, DomainError> {
    if models.is_empty() {
        return Ok(None);
    }
    models
        .iter()
        .map(|m| m.parse::<AgentSpec>())
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
