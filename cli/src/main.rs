//! CLI entrypoint for Agent Battle
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use battle_application::{
    CreateDebateInput, NoTranscriptLogger, SessionRegistry, TranscriptLogger,
};
use battle_domain::{ModelCatalog, SessionStatus};
use battle_infrastructure::{
    ConfigLoader, FileConfig, FileServerConfig, JsonlTranscriptLogger, RoutingClient,
    build_catalog,
};
use battle_presentation::{AppState, Cli, Command, ConsoleRenderer, format_catalog, parse_agents};
use clap::Parser;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_tracing(cli.verbose, cli.log_dir.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    info!("Starting Agent Battle");

    // === Dependency Injection ===
    let client = Arc::new(RoutingClient::from_settings(config.providers.to_settings()));
    let available = client.available_providers();
    if available.is_empty() {
        warn!(
            "No provider API key configured; set OPENAI_API_KEY, GOOGLE_API_KEY or ANTHROPIC_API_KEY"
        );
    }
    let catalog = Arc::new(build_catalog(&config.catalog, &available)?);
    let registry = Arc::new(
        SessionRegistry::new(client, catalog.clone())
            .with_settings(config.debate.to_settings()?)
            .with_policy(config.sessions.to_policy()?)
            .with_logger(transcript_logger(&config)),
    );

    match cli.action() {
        Command::Serve { host, port } => serve(registry, &config.server, host, port).await,
        Command::Debate {
            question,
            models,
            rounds,
            no_stream,
        } => {
            let mut input = CreateDebateInput::new(question);
            input.max_rounds = rounds;
            input.agents = parse_agents(&models)?;
            if no_stream {
                input.streaming = Some(false);
            }
            run_debate(registry, catalog, input).await
        }
        Command::Models => {
            print!("{}", format_catalog(&catalog));
            Ok(())
        }
    }
}

/// Log to stderr, and to a daily rolling file when `log_dir` is set.
///
/// The returned guard flushes the file writer on drop.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "agent-battle.log"));
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();
    Ok(Some(guard))
}

fn transcript_logger(config: &FileConfig) -> Arc<dyn TranscriptLogger> {
    let Some(dir) = &config.logging.transcript_dir else {
        return Arc::new(NoTranscriptLogger);
    };
    match JsonlTranscriptLogger::new(dir) {
        Some(logger) => {
            info!("Writing debate transcripts to {}", logger.dir().display());
            Arc::new(logger)
        }
        None => Arc::new(NoTranscriptLogger),
    }
}

async fn serve(
    registry: Arc<SessionRegistry>,
    server: &FileServerConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let host = host.unwrap_or_else(|| server.host.clone());
    let port = port.unwrap_or(server.port);
    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Could not bind {}:{}", host, port))?;

    let shutdown = CancellationToken::new();
    let reaper = registry.spawn_reaper(shutdown.clone());
    let state = AppState::new(registry.clone())
        .with_keep_alive(Duration::from_secs(server.keep_alive_seconds.max(1)))
        .with_cors_origins(server.cors_origins.clone());
    let mut server_task = tokio::spawn(battle_presentation::serve(
        listener,
        state,
        shutdown.clone(),
    ));

    tokio::select! {
        result = &mut server_task => {
            shutdown.cancel();
            result??;
            bail!("HTTP server exited unexpectedly");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Could not listen for Ctrl-C")?;
        }
    }

    // Running debates emit debate_end, which lets their SSE responses finish
    let stopped = registry.stop_all();
    info!("Shutting down ({} running session(s) stopped)", stopped);
    shutdown.cancel();
    server_task.await??;
    reaper.await?;
    Ok(())
}

async fn run_debate(
    registry: Arc<SessionRegistry>,
    catalog: Arc<ModelCatalog>,
    input: CreateDebateInput,
) -> Result<()> {
    let session = registry.create(input)?;
    let renderer = ConsoleRenderer::new(catalog);
    print!(
        "{}",
        renderer.header(
            session.question().content(),
            &session.config().agents,
            session.config().max_rounds,
        )
    );

    let mut events = registry.attach_subscriber(session.id())?;
    let mut stdout = std::io::stdout();
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                if let Some(text) = renderer.render(&event) {
                    print!("{}", text);
                    stdout.flush()?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C: stopping debate {}", session.id());
                registry.stop(session.id());
            }
        }
    }

    let finished = registry.get(session.id())?;
    if finished.status() == SessionStatus::Errored {
        bail!(
            "Debate failed: {}",
            finished.error().unwrap_or("unknown error")
        );
    }
    Ok(())
}
