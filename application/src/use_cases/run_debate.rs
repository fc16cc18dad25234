//! Run Debate use case
//!
//! Drives one session through its rounds. Each round is
//! `round_start → agent 0 turn → agent 1 turn → round_end`; the loop ends
//! when every round has run, a stop is requested, or an agent call fails.
//!
//! Cancellation is cooperative. The token is checked before every round and
//! every turn, while waiting for the provider to accept the request, and
//! between fragments. A turn interrupted mid-stream is discarded: no
//! `stream_end` is sent and nothing is appended to the transcript.

use crate::config::DebateSettings;
use crate::ports::agent_client::{AdapterError, AgentClient};
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger};
use battle_domain::{
    AgentSpec, DebateConfig, EndReason, GenerationEvent, Message, MessageId, ModelCatalog,
    PromptTemplate, Session, SessionId, SessionStatus, StreamEvent, TurnScheduler,
};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Session state shared between the state machine and the registry.
pub type SharedSession = Arc<Mutex<Session>>;

/// Lock a shared session, recovering the data if a holder panicked.
pub(crate) fn lock_session(session: &SharedSession) -> std::sync::MutexGuard<'_, Session> {
    session
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Why a turn did not produce a message
#[derive(Debug)]
enum TurnFailure {
    Cancelled,
    Adapter(AdapterError),
}

/// How the round loop ended
#[derive(Debug)]
enum DebateOutcome {
    Completed,
    Stopped,
    Failed(String),
}

/// State machine for one debate session.
///
/// Owns the only writer to the session's event channel, so events come out
/// strictly in the order the round loop produced them.
pub struct DebateStateMachine {
    session: SharedSession,
    client: Arc<dyn AgentClient>,
    catalog: Arc<ModelCatalog>,
    settings: DebateSettings,
    events: mpsc::UnboundedSender<StreamEvent>,
    cancel: CancellationToken,
    logger: Arc<dyn TranscriptLogger>,
}

impl DebateStateMachine {
    pub fn new(
        session: SharedSession,
        client: Arc<dyn AgentClient>,
        events: mpsc::UnboundedSender<StreamEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            session,
            client,
            catalog: Arc::new(ModelCatalog::builtin()),
            settings: DebateSettings::default(),
            events,
            cancel,
            logger: Arc::new(NoTranscriptLogger),
        }
    }

    /// Catalog used to resolve display names in prompts
    pub fn with_catalog(mut self, catalog: Arc<ModelCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_settings(mut self, settings: DebateSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn TranscriptLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Run the debate to a terminal state and return that state.
    ///
    /// A session that already left `Pending` (for example, stopped before
    /// anyone subscribed) is left untouched and no events are emitted.
    pub async fn run(self) -> SessionStatus {
        let (session_id, config, question, started) = {
            let mut session = lock_session(&self.session);
            let started = session.begin();
            (
                session.id().clone(),
                session.config().clone(),
                session.question().content().to_string(),
                started,
            )
        };

        if !started {
            let status = lock_session(&self.session).status();
            debug!("Debate {} not started: already {}", session_id, status);
            return status;
        }

        info!(
            "Starting debate {} with {} rounds ({})",
            session_id,
            config.max_rounds,
            config
                .agents
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(" vs ")
        );
        self.logger.log(
            &session_id,
            TranscriptEvent::new(
                "debate_started",
                serde_json::json!({
                    "question": question,
                    "agents": config.agents,
                    "max_rounds": config.max_rounds,
                    "critique_target": config.critique_target,
                    "streaming": config.streaming,
                }),
            ),
        );

        let outcome = self.run_rounds(&config).await;
        self.finish(&session_id, outcome)
    }

    async fn run_rounds(&self, config: &DebateConfig) -> DebateOutcome {
        for round in 0..config.max_rounds {
            if self.cancel.is_cancelled() {
                return DebateOutcome::Stopped;
            }

            lock_session(&self.session).set_round(round);
            self.emit(StreamEvent::RoundStart {
                round,
                max_rounds: config.max_rounds,
            });

            for agent_index in TurnScheduler::speaking_order(config) {
                if self.cancel.is_cancelled() {
                    return DebateOutcome::Stopped;
                }
                let agent = &config.agents[agent_index];
                match self.run_turn(config, agent, agent_index, round).await {
                    Ok(()) => {}
                    Err(TurnFailure::Cancelled) => {
                        debug!("Turn of {} in round {} cancelled", agent, round);
                        return DebateOutcome::Stopped;
                    }
                    Err(TurnFailure::Adapter(e)) => {
                        warn!("Agent {} failed in round {}: {}", agent, round, e);
                        return DebateOutcome::Failed(format!(
                            "{} ({}) failed in round {}: {}",
                            self.catalog.display_name(agent),
                            agent,
                            round,
                            e
                        ));
                    }
                }
            }

            self.emit(StreamEvent::RoundEnd { round });

            let more_rounds = round + 1 < config.max_rounds;
            if more_rounds && !self.settings.inter_round_delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return DebateOutcome::Stopped,
                    _ = tokio::time::sleep(self.settings.inter_round_delay) => {}
                }
            }
        }
        DebateOutcome::Completed
    }

    /// One agent turn, bounded by the configured turn timeout
    async fn run_turn(
        &self,
        config: &DebateConfig,
        agent: &AgentSpec,
        agent_index: usize,
        round: u32,
    ) -> Result<(), TurnFailure> {
        let prompt = {
            let session = lock_session(&self.session);
            let turn = TurnScheduler::plan(config, session.transcript(), round, agent_index);
            PromptTemplate::for_turn(session.question(), &turn, |a| {
                self.catalog.display_name(a)
            })
        };
        debug!(
            "Round {} turn for {} ({} prompt chars)",
            round,
            agent,
            prompt.chars().count()
        );

        let turn = self.stream_turn(config.streaming, agent, agent_index, round, &prompt);
        match self.settings.turn_timeout {
            Some(limit) => match tokio::time::timeout(limit, turn).await {
                Ok(result) => result,
                Err(_) => Err(TurnFailure::Adapter(AdapterError::Timeout)),
            },
            None => turn.await,
        }
    }

    async fn stream_turn(
        &self,
        streaming: bool,
        agent: &AgentSpec,
        agent_index: usize,
        round: u32,
        prompt: &str,
    ) -> Result<(), TurnFailure> {
        let mut handle = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(TurnFailure::Cancelled),
            result = self.client.stream(agent, prompt) => result.map_err(TurnFailure::Adapter)?,
        };

        let message_id = MessageId::new();
        if streaming {
            self.emit(StreamEvent::StreamStart {
                agent: agent.clone(),
                agent_index,
                message_id: message_id.clone(),
                round,
            });
        }

        let mut content = String::new();
        loop {
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(TurnFailure::Cancelled),
                event = handle.next() => event,
            };

            match event {
                Some(GenerationEvent::Delta(chunk)) => {
                    if chunk.is_empty() {
                        continue;
                    }
                    content.push_str(&chunk);
                    if streaming {
                        self.emit(StreamEvent::StreamChunk {
                            message_id: message_id.clone(),
                            content: chunk,
                        });
                    } else {
                        lock_session(&self.session).touch();
                    }
                }
                Some(GenerationEvent::Completed(full)) => {
                    // Adapters that never sent deltas deliver the whole text here
                    if content.is_empty() && !full.is_empty() {
                        if streaming {
                            self.emit(StreamEvent::StreamChunk {
                                message_id: message_id.clone(),
                                content: full.clone(),
                            });
                        }
                        content = full;
                    }
                    break;
                }
                Some(GenerationEvent::Error(e)) => {
                    return Err(TurnFailure::Adapter(AdapterError::ProviderError(e)));
                }
                None => return Err(TurnFailure::Adapter(AdapterError::StreamClosed)),
            }
        }

        let message = Message::new(message_id.clone(), agent.clone(), agent_index, round, content);
        let session_id = {
            let mut session = lock_session(&self.session);
            session.record(message.clone());
            session.id().clone()
        };
        self.logger.log(
            &session_id,
            TranscriptEvent::new(
                "message",
                serde_json::to_value(&message).unwrap_or_default(),
            ),
        );

        if streaming {
            self.emit(StreamEvent::StreamEnd { message_id });
        } else {
            self.emit(StreamEvent::Message(message));
        }
        Ok(())
    }

    fn finish(&self, session_id: &SessionId, outcome: DebateOutcome) -> SessionStatus {
        let (status, message_count) = {
            let mut session = lock_session(&self.session);
            match &outcome {
                DebateOutcome::Completed => session.complete(),
                DebateOutcome::Stopped => session.stop(),
                DebateOutcome::Failed(error) => session.fail(error.clone()),
            };
            (session.status(), session.transcript().len())
        };

        match outcome {
            DebateOutcome::Completed | DebateOutcome::Stopped => {
                let reason = if status == SessionStatus::Completed {
                    EndReason::Completed
                } else {
                    EndReason::Stopped
                };
                info!(
                    "Debate {} ended ({}) with {} messages",
                    session_id,
                    reason.as_str(),
                    message_count
                );
                self.emit(StreamEvent::DebateEnd { reason });
                self.logger.log(
                    session_id,
                    TranscriptEvent::new(
                        "debate_ended",
                        serde_json::json!({
                            "reason": reason,
                            "message_count": message_count,
                        }),
                    ),
                );
            }
            DebateOutcome::Failed(error) => {
                warn!("Debate {} errored: {}", session_id, error);
                self.logger.log(
                    session_id,
                    TranscriptEvent::new(
                        "debate_failed",
                        serde_json::json!({
                            "error": error,
                            "message_count": message_count,
                        }),
                    ),
                );
                self.emit(StreamEvent::Error { message: error });
            }
        }
        status
    }

    fn emit(&self, event: StreamEvent) {
        lock_session(&self.session).touch();
        if self.events.send(event).is_err() {
            debug!("Event channel closed, event discarded");
        }
    }
}
