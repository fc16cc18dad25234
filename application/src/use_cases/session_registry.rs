//! Session registry
//!
//! The single owner of the id → session map. Creating a session stores a
//! not-yet-started state machine; the first subscriber starts it, so that
//! subscriber sees every event from `round_start(0)` on. Later subscribers
//! join from wherever the debate currently is; a subscriber that attaches
//! after the debate ended gets its closing event replayed.
//!
//! The map lock is only held for map reads and writes, never across an
//! agent call. Each session's round loop runs in its own task.

use crate::config::{DebateSettings, SessionPolicy};
use crate::ports::agent_client::AgentClient;
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptLogger};
use crate::use_cases::event_publisher::{EventPublisher, EventSubscription};
use crate::use_cases::run_debate::{DebateStateMachine, SharedSession, lock_session};
use battle_domain::{
    AgentSpec, DebateConfig, DomainError, ModelCatalog, Question, Session, SessionId,
    SessionStatus, StreamEvent,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors returned by registry operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid debate request: {0}")]
    Validation(#[from] DomainError),

    #[error("Session not found: {0}")]
    NotFound(SessionId),
}

/// Input for creating a debate session
#[derive(Debug, Clone, Default)]
pub struct CreateDebateInput {
    pub question: String,
    /// Client-proposed id; blank means "generate one"
    pub session_id: Option<String>,
    pub max_rounds: Option<u32>,
    /// Exactly two agents when present
    pub agents: Option<Vec<AgentSpec>>,
    pub streaming: Option<bool>,
}

impl CreateDebateInput {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }

    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    pub fn with_agents(mut self, agents: Vec<AgentSpec>) -> Self {
        self.agents = Some(agents);
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = Some(streaming);
        self
    }
}

/// Result of a stop request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopOutcome {
    /// The debate was told to stop and will emit `debate_end`
    Stopping,
    /// The session was never started and is now stopped
    Stopped,
    /// Nothing to do: the session had already finished
    AlreadyTerminal,
    NotFound,
}

/// Short listing entry for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub current_round: u32,
    pub max_rounds: u32,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
}

/// What a sweep did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Sessions told to stop for being idle
    pub stopped: Vec<SessionId>,
    /// Terminal sessions removed from the registry
    pub evicted: Vec<SessionId>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.stopped.is_empty() && self.evicted.is_empty()
    }
}

/// A state machine that has been built but not spawned
struct PendingLaunch {
    machine: DebateStateMachine,
    events: mpsc::UnboundedReceiver<StreamEvent>,
}

struct SessionEntry {
    session: SharedSession,
    publisher: EventPublisher,
    cancel: CancellationToken,
    launch: Option<PendingLaunch>,
}

impl SessionEntry {
    /// Stop a session that was never started: no events, publisher closed
    fn stop_unstarted(&mut self) -> bool {
        if self.launch.take().is_none() {
            return false;
        }
        self.cancel.cancel();
        lock_session(&self.session).stop();
        self.publisher.close();
        true
    }
}

/// Registry of live debate sessions
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, SessionEntry>>,
    client: Arc<dyn AgentClient>,
    catalog: Arc<ModelCatalog>,
    settings: DebateSettings,
    policy: SessionPolicy,
    logger: Arc<dyn TranscriptLogger>,
}

impl SessionRegistry {
    pub fn new(client: Arc<dyn AgentClient>, catalog: Arc<ModelCatalog>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            client,
            catalog,
            settings: DebateSettings::default(),
            policy: SessionPolicy::default(),
            logger: Arc::new(NoTranscriptLogger),
        }
    }

    pub fn with_settings(mut self, settings: DebateSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_policy(mut self, policy: SessionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn TranscriptLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &DebateSettings {
        &self.settings
    }

    /// Validate a request and store a not-yet-started session.
    ///
    /// Nothing enters the registry when validation fails.
    pub fn create(&self, input: CreateDebateInput) -> Result<Session, RegistryError> {
        let question = Question::parse(input.question)?;
        let config = DebateConfig::new(
            input
                .agents
                .unwrap_or_else(|| self.settings.default_agents.clone()),
            input.max_rounds.unwrap_or(self.settings.default_max_rounds),
        )
        .with_critique_target(self.settings.critique_target)
        .with_streaming(input.streaming.unwrap_or(true));
        config.validate(&self.catalog, self.settings.max_rounds_limit)?;

        let session_id = match input.session_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => SessionId::from(id),
            _ => SessionId::new(),
        };

        let session = Session::new(session_id.clone(), question, config);
        let snapshot = session.clone();
        let shared: SharedSession = Arc::new(Mutex::new(session));

        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let machine =
            DebateStateMachine::new(shared.clone(), self.client.clone(), tx, cancel.clone())
                .with_catalog(self.catalog.clone())
                .with_settings(self.settings.clone())
                .with_logger(self.logger.clone());

        let entry = SessionEntry {
            session: shared,
            publisher: EventPublisher::new(session_id.clone()),
            cancel,
            launch: Some(PendingLaunch {
                machine,
                events: rx,
            }),
        };

        {
            let mut sessions = self.lock();
            if sessions.contains_key(&session_id) {
                return Err(DomainError::DuplicateSessionId(session_id.to_string()).into());
            }
            sessions.insert(session_id.clone(), entry);
        }

        info!(
            "Created session {} ({} rounds)",
            session_id,
            snapshot.config().max_rounds
        );
        Ok(snapshot)
    }

    /// Subscribe to a session's events, starting the debate on first attach.
    ///
    /// Attaching to a session that already finished but has not been evicted
    /// yields a subscription carrying only its `debate_end` or `error`.
    pub fn attach_subscriber(&self, id: &SessionId) -> Result<EventSubscription, RegistryError> {
        let (subscription, launch, publisher) = {
            let mut sessions = self.lock();
            let entry = sessions
                .get_mut(id)
                .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
            let closing = {
                let mut session = lock_session(&entry.session);
                session.touch();
                session.closing_event()
            };
            if let Some(event) = closing {
                debug!("Session {} already ended; replaying {}", id, event.event_type());
                return Ok(EventSubscription::replay(id.clone(), event));
            }
            // Subscribe before launching so the first subscriber misses nothing
            let subscription = entry.publisher.subscribe();
            (subscription, entry.launch.take(), entry.publisher.clone())
        };

        match launch {
            Some(PendingLaunch { machine, events }) => {
                info!("Starting session {} on first subscriber", id);
                publisher.spawn_pump(events);
                let session_id = id.clone();
                tokio::spawn(async move {
                    let status = machine.run().await;
                    debug!("Session {} task finished: {}", session_id, status);
                });
            }
            None => {
                debug!(
                    "Subscriber joined session {} ({} attached)",
                    id,
                    publisher.subscriber_count()
                );
            }
        }
        Ok(subscription)
    }

    /// Request a stop. Idempotent; unknown ids are reported, not an error.
    pub fn stop(&self, id: &SessionId) -> StopOutcome {
        let mut sessions = self.lock();
        let Some(entry) = sessions.get_mut(id) else {
            debug!("Stop requested for unknown session {}", id);
            return StopOutcome::NotFound;
        };

        if lock_session(&entry.session).status().is_terminal() {
            return StopOutcome::AlreadyTerminal;
        }
        if entry.stop_unstarted() {
            info!("Stopped session {} before it started", id);
            return StopOutcome::Stopped;
        }
        info!("Stop requested for session {}", id);
        entry.cancel.cancel();
        StopOutcome::Stopping
    }

    /// Stop every session, e.g. on server shutdown
    pub fn stop_all(&self) -> usize {
        let mut sessions = self.lock();
        let mut stopped = 0;
        for entry in sessions.values_mut() {
            if lock_session(&entry.session).status().is_terminal() {
                continue;
            }
            if !entry.stop_unstarted() {
                entry.cancel.cancel();
            }
            stopped += 1;
        }
        stopped
    }

    /// Read-only snapshot of one session
    pub fn get(&self, id: &SessionId) -> Result<Session, RegistryError> {
        let sessions = self.lock();
        let entry = sessions
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        Ok(lock_session(&entry.session).clone())
    }

    /// Summaries of every registered session, oldest first
    pub fn list(&self) -> Vec<SessionSummary> {
        let sessions = self.lock();
        let mut summaries: Vec<SessionSummary> = sessions
            .values()
            .map(|entry| {
                let session = lock_session(&entry.session);
                SessionSummary {
                    session_id: session.id().clone(),
                    status: session.status(),
                    current_round: session.current_round(),
                    max_rounds: session.config().max_rounds,
                    message_count: session.transcript().len(),
                    created_at: session.created_at(),
                }
            })
            .collect();
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        summaries
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Apply the session policy as of `now`.
    ///
    /// - never-subscribed sessions older than `idle_timeout` are stopped
    /// - running sessions quiet for `activity_timeout` are told to stop
    /// - terminal sessions quiet for `terminal_retention` are evicted
    pub fn sweep(&self, now: DateTime<Utc>) -> SweepReport {
        let idle = to_chrono(self.policy.idle_timeout);
        let inactive = to_chrono(self.policy.activity_timeout);
        let retention = to_chrono(self.policy.terminal_retention);

        let mut report = SweepReport::default();
        let mut sessions = self.lock();
        for (id, entry) in sessions.iter_mut() {
            let (status, created_at, last_activity) = {
                let session = lock_session(&entry.session);
                (session.status(), session.created_at(), session.last_activity())
            };

            if status.is_terminal() {
                if now - last_activity >= retention {
                    report.evicted.push(id.clone());
                }
            } else if entry.launch.is_some() {
                if now - created_at >= idle && entry.stop_unstarted() {
                    report.stopped.push(id.clone());
                }
            } else if now - last_activity >= inactive && !entry.cancel.is_cancelled() {
                entry.cancel.cancel();
                report.stopped.push(id.clone());
            }
        }
        for id in &report.evicted {
            if let Some(entry) = sessions.remove(id) {
                entry.publisher.close();
            }
        }
        drop(sessions);

        if !report.is_empty() {
            info!(
                "Session sweep: {} stopped, {} evicted",
                report.stopped.len(),
                report.evicted.len()
            );
        }
        report
    }

    /// Run [`sweep`](Self::sweep) every `sweep_interval` until `shutdown` fires.
    pub fn spawn_reaper(self: &Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        let period = registry.policy.sweep_interval.max(Duration::from_millis(10));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        registry.sweep(Utc::now());
                    }
                }
            }
            debug!("Session reaper stopped");
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(|poisoned| {
            warn!("Session map lock was poisoned; recovering");
            poisoned.into_inner()
        })
    }
}

fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::agent_client::{AdapterError, StreamHandle};
    use async_trait::async_trait;
    use battle_domain::{EndReason, GenerationEvent, ModelInfo, Provider};

    /// Answers every prompt with one fixed fragment
    struct EchoClient;

    #[async_trait]
    impl AgentClient for EchoClient {
        async fn stream(&self, agent: &AgentSpec, _prompt: &str) -> Result<StreamHandle, AdapterError> {
            Ok(StreamHandle::from_text(format!("{} says hi", agent.model_id)))
        }
    }

    /// Streams `deltas` one-word fragments per turn
    struct ChattyClient {
        deltas: usize,
    }

    #[async_trait]
    impl AgentClient for ChattyClient {
        async fn stream(&self, _: &AgentSpec, _: &str) -> Result<StreamHandle, AdapterError> {
            let (tx, rx) = mpsc::channel(self.deltas + 1);
            for i in 0..self.deltas {
                tx.try_send(GenerationEvent::Delta(format!("w{} ", i))).unwrap();
            }
            tx.try_send(GenerationEvent::Completed(String::new())).unwrap();
            Ok(StreamHandle::new(rx))
        }
    }

    /// Refuses every call
    struct FailingClient;

    #[async_trait]
    impl AgentClient for FailingClient {
        async fn stream(&self, _: &AgentSpec, _: &str) -> Result<StreamHandle, AdapterError> {
            Err(AdapterError::ConnectionError("refused".into()))
        }
    }

    /// Never answers
    struct SilentClient;

    #[async_trait]
    impl AgentClient for SilentClient {
        async fn stream(&self, _: &AgentSpec, _: &str) -> Result<StreamHandle, AdapterError> {
            std::future::pending().await
        }
    }

    fn catalog() -> Arc<ModelCatalog> {
        let mut catalog = ModelCatalog::empty();
        catalog.insert(Provider::OpenAi, ModelInfo::new("gpt-x", "GPT X", ""));
        catalog.insert(Provider::Gemini, ModelInfo::new("flash-y", "Flash Y", ""));
        Arc::new(catalog)
    }

    fn agents() -> Vec<AgentSpec> {
        vec![
            AgentSpec::new(Provider::OpenAi, "gpt-x"),
            AgentSpec::new(Provider::Gemini, "flash-y"),
        ]
    }

    fn registry(client: Arc<dyn AgentClient>) -> SessionRegistry {
        SessionRegistry::new(client, catalog()).with_settings(
            DebateSettings::default()
                .with_default_agents(agents())
                .with_inter_round_delay(Duration::ZERO),
        )
    }

    async fn collect(mut subscription: EventSubscription) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while let Some(event) = subscription.recv().await {
            events.push(event);
        }
        events
    }

    // ==================== create ====================

    #[test]
    fn test_create_applies_defaults() {
        let registry = registry(Arc::new(EchoClient));
        let session = registry.create(CreateDebateInput::new("  Is P=NP?  ")).unwrap();

        assert_eq!(session.status(), SessionStatus::Pending);
        assert_eq!(session.question().content(), "Is P=NP?");
        assert_eq!(session.config().max_rounds, 5);
        assert_eq!(session.config().agents, agents());
        assert!(session.config().streaming);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_create_rejects_invalid_requests() {
        let registry = registry(Arc::new(EchoClient));

        let err = registry.create(CreateDebateInput::new("   ")).unwrap_err();
        assert!(matches!(err, RegistryError::Validation(DomainError::InvalidQuestion(_))));

        let err = registry
            .create(CreateDebateInput::new("q").with_max_rounds(0))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation(DomainError::InvalidMaxRounds { .. })
        ));

        let err = registry
            .create(CreateDebateInput::new("q").with_agents(vec![agents()[0].clone()]))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation(DomainError::InvalidAgentCount { actual: 1, .. })
        ));

        let err = registry
            .create(CreateDebateInput::new("q").with_agents(vec![
                AgentSpec::new(Provider::OpenAi, "gpt-x"),
                AgentSpec::new(Provider::Gemini, "not-a-model"),
            ]))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation(DomainError::UnknownModel { .. })
        ));

        assert!(registry.is_empty());
    }

    #[test]
    fn test_create_honors_proposed_id_and_rejects_duplicates() {
        let registry = registry(Arc::new(EchoClient));
        let session = registry
            .create(CreateDebateInput::new("q").with_session_id("abc"))
            .unwrap();
        assert_eq!(session.id().as_str(), "abc");

        let err = registry
            .create(CreateDebateInput::new("q").with_session_id("abc"))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Validation(DomainError::DuplicateSessionId("abc".into()))
        );

        let generated = registry
            .create(CreateDebateInput::new("q").with_session_id("  "))
            .unwrap();
        assert_ne!(generated.id().as_str().trim(), "");
        assert_eq!(registry.len(), 2);
    }

    // ==================== attach / run ====================

    #[tokio::test]
    async fn test_first_subscriber_sees_whole_debate() {
        let registry = registry(Arc::new(EchoClient));
        let id = registry
            .create(CreateDebateInput::new("Is P=NP?").with_max_rounds(2))
            .unwrap()
            .id()
            .clone();

        let events = collect(registry.attach_subscriber(&id).unwrap()).await;

        assert_eq!(
            events.first(),
            Some(&StreamEvent::RoundStart {
                round: 0,
                max_rounds: 2
            })
        );
        assert_eq!(
            events.last(),
            Some(&StreamEvent::DebateEnd {
                reason: EndReason::Completed
            })
        );

        let session = registry.get(&id).unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.transcript().len(), 4);
    }

    #[tokio::test]
    async fn test_attach_unknown_session_is_not_found() {
        let registry = registry(Arc::new(EchoClient));
        let missing = SessionId::from("missing");
        assert_eq!(
            registry.attach_subscriber(&missing).err(),
            Some(RegistryError::NotFound(missing.clone()))
        );
        assert_eq!(
            registry.get(&missing).unwrap_err(),
            RegistryError::NotFound(missing)
        );
    }

    #[tokio::test]
    async fn test_attach_after_finish_replays_closing_event() {
        let registry = registry(Arc::new(EchoClient));
        let id = registry
            .create(CreateDebateInput::new("q").with_max_rounds(1))
            .unwrap()
            .id()
            .clone();
        collect(registry.attach_subscriber(&id).unwrap()).await;

        let late = collect(registry.attach_subscriber(&id).unwrap()).await;
        assert_eq!(
            late,
            vec![StreamEvent::DebateEnd {
                reason: EndReason::Completed
            }]
        );
    }

    #[tokio::test]
    async fn test_attach_after_failure_replays_error() {
        let registry = registry(Arc::new(FailingClient));
        let id = registry.create(CreateDebateInput::new("q")).unwrap().id().clone();
        let first = collect(registry.attach_subscriber(&id).unwrap()).await;
        let Some(StreamEvent::Error { message }) = first.last() else {
            panic!("expected error, got {:?}", first.last());
        };

        let late = collect(registry.attach_subscriber(&id).unwrap()).await;
        assert_eq!(
            late,
            vec![StreamEvent::Error {
                message: message.clone()
            }]
        );
    }

    #[tokio::test]
    async fn test_slow_subscriber_receives_every_chunk() {
        let registry = registry(Arc::new(ChattyClient { deltas: 200 }));
        let id = registry
            .create(CreateDebateInput::new("q").with_max_rounds(1))
            .unwrap()
            .id()
            .clone();
        let subscription = registry.attach_subscriber(&id).unwrap();

        // Read nothing until the debate is over
        while !registry.get(&id).unwrap().status().is_terminal() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let events = collect(subscription).await;

        let chunks = events
            .iter()
            .filter(|e| matches!(e, StreamEvent::StreamChunk { .. }))
            .count();
        assert_eq!(chunks, 400);
        assert_eq!(
            events.first(),
            Some(&StreamEvent::RoundStart {
                round: 0,
                max_rounds: 1
            })
        );
        assert_eq!(
            events.last(),
            Some(&StreamEvent::DebateEnd {
                reason: EndReason::Completed
            })
        );
    }

    // ==================== stop ====================

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let registry = registry(Arc::new(SilentClient));
        let id = registry.create(CreateDebateInput::new("q")).unwrap().id().clone();
        let subscription = registry.attach_subscriber(&id).unwrap();

        assert_eq!(registry.stop(&id), StopOutcome::Stopping);
        let events = collect(subscription).await;
        assert_eq!(
            events.last(),
            Some(&StreamEvent::DebateEnd {
                reason: EndReason::Stopped
            })
        );
        assert_eq!(registry.get(&id).unwrap().status(), SessionStatus::Stopped);

        assert_eq!(registry.stop(&id), StopOutcome::AlreadyTerminal);
        assert_eq!(registry.stop(&SessionId::from("nope")), StopOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_stop_before_any_subscriber() {
        let registry = registry(Arc::new(EchoClient));
        let id = registry.create(CreateDebateInput::new("q")).unwrap().id().clone();

        assert_eq!(registry.stop(&id), StopOutcome::Stopped);
        assert_eq!(registry.get(&id).unwrap().status(), SessionStatus::Stopped);

        // the debate never runs
        let events = collect(registry.attach_subscriber(&id).unwrap()).await;
        assert_eq!(
            events,
            vec![StreamEvent::DebateEnd {
                reason: EndReason::Stopped
            }]
        );
        assert!(registry.get(&id).unwrap().transcript().is_empty());
    }

    #[tokio::test]
    async fn test_stop_all() {
        let registry = registry(Arc::new(SilentClient));
        let running = registry.create(CreateDebateInput::new("a")).unwrap().id().clone();
        let pending = registry.create(CreateDebateInput::new("b")).unwrap().id().clone();
        let subscription = registry.attach_subscriber(&running).unwrap();

        assert_eq!(registry.stop_all(), 2);
        collect(subscription).await;
        assert_eq!(registry.get(&running).unwrap().status(), SessionStatus::Stopped);
        assert_eq!(registry.get(&pending).unwrap().status(), SessionStatus::Stopped);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = registry(Arc::new(EchoClient));
        let a = registry
            .create(CreateDebateInput::new("first").with_max_rounds(1))
            .unwrap()
            .id()
            .clone();
        let b = registry
            .create(CreateDebateInput::new("second").with_max_rounds(2))
            .unwrap()
            .id()
            .clone();

        let sub_a = registry.attach_subscriber(&a).unwrap();
        let sub_b = registry.attach_subscriber(&b).unwrap();
        registry.stop(&a);
        let (_, events_b) = tokio::join!(collect(sub_a), collect(sub_b));

        assert_eq!(
            events_b.last(),
            Some(&StreamEvent::DebateEnd {
                reason: EndReason::Completed
            })
        );
        assert_eq!(registry.get(&b).unwrap().transcript().len(), 4);
    }

    // ==================== sweep ====================

    #[test]
    fn test_sweep_stops_idle_pending_sessions() {
        let registry = registry(Arc::new(EchoClient));
        let id = registry.create(CreateDebateInput::new("q")).unwrap().id().clone();

        let report = registry.sweep(Utc::now());
        assert!(report.is_empty());

        let later = Utc::now() + chrono::Duration::seconds(301);
        let report = registry.sweep(later);
        assert_eq!(report.stopped, vec![id.clone()]);
        assert_eq!(registry.get(&id).unwrap().status(), SessionStatus::Stopped);
    }

    #[test]
    fn test_sweep_evicts_terminal_sessions_after_retention() {
        let registry = registry(Arc::new(EchoClient));
        let id = registry.create(CreateDebateInput::new("q")).unwrap().id().clone();
        registry.stop(&id);

        assert!(registry.sweep(Utc::now()).evicted.is_empty());
        let later = Utc::now() + chrono::Duration::seconds(301);
        let report = registry.sweep(later);
        assert_eq!(report.evicted, vec![id.clone()]);
        assert_eq!(registry.get(&id).unwrap_err(), RegistryError::NotFound(id));
    }

    #[tokio::test]
    async fn test_sweep_cancels_inactive_running_session() {
        let registry = registry(Arc::new(SilentClient));
        let id = registry.create(CreateDebateInput::new("q")).unwrap().id().clone();
        let subscription = registry.attach_subscriber(&id).unwrap();

        let later = Utc::now() + chrono::Duration::seconds(601);
        assert_eq!(registry.sweep(later).stopped, vec![id.clone()]);
        let events = collect(subscription).await;
        assert!(matches!(
            events.last(),
            Some(StreamEvent::DebateEnd {
                reason: EndReason::Stopped
            })
        ));
    }

    #[test]
    fn test_list_reports_summaries() {
        let registry = registry(Arc::new(EchoClient));
        registry.create(CreateDebateInput::new("a").with_max_rounds(3)).unwrap();
        let summaries = registry.list();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].status, SessionStatus::Pending);
        assert_eq!(summaries[0].max_rounds, 3);
        assert_eq!(summaries[0].message_count, 0);
    }
}
