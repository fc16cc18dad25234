//! Route handlers

use super::error::ApiError;
use super::wire::{
    HealthResponse, ModelsResponse, SessionListResponse, SessionSnapshot, StartDebateRequest,
    StartDebateResponse, StopResponse, WireEvent,
};
use super::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use battle_application::{CreateDebateInput, EventSubscription, StopOutcome};
use battle_domain::{SessionId, StreamEvent};
use futures::Stream;
use std::convert::Infallible;
use tracing::{info, warn};

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

pub async fn models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse::from(state.registry.catalog()))
}

pub async fn list_debates(State(state): State<AppState>) -> Json<SessionListResponse> {
    Json(SessionListResponse {
        sessions: state.registry.list(),
    })
}

pub async fn start_debate(
    State(state): State<AppState>,
    body: Result<Json<StartDebateRequest>, JsonRejection>,
) -> Result<Json<StartDebateResponse>, ApiError> {
    let Json(request) = body?;
    let mut input = CreateDebateInput::new(request.question);
    input.session_id = request.session_id;
    input.max_rounds = request.max_rounds;
    input.streaming = request.streaming;
    if let Some(models) = request.models {
        let agents = models
            .iter()
            .map(|m| m.to_agent())
            .collect::<Result<Vec<_>, _>>()?;
        input.agents = Some(agents);
    }

    let session = state.registry.create(input)?;
    info!(
        "POST /debate/start -> {} ({} rounds)",
        session.id(),
        session.config().max_rounds
    );
    Ok(Json(StartDebateResponse::from(&session)))
}

pub async fn stream_debate(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let subscription = state
        .registry
        .attach_subscriber(&SessionId::from(session_id))?;
    Ok(Sse::new(event_stream(subscription)).keep_alive(KeepAlive::new().interval(state.keep_alive)))
}

pub async fn stop_debate(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<StopResponse> {
    let id = SessionId::from(session_id);
    let outcome = state.registry.stop(&id);
    if outcome == StopOutcome::NotFound {
        info!("Stop requested for unknown session {}", id);
    }
    Json(StopResponse {
        session_id: id.to_string(),
        status: "stopped",
    })
}

pub async fn get_debate(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let session = state.registry.get(&SessionId::from(session_id))?;
    Ok(Json(SessionSnapshot::from(&session)))
}

/// Frame one event as SSE. A payload that fails to serialize is dropped.
pub fn to_sse_event(event: &StreamEvent) -> Option<Event> {
    let wire = WireEvent::from(event);
    match serde_json::to_string(&wire) {
        Ok(data) => Some(Event::default().event(wire.event_type).data(data)),
        Err(e) => {
            warn!("Dropping {} event: {}", wire.event_type, e);
            None
        }
    }
}

fn event_stream(
    subscription: EventSubscription,
) -> impl Stream<Item = Result<Event, Infallible>> {
    futures::stream::unfold(subscription, |mut subscription| async move {
        loop {
            let event = subscription.recv().await?;
            if let Some(frame) = to_sse_event(&event) {
                return Some((Ok(frame), subscription));
            }
        }
    })
}
