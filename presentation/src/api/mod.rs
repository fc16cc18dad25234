//! HTTP API for running debates.
//!
//! | route | handler |
//! |---|---|
//! | `GET /health` | [`handlers::health`] |
//! | `GET /models` | [`handlers::models`] |
//! | `GET /debates` | [`handlers::list_debates`] |
//! | `POST /debate/start` | [`handlers::start_debate`] |
//! | `GET /debate/{id}/stream` | [`handlers::stream_debate`] (SSE) |
//! | `POST /debate/{id}/stop` | [`handlers::stop_debate`] |
//! | `GET /debate/{id}` | [`handlers::get_debate`] |

pub mod error;
pub mod handlers;
pub mod wire;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use battle_application::SessionRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    /// Interval between SSE keep-alive comments
    pub keep_alive: Duration,
    /// Browser origins allowed to call the API
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self {
            registry,
            keep_alive: Duration::from_secs(15),
            cors_origins: Vec::new(),
        }
    }

    pub fn with_keep_alive(mut self, interval: Duration) -> Self {
        self.keep_alive = interval;
        self
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);
    Router::new()
        .route("/health", get(handlers::health))
        .route("/models", get(handlers::models))
        .route("/debates", get(handlers::list_debates))
        .route("/debate/start", post(handlers::start_debate))
        .route("/debate/{id}", get(handlers::get_debate))
        .route("/debate/{id}/stream", get(handlers::stream_debate))
        .route("/debate/{id}/stop", post(handlers::stop_debate))
        .layer(cors)
        .with_state(state)
}

/// CORS for the browser client.
///
/// Listed origins may send credentials. A `"*"` entry allows any origin
/// without credentials. Unparseable origins are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());
    if origins.iter().any(|origin| origin.trim() == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();
    layer
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
}

/// Serve until `shutdown` fires.
///
/// Open event streams end on their own once their debates stop, so callers
/// stop the registry's sessions before cancelling `shutdown`.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use battle_application::{AdapterError, AgentClient, DebateSettings, StreamHandle};
    use battle_domain::{AgentSpec, ModelCatalog};
    use tower::ServiceExt;

    /// Answers every turn at once with "<model> says hi"
    struct InstantClient;

    #[async_trait]
    impl AgentClient for InstantClient {
        async fn stream(
            &self,
            agent: &AgentSpec,
            _prompt: &str,
        ) -> Result<StreamHandle, AdapterError> {
            Ok(StreamHandle::from_text(format!("{} says hi", agent.model_id)))
        }
    }

    const WEB_ORIGIN: &str = "http://localhost:5173";

    fn app() -> (Router, Arc<SessionRegistry>) {
        let registry = Arc::new(
            SessionRegistry::new(Arc::new(InstantClient), Arc::new(ModelCatalog::builtin()))
                .with_settings(
                    DebateSettings::default()
                        .with_default_max_rounds(1)
                        .with_inter_round_delay(Duration::ZERO),
                ),
        );
        let state = AppState::new(registry.clone()).with_cors_origins(vec![WEB_ORIGIN.into()]);
        (router(state), registry)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"status": "healthy"})
        );
    }

    #[tokio::test]
    async fn test_models_lists_catalog() {
        let (app, _) = app();
        let response = app.oneshot(get("/models")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(
            body["available_providers"],
            serde_json::json!(["openai", "gemini", "anthropic"])
        );
        assert_eq!(body["models"]["anthropic"][0]["provider"], "anthropic");
        let openai = body["models"]["openai"].as_array().unwrap();
        assert!(openai.iter().any(|m| m["id"] == "gpt-4.1"));
        assert_eq!(openai[0]["provider"], "openai");
    }

    #[tokio::test]
    async fn test_start_applies_defaults() {
        let (app, registry) = app();
        let response = app
            .oneshot(post_json(
                "/debate/start",
                serde_json::json!({"question": "Is P=NP?", "session_id": "abc"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["session_id"], "abc");
        assert_eq!(body["question"], "Is P=NP?");
        assert_eq!(body["max_rounds"], 1);
        assert_eq!(body["models"][0]["provider"], "openai");
        assert_eq!(body["models"][1]["provider"], "gemini");
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_requests() {
        let (app, registry) = app();
        for body in [
            serde_json::json!({"question": "   "}),
            serde_json::json!({"question": "Q?", "max_rounds": 0}),
            serde_json::json!({"question": "Q?", "models": [
                {"provider": "openai", "model_id": "gpt-4.1"}
            ]}),
            serde_json::json!({"question": "Q?", "models": [
                {"provider": "openai", "model_id": "gpt-4.1"},
                {"provider": "gemini", "model_id": "not-a-model"}
            ]}),
            serde_json::json!({"question": "Q?", "models": [
                {"provider": "openai", "model_id": "gpt-4.1"},
                {"provider": "mistral", "model_id": "large"}
            ]}),
        ] {
            let response = app
                .clone()
                .oneshot(post_json("/debate/start", body.clone()))
                .await
                .unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNPROCESSABLE_ENTITY,
                "{}",
                body
            );
            assert!(body_json(response).await["detail"].is_string());
        }
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_gets_detail() {
        let (app, registry) = app();
        for body in [
            serde_json::json!({"max_rounds": 2}),
            serde_json::json!({"question": "Q?", "max_rounds": -1}),
            serde_json::json!({"question": 42}),
        ] {
            let response = app
                .clone()
                .oneshot(post_json("/debate/start", body.clone()))
                .await
                .unwrap();
            assert_eq!(
                response.status(),
                StatusCode::UNPROCESSABLE_ENTITY,
                "{}",
                body
            );
            let detail = body_json(response).await;
            assert!(detail["detail"].is_string(), "{}", detail);
        }
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_cors_preflight_from_web_client() {
        let (app, _) = app();
        let preflight = Request::builder()
            .method("OPTIONS")
            .uri("/debate/start")
            .header("origin", WEB_ORIGIN)
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(preflight).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], WEB_ORIGIN);
        assert_eq!(headers["access-control-allow-credentials"], "true");
        assert_eq!(headers["access-control-allow-methods"], "POST");

        let foreign = Request::builder()
            .uri("/health")
            .header("origin", "http://evil.test")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(foreign).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn test_stream_unknown_session_is_404() {
        let (app, _) = app();
        let response = app.oneshot(get("/debate/nope/stream")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stream_frames_whole_debate() {
        let (app, _) = app();
        app.clone()
            .oneshot(post_json(
                "/debate/start",
                serde_json::json!({"question": "Is P=NP?", "session_id": "s1"}),
            ))
            .await
            .unwrap();

        let response = app.oneshot(get("/debate/s1/stream")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/event-stream"
        );

        let text = body_text(response).await;
        let kinds: Vec<&str> = text
            .lines()
            .filter_map(|line| line.strip_prefix("event: "))
            .collect();
        assert_eq!(
            kinds,
            vec![
                "round_start",
                "stream_start",
                "stream_chunk",
                "stream_end",
                "stream_start",
                "stream_chunk",
                "stream_end",
                "round_end",
                "debate_end",
            ]
        );

        let payloads: Vec<serde_json::Value> = text
            .lines()
            .filter_map(|line| line.strip_prefix("data: "))
            .map(|data| serde_json::from_str(data).unwrap())
            .collect();
        assert_eq!(payloads[2]["content"], "gpt-4.1 says hi");
        assert_eq!(payloads[8]["reason"], "completed");
    }

    #[tokio::test]
    async fn test_stop_is_idempotent_and_accepts_unknown_ids() {
        let (app, registry) = app();
        app.clone()
            .oneshot(post_json(
                "/debate/start",
                serde_json::json!({"question": "Q?", "session_id": "s1"}),
            ))
            .await
            .unwrap();

        for uri in ["/debate/s1/stop", "/debate/s1/stop", "/debate/ghost/stop"] {
            let response = app.clone().oneshot(post_json(uri, serde_json::json!({}))).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await["status"], "stopped");
        }
        assert_eq!(
            registry.get(&"s1".into()).unwrap().status(),
            battle_domain::SessionStatus::Stopped
        );
    }

    #[tokio::test]
    async fn test_snapshot_after_debate() {
        let (app, _) = app();
        app.clone()
            .oneshot(post_json(
                "/debate/start",
                serde_json::json!({"question": "Q?", "session_id": "s1"}),
            ))
            .await
            .unwrap();
        // Draining the stream runs the debate to completion
        let stream = app.clone().oneshot(get("/debate/s1/stream")).await.unwrap();
        body_text(stream).await;

        let response = app.clone().oneshot(get("/debate/s1")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["status"], "completed");
        assert_eq!(body["messages"].as_array().unwrap().len(), 2);
        assert_eq!(body["messages"][0]["is_critique"], false);

        let missing = app.clone().oneshot(get("/debate/ghost")).await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let listing = body_json(app.oneshot(get("/debates")).await.unwrap()).await;
        assert_eq!(listing["sessions"][0]["session_id"], "s1");
        assert_eq!(listing["sessions"][0]["message_count"], 2);
    }
}
