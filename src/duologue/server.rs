//! HTTP front door powered by axum.
//!
//! Serves:
//! - `POST /chat`: both agents answer the same conversation
//! - `POST /debate`: the agents debate a topic
//! - `GET  /health`: liveness plus credential suffixes
//! - `GET  /personas`: the built-in persona table
//!
//! Invalid input is answered with `400 {"error": "ValidationError", "detail": ...}`
//! before any provider is called. Provider failures are not HTTP errors: the failing
//! agent's text field carries the rendered error and the status stays 200.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::client_wrapper::ClientWrapper;
use crate::clients::deepseek::DeepSeekClient;
use crate::clients::openai::OpenAIClient;
use crate::duologue::agent::Agent;
use crate::duologue::config::DuologueConfig;
use crate::duologue::debate::Debate;
use crate::duologue::dual_chat::dual_chat;
use crate::duologue::event::{EventHandler, LoggingEventHandler};
use crate::duologue::interaction_log::InteractionLog;
use crate::duologue::persona::{
    Persona, DRAGON_NAME, DRAGON_STYLE, PEACH_NAME, PEACH_STYLE, PERSONAS,
};
use crate::duologue::request::{
    ChatRequest, ChatResponse, DebateRequest, DebateResponse, ErrorResponse, HealthResponse,
    ValidationError,
};

/// Shared, read-only state of the server.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DuologueConfig>,
    /// Provider behind Peach.
    pub peach: Arc<dyn ClientWrapper>,
    /// Provider behind Dragon.
    pub dragon: Arc<dyn ClientWrapper>,
    pub interaction_log: Option<Arc<InteractionLog>>,
    pub event_handler: Arc<dyn EventHandler>,
}

impl AppState {
    /// State wired to OpenAI (Peach) and DeepSeek (Dragon) as described by `config`.
    pub fn from_config(config: DuologueConfig) -> Self {
        let peach: Arc<dyn ClientWrapper> = Arc::new(OpenAIClient::from_config(&config));
        let dragon: Arc<dyn ClientWrapper> = Arc::new(DeepSeekClient::from_config(&config));
        let interaction_log = config
            .interaction_log
            .as_ref()
            .map(|path| Arc::new(InteractionLog::new(path.clone())));
        AppState {
            config: Arc::new(config),
            peach,
            dragon,
            interaction_log,
            event_handler: Arc::new(LoggingEventHandler),
        }
    }

    /// State over arbitrary providers. No interaction log.
    pub fn new(
        config: DuologueConfig,
        peach: Arc<dyn ClientWrapper>,
        dragon: Arc<dyn ClientWrapper>,
    ) -> Self {
        AppState {
            config: Arc::new(config),
            peach,
            dragon,
            interaction_log: None,
            event_handler: Arc::new(LoggingEventHandler),
        }
    }

    pub fn with_interaction_log(mut self, log: InteractionLog) -> Self {
        self.interaction_log = Some(Arc::new(log));
        self
    }

    async fn record<I: Serialize, O: Serialize>(&self, operation: &str, input: &I, output: &O) {
        if let Some(log) = &self.interaction_log {
            let input = serde_json::to_value(input).unwrap_or(serde_json::Value::Null);
            let output = serde_json::to_value(output).unwrap_or(serde_json::Value::Null);
            log.record(operation, &input, &output).await;
        }
    }
}

/// Build the router. CORS is fully permissive.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/debate", post(debate))
        .route("/health", get(health))
        .route("/personas", get(personas))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn start_server(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    log::info!("duologue listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("could not install Ctrl-C handler: {}", err);
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}

fn reject(err: ValidationError) -> Response {
    log::warn!("rejected request: {}", err);
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(&err))).into_response()
}

fn agent(
    name: &str,
    client: &Arc<dyn ClientWrapper>,
    persona: &str,
    model: Option<&str>,
    temperature: f32,
) -> Agent {
    Agent::new(name, client.clone())
        .with_persona(persona)
        .with_model(model.unwrap_or(""))
        .with_temperature(temperature)
}

async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return reject(ValidationError::MalformedBody(rejection.body_text())),
    };
    let history = match req.validate() {
        Ok(history) => history,
        Err(err) => return reject(err),
    };

    let peach = agent(
        PEACH_NAME,
        &state.peach,
        req.persona_peach.as_deref().unwrap_or(""),
        req.model_peach.as_deref(),
        req.temperature,
    )
    .with_style(PEACH_STYLE);
    let dragon = agent(
        DRAGON_NAME,
        &state.dragon,
        req.persona_dragon.as_deref().unwrap_or(""),
        req.model_dragon.as_deref(),
        req.temperature,
    )
    .with_style(DRAGON_STYLE);

    let reply = match dual_chat(&history, &peach, &dragon).await {
        Ok(reply) => reply,
        Err(err) => return reject(err),
    };
    let response = ChatResponse {
        timestamp: Utc::now(),
        peach: reply.agent_a.render(&peach.name),
        dragon: reply.agent_b.render(&dragon.name),
    };

    state.record("chat", &req, &response).await;
    (StatusCode::OK, Json(response)).into_response()
}

async fn debate(
    State(state): State<AppState>,
    body: Result<Json<DebateRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return reject(ValidationError::MalformedBody(rejection.body_text())),
    };
    let topic = match req.validate() {
        Ok(topic) => topic,
        Err(err) => return reject(err),
    };

    let peach = agent(
        PEACH_NAME,
        &state.peach,
        &req.persona_peach,
        req.model_peach.as_deref(),
        req.temperature,
    );
    let dragon = agent(
        DRAGON_NAME,
        &state.dragon,
        &req.persona_dragon,
        req.model_dragon.as_deref(),
        req.temperature,
    );

    let transcript = match Debate::new(peach, dragon)
        .with_max_rounds(state.config.max_debate_rounds)
        .with_closing(req.closing)
        .with_event_handler(state.event_handler.clone())
        .run(&topic, req.rounds)
        .await
    {
        Ok(transcript) => transcript,
        Err(err) => return reject(err),
    };
    let response = DebateResponse::from(&transcript);

    state.record("debate", &req, &response).await;
    (StatusCode::OK, Json(response)).into_response()
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        time: Utc::now(),
        openai_key_suffix: state.peach.credential_suffix(),
        deepseek_key_suffix: state.dragon.credential_suffix(),
    })
}

async fn personas() -> Json<&'static [Persona]> {
    Json(PERSONAS)
}
