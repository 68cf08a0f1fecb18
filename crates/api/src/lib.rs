use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dest_agents::{AppConfig, DestinationAgent};
use dest_core::ChatInput;
use dest_storage::MemoryStore;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::error;

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<DestinationAgent<MemoryStore>>,
}

impl ApiState {
    pub fn new(agent: DestinationAgent<MemoryStore>) -> Self {
        Self {
            agent: Arc::new(agent),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    sessions: usize,
}

pub fn build_app(config: &AppConfig) -> Result<Router> {
    let agent = DestinationAgent::from_config(config)?;
    Ok(build_router(ApiState::new(agent)))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/chat", post(chat))
        .route("/v1/sessions/:session_id/messages", get(session_messages))
        .route("/v1/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    // A store that cannot count sessions still answers the probe.
    let sessions = state.agent.session_count().await.unwrap_or_default();
    Json(HealthResponse {
        status: "ok",
        service: "dest-gpt",
        sessions,
    })
}

async fn chat(State(state): State<ApiState>, Json(input): Json<ChatInput>) -> Response {
    if input.text.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "text must not be empty");
    }

    match state.agent.handle_turn(input.session_id, &input.text).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(err) => {
            error!(error = %format!("{err:#}"), "chat turn could not be recorded");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "chat turn failed")
        }
    }
}

async fn session_messages(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.agent.history(&session_id).await {
        Ok(Some(messages)) => Json(messages).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "unknown session"),
        Err(err) => {
            error!(error = %format!("{err:#}"), session_id = %session_id, "history lookup failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "history lookup failed")
        }
    }
}

async fn metrics(State(state): State<ApiState>) -> impl IntoResponse {
    Json(state.agent.metrics())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
