//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    CreateSessionResponse, ErrorResponse, OptionsResponse, SessionResponse, SuccessResponse,
    TurnRequest, TurnResponse,
};
use super::AppState;
use crate::conversation::{greeting_message, initial_options, Topic};
use crate::runtime::{SessionError, SseEvent};
use crate::state_machine::Event;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Welcome menu
        .route("/api/options", get(get_options))
        // Session lifecycle
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/reset", post(reset_session))
        // User turns
        .route("/api/sessions/:id/turn", post(submit_turn))
        // SSE streaming
        .route("/api/sessions/:id/stream", get(stream_session))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Welcome Menu
// ============================================================

async fn get_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        greeting: greeting_message().text,
        options: initial_options(),
    })
}

// ============================================================
// Session Lifecycle
// ============================================================

async fn create_session(State(state): State<AppState>) -> Json<CreateSessionResponse> {
    let handle = state.sessions.create_session().await;
    Json(CreateSessionResponse {
        session_id: handle.session_id.clone(),
        session: handle.snapshot(),
    })
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let handle = state.sessions.get(&id).await?;
    Ok(Json(SessionResponse {
        session: handle.snapshot(),
    }))
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.sessions.send_event(&id, Event::Reset).await?;
    Ok(Json(SuccessResponse { success: true }))
}

// ============================================================
// User Turns
// ============================================================

async fn submit_turn(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    // Greeting is the state of a fresh session, never a user choice
    if req.topic == Topic::Greeting {
        return Err(AppError::BadRequest(format!(
            "topic {} is not selectable",
            req.topic
        )));
    }
    state
        .sessions
        .submit_turn(&id, req.text, req.topic, req.first_turn)
        .await?;
    Ok(Json(TurnResponse { queued: true }))
}

// ============================================================
// SSE Streaming
// ============================================================

async fn stream_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let (snapshot, broadcast_rx) = state.sessions.subscribe(&id).await?;
    Ok(sse_stream(SseEvent::Init { snapshot }, broadcast_rx))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("autobot ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound(_) => AppError::NotFound(e.to_string()),
            SessionError::Closed(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
