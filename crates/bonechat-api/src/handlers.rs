//! Route handler functions for all API endpoints.
//!
//! Each handler resolves the session from the path, drives the chat
//! orchestrator and returns JSON. Submissions run on their own task so a
//! dropped HTTP connection cannot cancel a call that is already dispatched.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bonechat_chat::{ConversationSnapshot, SessionSummary};
use bonechat_core::types::ChatEntry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub sessions: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Entries appended by one submission, in order.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub entries: Vec<ChatEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub entries: Vec<ChatEntry>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        sessions: state.sessions.len(),
    })
}

/// POST /sessions
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let id = state.sessions.create();
    (StatusCode::CREATED, Json(SessionCreatedResponse { id }))
}

/// GET /sessions
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionsResponse> {
    Json(SessionsResponse {
        sessions: state.sessions.list(),
    })
}

/// GET /sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationSnapshot>, ApiError> {
    let orchestrator = state.sessions.get(id)?;
    Ok(Json(orchestrator.snapshot()))
}

/// DELETE /sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /sessions/{id}/restart
pub async fn restart_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationSnapshot>, ApiError> {
    let orchestrator = state.sessions.get(id)?;
    orchestrator.restart();
    Ok(Json(orchestrator.snapshot()))
}

/// POST /sessions/{id}/image - raw image bytes in the request body.
pub async fn submit_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, ApiError> {
    let orchestrator = state.sessions.get(id)?;
    tracing::debug!(session_id = %id, bytes = body.len(), "Image submitted");

    let entries = tokio::spawn(async move { orchestrator.submit_image(&body).await })
        .await
        .map_err(|e| ApiError::Internal(format!("image task failed: {}", e)))??;

    Ok(Json(SubmitResponse { entries }))
}

/// POST /sessions/{id}/text - `{"text": "..."}`.
pub async fn submit_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TextRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let orchestrator = state.sessions.get(id)?;
    tracing::debug!(session_id = %id, "Text submitted");

    let entries = tokio::spawn(async move { orchestrator.submit_text(&request.text).await })
        .await
        .map_err(|e| ApiError::Internal(format!("text task failed: {}", e)))?;

    Ok(Json(SubmitResponse { entries }))
}

/// GET /sessions/{id}/transcript
pub async fn transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TranscriptResponse>, ApiError> {
    let orchestrator = state.sessions.get(id)?;
    Ok(Json(TranscriptResponse {
        entries: orchestrator.transcript().all(),
    }))
}
