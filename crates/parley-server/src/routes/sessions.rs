use axum::{
    extract::{Path, State},
    Json,
};
use parley_agent::{SessionStore, Turn};
use serde::Serialize;

use crate::error::{Result, ServerError};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionList {
    pub sessions: Vec<String>,
}

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub turns: Vec<Turn>,
}

#[derive(Serialize)]
pub struct ClearResponse {
    pub session_id: String,
    pub cleared: bool,
}

pub async fn list_sessions(State(state): State<AppState>) -> Result<Json<SessionList>> {
    let sessions = state.sessions().session_ids().await?;
    Ok(Json(SessionList { sessions }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<TranscriptResponse>> {
    let transcript = state
        .sessions()
        .get(&session_id)
        .await?
        .ok_or_else(|| ServerError::not_found(format!("session '{}'", session_id)))?;

    Ok(Json(TranscriptResponse {
        session_id,
        turns: transcript.turns(),
    }))
}

/// Empties the transcript. Clearing an unknown session is not an error.
pub async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ClearResponse>> {
    let cleared = state.sessions().clear(&session_id).await?;
    Ok(Json(ClearResponse { session_id, cleared }))
}
