use axum::{extract::State, Json};
use parley_core::ToolDefinition;
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub sessions: usize,
    pub provider: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn ready(State(state): State<AppState>) -> Result<Json<ReadyResponse>> {
    Ok(Json(ReadyResponse {
        status: "ready".to_string(),
        sessions: state.session_count().await?,
        provider: state.agent.llm().name().to_string(),
    }))
}

pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDefinition>> {
    Json(state.agent.tool_definitions())
}
