use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::Stream;
use parley_agent::ToolCallRecord;
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;

use crate::error::{Result, ServerError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub response: String,
    pub tool_calls: Vec<ToolCallInfo>,
    pub iterations: usize,
}

#[derive(Serialize)]
pub struct ToolCallInfo {
    pub id: String,
    pub name: String,
    pub output: String,
    pub is_error: bool,
}

impl From<ToolCallRecord> for ToolCallInfo {
    fn from(record: ToolCallRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            output: record.output,
            is_error: record.is_error,
        }
    }
}

fn validate(request: &ChatRequest) -> Result<()> {
    if request.message.trim().is_empty() {
        return Err(ServerError::bad_request("message must not be empty"));
    }
    Ok(())
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    validate(&request)?;
    let session_id = state.resolve_session_id(request.session_id);

    let response = state.agent.process(&session_id, &request.message).await?;

    Ok(Json(ChatResponse {
        session_id,
        response: response.text,
        tool_calls: response.tool_calls.into_iter().map(ToolCallInfo::from).collect(),
        iterations: response.iterations,
    }))
}

/// Streams the turn as server-sent events, one per [`parley_agent::AgentEvent`].
pub async fn chat_stream(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, axum::Error>>>> {
    validate(&request)?;
    let session_id = state.resolve_session_id(request.session_id);

    let events = state
        .agent
        .respond_stream(&session_id, &request.message)
        .map(|event| Event::default().event(event.name()).json_data(&event));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
