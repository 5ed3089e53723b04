use serde::{Deserialize, Serialize};

/// Progress of one turn, in the order it happens.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    MessageStart {
        session_id: String,
    },

    ToolUseStart {
        id: String,
        name: String,
        input: serde_json::Value,
    },

    ToolUseEnd {
        id: String,
        output: String,
        is_error: bool,
    },

    TextComplete {
        text: String,
    },

    MessageEnd {
        session_id: String,
        iterations: usize,
    },

    Error {
        kind: String,
        message: String,
    },
}

impl AgentEvent {
    pub fn message_start(session_id: impl Into<String>) -> Self {
        Self::MessageStart {
            session_id: session_id.into(),
        }
    }

    pub fn tool_use_start(id: impl Into<String>, name: impl Into<String>, input: serde_json::Value) -> Self {
        Self::ToolUseStart {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    pub fn tool_use_end(id: impl Into<String>, output: impl Into<String>, is_error: bool) -> Self {
        Self::ToolUseEnd {
            id: id.into(),
            output: output.into(),
            is_error,
        }
    }

    pub fn text_complete(text: impl Into<String>) -> Self {
        Self::TextComplete { text: text.into() }
    }

    pub fn message_end(session_id: impl Into<String>, iterations: usize) -> Self {
        Self::MessageEnd {
            session_id: session_id.into(),
            iterations,
        }
    }

    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// SSE event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MessageStart { .. } => "message_start",
            Self::ToolUseStart { .. } => "tool_use_start",
            Self::ToolUseEnd { .. } => "tool_use_end",
            Self::TextComplete { .. } => "text_complete",
            Self::MessageEnd { .. } => "message_end",
            Self::Error { .. } => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::MessageEnd { .. } | Self::Error { .. })
    }
}
