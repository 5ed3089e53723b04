use parley_core::error::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("no tool named '{0}' is registered")]
    UnknownTool(String),

    #[error("invalid arguments for '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("'{tool}' failed: {message}")]
    Execution { tool: String, message: String },

    #[error("tool already registered: {0}")]
    AlreadyRegistered(String),

    #[error("'{tool}' timed out after {after_ms}ms")]
    Timeout { tool: String, after_ms: u64 },

    #[error("tool call cancelled")]
    Cancelled,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ToolError>;

impl ToolError {
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    pub fn invalid_arguments(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn execution(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Taxonomy name used when the error is reported back to the model.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::UnknownTool(_) => "UnknownTool",
            ToolError::InvalidArguments { .. } => "InvalidArguments",
            ToolError::AlreadyRegistered(_) => "AlreadyRegistered",
            _ => "ToolExecutionError",
        }
    }

    /// Errors the model can be told about and recover from within the same turn.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ToolError::AlreadyRegistered(_))
    }

    /// The `"<Kind>: <message>"` text fed back as a tool observation.
    pub fn observation(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }

    /// Folds failures raised inside a tool body into `Execution` for `tool`.
    pub(crate) fn into_execution(self, tool: &str) -> Self {
        match self {
            ToolError::UnknownTool(_)
            | ToolError::InvalidArguments { .. }
            | ToolError::Execution { .. }
            | ToolError::Timeout { .. }
            | ToolError::Cancelled => self,
            other => ToolError::execution(tool, other.to_string()),
        }
    }
}
