use parley_core::error::Error as CoreError;
use parley_llm::LlmError;
use parley_tools::ToolError;
use thiserror::Error;

/// Failures that abort a turn. None of them touch the transcript.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model provider rejected the credentials: {0}")]
    Authentication(String),

    #[error("Model provider unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Could not interpret the model reply: {0}")]
    ResponseParse(String),

    #[error("Gave up after {0} model calls without a final answer")]
    MaxIterationsExceeded(usize),

    #[error("Session store error: {0}")]
    Store(String),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AgentError>;

impl AgentError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Taxonomy name reported to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            AgentError::Config(_) => "ConfigError",
            AgentError::Authentication(_) => "AuthenticationError",
            AgentError::UpstreamUnavailable(_) => "UpstreamUnavailable",
            AgentError::ResponseParse(_) => "ResponseParseError",
            AgentError::MaxIterationsExceeded(_) => "MaxIterationsExceeded",
            AgentError::Store(_) => "StoreError",
            AgentError::Tool(e) => e.kind(),
            AgentError::Core(_) | AgentError::Internal(_) => "InternalError",
        }
    }

    /// Whether resubmitting the same utterance may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AgentError::UpstreamUnavailable(_)
                | AgentError::ResponseParse(_)
                | AgentError::MaxIterationsExceeded(_)
        )
    }
}

impl From<LlmError> for AgentError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::AuthenticationFailed(msg) => AgentError::Authentication(msg),
            LlmError::InvalidResponse(msg) => AgentError::ResponseParse(msg),
            LlmError::Json(e) => AgentError::ResponseParse(e.to_string()),
            LlmError::Config(msg) | LlmError::InvalidRequest(msg) => AgentError::Config(msg),
            LlmError::Core(e) => AgentError::Core(e),
            other @ (LlmError::Api { .. }
            | LlmError::RateLimited { .. }
            | LlmError::Network(_)
            | LlmError::Timeout(_)) => AgentError::UpstreamUnavailable(other.to_string()),
        }
    }
}
