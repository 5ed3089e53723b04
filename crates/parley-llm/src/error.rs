use parley_core::error::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {provider} - {message}")]
    Api { provider: String, message: String },

    #[error("Rate limited: {provider}, retry after {retry_after_secs:?}s")]
    RateLimited {
        provider: String,
        retry_after_secs: Option<u64>,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LlmError>;

impl LlmError {
    pub fn api(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn rate_limited(provider: impl Into<String>, retry_after_secs: Option<u64>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
            retry_after_secs,
        }
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Maps a non-2xx upstream status to the matching error.
    pub fn from_status(provider: &str, status: u16, body: &str, retry_after_secs: Option<u64>) -> Self {
        match status {
            401 | 403 => Self::AuthenticationFailed(format!("{} returned {}: {}", provider, status, body)),
            429 => Self::rate_limited(provider, retry_after_secs),
            _ => Self::api(provider, format!("{}: {}", status, body)),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::RateLimited { .. } | LlmError::Timeout(_) | LlmError::Network(_)
        )
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, LlmError::AuthenticationFailed(_))
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(err.to_string())
        } else if err.is_decode() {
            LlmError::InvalidResponse(err.to_string())
        } else if err.is_builder() {
            LlmError::InvalidRequest(err.to_string())
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(LlmError::from_status("openai", 401, "bad key", None).is_auth());
        assert!(LlmError::from_status("openai", 403, "", None).is_auth());

        let limited = LlmError::from_status("openai", 429, "", Some(7));
        assert!(matches!(
            limited,
            LlmError::RateLimited { retry_after_secs: Some(7), .. }
        ));
        assert!(limited.is_retryable());

        let other = LlmError::from_status("gemini", 500, "boom", None);
        assert!(matches!(other, LlmError::Api { .. }));
        assert!(!other.is_retryable());
    }
}
