use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Per-call execution context handed to tools.
#[derive(Clone)]
pub struct Context {
    pub request_id: Uuid,
    pub session_id: Option<String>,
    pub started_at: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    cancellation: CancellationToken,
}

impl Context {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            session_id: None,
            started_at: Utc::now(),
            deadline: None,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = chrono::Duration::from_std(timeout)
            .ok()
            .and_then(|d| self.started_at.checked_add_signed(d));
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// A context for a nested call: fresh request id, same session, deadline and cancellation scope.
    pub fn child(&self) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            session_id: self.session_id.clone(),
            started_at: Utc::now(),
            deadline: self.deadline,
            cancellation: self.cancellation.child_token(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn cancel(&self) {
        self.cancellation.cancel()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn is_timeout(&self) -> bool {
        self.deadline.is_some_and(|d| Utc::now() > d)
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| (d - Utc::now()).to_std().unwrap_or(Duration::ZERO))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("request_id", &self.request_id)
            .field("session_id", &self.session_id)
            .field("deadline", &self.deadline)
            .field("is_cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_deadline() {
        let ctx = Context::new();
        assert!(ctx.remaining().is_none());
        assert!(!ctx.is_timeout());
    }

    #[test]
    fn test_remaining_is_bounded_by_timeout() {
        let ctx = Context::new().with_timeout(Duration::from_secs(5));
        let remaining = ctx.remaining().unwrap();
        assert!(remaining <= Duration::from_secs(5));
        assert!(remaining > Duration::from_secs(3));
    }

    #[test]
    fn test_child_shares_cancellation() {
        let parent = Context::new().with_session("s1");
        let child = parent.child();
        assert_eq!(child.session_id.as_deref(), Some("s1"));
        assert_ne!(child.request_id, parent.request_id);

        parent.cancel();
        assert!(child.is_cancelled());
    }
}
