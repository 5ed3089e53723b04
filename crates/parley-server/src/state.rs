use crate::error::Result;
use parley_agent::{Agent, SessionStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<Agent>,
}

impl AppState {
    pub fn new(agent: Agent) -> Self {
        Self {
            agent: Arc::new(agent),
        }
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        self.agent.sessions()
    }

    /// The caller's session id, or a fresh one for a new conversation.
    pub fn resolve_session_id(&self, requested: Option<String>) -> String {
        requested
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
    }

    pub async fn session_count(&self) -> Result<usize> {
        Ok(self.sessions().len().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_agent;

    #[tokio::test]
    async fn test_resolve_session_id() {
        let state = AppState::new(test_agent(vec![]));

        assert_eq!(state.resolve_session_id(Some("abc".into())), "abc");

        let fresh = state.resolve_session_id(None);
        assert!(uuid::Uuid::parse_str(&fresh).is_ok());
        assert_ne!(state.resolve_session_id(Some("  ".into())), "  ");
    }

    #[tokio::test]
    async fn test_session_count() {
        let state = AppState::new(test_agent(vec![]));
        assert_eq!(state.session_count().await.unwrap(), 0);

        state.agent.respond("s1", "hi").await.unwrap();
        assert_eq!(state.session_count().await.unwrap(), 1);
    }
}
