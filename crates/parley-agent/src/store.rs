use crate::error::Result;
use crate::transcript::Transcript;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Owns every transcript. There is at most one transcript per session id,
/// and every access to it goes through the store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the transcript for `session_id`, creating an empty one the
    /// first time. Repeated calls hand out the same transcript.
    async fn get_or_create(&self, session_id: &str) -> Result<Transcript>;

    async fn get(&self, session_id: &str) -> Result<Option<Transcript>>;

    /// Empties the transcript. Returns `false` when the session is unknown.
    async fn clear(&self, session_id: &str) -> Result<bool>;

    /// Forgets the session entirely. A turn already running on the session
    /// finishes and records its exchange before the transcript is dropped.
    async fn remove(&self, session_id: &str) -> Result<bool>;

    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    async fn session_ids(&self) -> Result<Vec<String>>;

    fn backend_name(&self) -> &'static str;
}

/// Process-local store. Sessions live until removed or the process exits.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Transcript>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get_or_create(&self, session_id: &str) -> Result<Transcript> {
        if let Some(existing) = self.sessions.read().get(session_id) {
            return Ok(existing.clone());
        }

        let mut sessions = self.sessions.write();
        let transcript = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(session_id, "Creating session transcript");
                Transcript::new(session_id)
            })
            .clone();
        Ok(transcript)
    }

    async fn get(&self, session_id: &str) -> Result<Option<Transcript>> {
        Ok(self.sessions.read().get(session_id).cloned())
    }

    async fn clear(&self, session_id: &str) -> Result<bool> {
        match self.sessions.read().get(session_id) {
            Some(transcript) => {
                transcript.clear();
                debug!(session_id, "Cleared session transcript");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, session_id: &str) -> Result<bool> {
        let Some(transcript) = self.sessions.read().get(session_id).cloned() else {
            return Ok(false);
        };

        let _turn = transcript.begin_turn().await;
        let mut sessions = self.sessions.write();
        let removed = sessions
            .get(session_id)
            .is_some_and(|current| current.same_as(&transcript));
        if removed {
            sessions.remove(session_id);
            debug!(session_id, "Removed session transcript");
        }
        Ok(removed)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.sessions.read().len())
    }

    async fn session_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.sessions.read().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
