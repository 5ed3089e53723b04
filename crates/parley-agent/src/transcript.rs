use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use parley_core::{Message, Role};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Assistant => "assistant",
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Speaker::User => Role::User,
            Speaker::Assistant => Role::Assistant,
        }
    }
}

/// One persisted utterance. Tool traffic never becomes a turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, text)
    }

    fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn to_message(&self) -> Message {
        match self.speaker {
            Speaker::User => Message::user(&self.text),
            Speaker::Assistant => Message::assistant(&self.text),
        }
    }
}

#[derive(Debug, Default)]
struct TranscriptInner {
    turns: Vec<Turn>,
}

/// The ordered history of one session.
///
/// Clones are handles onto the same history: a turn recorded through one
/// clone is visible through every other.
#[derive(Clone, Debug)]
pub struct Transcript {
    session_id: String,
    created_at: DateTime<Utc>,
    inner: Arc<RwLock<TranscriptInner>>,
    gate: Arc<Mutex<()>>,
}

impl Transcript {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            created_at: Utc::now(),
            inner: Arc::new(RwLock::new(TranscriptInner::default())),
            gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn turns(&self) -> Vec<Turn> {
        self.inner.read().turns.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().turns.is_empty()
    }

    /// The most recent `n` turns, oldest first.
    pub fn last(&self, n: usize) -> Vec<Turn> {
        let inner = self.inner.read();
        let start = inner.turns.len().saturating_sub(n);
        inner.turns[start..].to_vec()
    }

    /// The most recent `n` turns as model messages. The window always opens
    /// on a user turn, so an odd `n` yields one turn fewer.
    pub fn context_messages(&self, n: usize) -> Vec<Message> {
        self.last(n)
            .iter()
            .skip_while(|turn| turn.speaker == Speaker::Assistant)
            .map(Turn::to_message)
            .collect()
    }

    pub fn clear(&self) {
        self.inner.write().turns.clear();
    }

    /// Appends a completed exchange. Both turns land under one write lock,
    /// so readers never observe the user turn without its answer.
    pub fn record_exchange(&self, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        let user = Turn::user(user_text);
        let assistant = Turn::assistant(assistant_text);
        let mut inner = self.inner.write();
        inner.turns.push(user);
        inner.turns.push(assistant);
    }

    /// Waits until no other turn is running on this session.
    pub async fn begin_turn(&self) -> OwnedMutexGuard<()> {
        self.gate.clone().lock_owned().await
    }

    /// Two handles are the same transcript when they share state.
    pub fn same_as(&self, other: &Transcript) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
