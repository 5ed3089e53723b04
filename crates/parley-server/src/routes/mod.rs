pub mod chat;
pub mod health;
pub mod sessions;

pub use chat::{chat, chat_stream, ChatRequest, ChatResponse};
pub use health::{health, list_tools, ready, HealthResponse, ReadyResponse};
pub use sessions::{clear_session, get_session, list_sessions};
