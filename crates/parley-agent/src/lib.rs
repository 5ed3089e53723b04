pub mod agent;
pub mod config;
pub mod error;
pub mod event;
pub mod executor;
pub mod response;
pub mod store;
pub mod transcript;

pub use agent::{Agent, AgentBuilder};
pub use config::AgentConfig;
pub use error::{AgentError, Result};
pub use event::AgentEvent;
pub use executor::Executor;
pub use response::{AgentResponse, ToolCallRecord};
pub use store::{MemorySessionStore, SessionStore};
pub use transcript::{Speaker, Transcript, Turn};

pub mod prelude {
    pub use crate::agent::{Agent, AgentBuilder};
    pub use crate::config::AgentConfig;
    pub use crate::error::{AgentError, Result};
    pub use crate::event::AgentEvent;
    pub use crate::response::{AgentResponse, ToolCallRecord};
    pub use crate::store::{MemorySessionStore, SessionStore};
    pub use crate::transcript::{Speaker, Transcript, Turn};
}
