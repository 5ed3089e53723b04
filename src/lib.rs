//! A tool-augmented conversational responder.
//!
//! An [`Agent`](agent::Agent) answers one user message per turn. Within a turn
//! it may ask the model for tool calls, run them, and feed the observations
//! back until the model produces a final answer. Each session keeps its own
//! transcript so later turns see earlier ones.
//!
//! ```ignore
//! use parley::prelude::*;
//!
//! let agent = Agent::builder().llm(provider).tool_registry(registry).build()?;
//! let reply = agent.respond("pilot_1", "How much fuel for 20 light years?").await?;
//! ```

pub use parley_agent as agent;
pub use parley_core as core;
pub use parley_llm as llm;
pub use parley_server as server;
pub use parley_tools as tools;

pub mod prelude {
    pub use parley_agent::{
        Agent, AgentBuilder, AgentConfig, AgentError, AgentEvent, AgentResponse,
        MemorySessionStore, SessionStore, Speaker, ToolCallRecord, Transcript, Turn,
    };
    pub use parley_core::config::{LlmConfig, ProviderKind};
    pub use parley_core::{Config, Context, Message, ToolDefinition, ToolParameter};
    pub use parley_llm::{create_provider, LlmError, LlmProvider, ModelReply};
    pub use parley_server::{Server, ServerConfig};
    pub use parley_tools::{FunctionTool, Tool, ToolError, ToolOutput, ToolRegistry};
}
