pub mod config;
pub mod context;
pub mod error;
pub mod message;
pub mod tool;

pub use config::Config;
pub use context::Context;
pub use error::{Error, Result};
pub use message::{normalize_text, ContentBlock, Message, Role, ToolResult, ToolUse};
pub use tool::{JsonSchemaType, SchemaViolation, ToolDefinition, ToolParameter};

pub mod prelude {
    pub use crate::config::{
        AgentSection, Config, LlmConfig, LogLevel, ProviderKind, ServerSection, ToolsSection,
    };
    pub use crate::context::Context;
    pub use crate::error::{Error, Result};
    pub use crate::message::{normalize_text, ContentBlock, Message, Role, ToolResult, ToolUse};
    pub use crate::tool::{JsonSchemaType, SchemaViolation, ToolDefinition, ToolParameter};
}
