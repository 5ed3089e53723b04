mod loader;
mod types;

pub use types::{
    AgentSection, Config, LlmConfig, LogLevel, LogSection, ProviderKind, ServerSection,
    ToolsSection,
};
