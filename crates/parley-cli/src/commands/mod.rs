pub mod chat;
pub mod run;
pub mod serve;
pub mod tools;

use anyhow::Context as _;
use parley_agent::{Agent, AgentConfig};
use parley_core::config::{ProviderKind, ToolsSection};
use parley_core::Config;
use parley_llm::create_provider;
use parley_tools::{builtin_tools, Tool, ToolRegistry};
use std::path::Path;
use std::sync::Arc;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant. Use the available tools \
when they help you answer accurately.";

/// Command-line flags that take precedence over the config file and environment.
#[derive(Default)]
pub struct Overrides {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

pub struct Settings {
    pub config: Config,
    api_key: Option<String>,
}

impl Settings {
    /// Config file, then `PARLEY_*` environment, then flags.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => Config::load_default()?,
        };
        Self::from_config(config.merge_env(), overrides)
    }

    fn from_config(mut config: Config, overrides: Overrides) -> anyhow::Result<Self> {
        if let Some(provider) = overrides.provider {
            config.llm.provider = provider
                .parse::<ProviderKind>()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        if let Some(model) = overrides.model {
            config.llm.model = Some(model);
        }

        Ok(Self {
            config,
            api_key: overrides.api_key,
        })
    }

    fn api_key(&self) -> anyhow::Result<String> {
        match &self.api_key {
            Some(key) => Ok(key.clone()),
            None => Ok(self.config.resolve_api_key()?),
        }
    }

    pub fn create_registry(&self) -> anyhow::Result<ToolRegistry> {
        registry_for(&self.config.tools)
    }

    pub fn create_agent(&self, system_prompt: Option<&str>) -> anyhow::Result<Agent> {
        let llm = create_provider(&self.config.llm, self.api_key()?)?;

        let mut agent_config = AgentConfig::from_section(&self.config.agent)
            .with_model(self.config.llm.model());
        if agent_config.system_prompt.is_empty() {
            agent_config.system_prompt = DEFAULT_SYSTEM_PROMPT.to_string();
        }
        if let Some(prompt) = system_prompt {
            agent_config.system_prompt = prompt.to_string();
        }

        let agent = Agent::builder()
            .config(agent_config)
            .llm(llm)
            .tool_registry(Arc::new(self.create_registry()?))
            .build()
            .context("Failed to create agent")?;

        Ok(agent)
    }
}

/// Built-in tools minus the ones the config turns off.
fn registry_for(tools: &ToolsSection) -> anyhow::Result<ToolRegistry> {
    let mut builder = ToolRegistry::builder();
    for tool in builtin_tools() {
        if tools.is_enabled(tool.name()) {
            builder.register(tool)?;
        }
    }
    Ok(builder.build())
}
