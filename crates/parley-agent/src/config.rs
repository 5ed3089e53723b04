use parley_core::config::AgentSection;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub system_prompt: String,

    /// Model id. Empty means the provider's default model.
    #[serde(default)]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default)]
    pub max_tokens: Option<usize>,

    /// Model calls allowed per turn.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Corrective re-asks after an unreadable model reply.
    #[serde(default = "default_max_parse_retries")]
    pub max_parse_retries: usize,

    /// Transcript turns sent along with each request.
    #[serde(default = "default_max_context_turns")]
    pub max_context_turns: usize,

    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,

    #[serde(default = "default_tools_enabled")]
    pub tools_enabled: bool,
}

fn default_name() -> String {
    "assistant".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_iterations() -> usize {
    10
}

fn default_max_parse_retries() -> usize {
    1
}

fn default_max_context_turns() -> usize {
    50
}

fn default_tool_timeout_secs() -> u64 {
    60
}

fn default_tools_enabled() -> bool {
    true
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            system_prompt: String::new(),
            model: String::new(),
            temperature: default_temperature(),
            max_tokens: None,
            max_iterations: default_max_iterations(),
            max_parse_retries: default_max_parse_retries(),
            max_context_turns: default_max_context_turns(),
            tool_timeout_secs: default_tool_timeout_secs(),
            tools_enabled: default_tools_enabled(),
        }
    }
}

impl AgentConfig {
    pub fn new(model: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: system_prompt.into(),
            ..Default::default()
        }
    }

    /// Overlays the values set in a `[agent]` config section.
    pub fn from_section(section: &AgentSection) -> Self {
        let mut config = Self::default();
        config.apply_section(section);
        config
    }

    pub fn apply_section(&mut self, section: &AgentSection) {
        if let Some(name) = &section.name {
            self.name = name.clone();
        }
        if let Some(prompt) = &section.system_prompt {
            self.system_prompt = prompt.clone();
        }
        if let Some(temperature) = section.temperature {
            self.temperature = temperature;
        }
        if section.max_tokens.is_some() {
            self.max_tokens = section.max_tokens;
        }
        if let Some(max) = section.max_iterations {
            self.max_iterations = max;
        }
        if let Some(retries) = section.max_parse_retries {
            self.max_parse_retries = retries;
        }
        if let Some(turns) = section.max_context_turns {
            self.max_context_turns = turns;
        }
        if let Some(secs) = section.tool_timeout_secs {
            self.tool_timeout_secs = secs;
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_parse_retries(mut self, retries: usize) -> Self {
        self.max_parse_retries = retries;
        self
    }

    pub fn with_max_context_turns(mut self, turns: usize) -> Self {
        self.max_context_turns = turns;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout_secs = timeout.as_secs();
        self
    }

    pub fn with_tools_enabled(mut self, enabled: bool) -> Self {
        self.tools_enabled = enabled;
        self
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = AgentConfig::default();
        assert_eq!(config.name, "assistant");
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.max_parse_retries, 1);
        assert_eq!(config.max_context_turns, 50);
        assert!(config.model.is_empty());
        assert!(config.tools_enabled);
    }

    #[test]
    fn test_config_builder() {
        let config = AgentConfig::new("gpt-4o-mini", "You are helpful.")
            .with_name("navigator")
            .with_temperature(0.2)
            .with_max_iterations(3);

        assert_eq!(config.name, "navigator");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_iterations, 3);
    }

    #[test]
    fn test_apply_section_only_overrides_set_fields() {
        let section = AgentSection {
            system_prompt: Some("You are HAL-9001.".into()),
            max_iterations: Some(4),
            ..Default::default()
        };

        let config = AgentConfig::from_section(&section);
        assert_eq!(config.system_prompt, "You are HAL-9001.");
        assert_eq!(config.max_iterations, 4);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.name, "assistant");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: AgentConfig = serde_json::from_str(r#"{"max_iterations": 2}"#).unwrap();
        assert_eq!(config.max_iterations, 2);
        assert_eq!(config.tool_timeout(), Duration::from_secs(60));
    }
}
