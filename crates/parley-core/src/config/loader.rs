use super::types::Config;
use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;

const SEARCH_PATHS: &[&str] = &[
    "./parley.toml",
    "~/.parley/config.toml",
    "~/.config/parley/config.toml",
];

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let expanded = shellexpand::tilde(&path.as_ref().to_string_lossy()).into_owned();
        let content = std::fs::read_to_string(&expanded)?;
        debug!(path = %expanded, "Loaded config file");
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse config: {}", e)))
    }

    /// First config file found on the search path, or defaults when none exists.
    pub fn load_default() -> Result<Self> {
        for path in SEARCH_PATHS {
            let expanded = shellexpand::tilde(path);
            let path = Path::new(expanded.as_ref());
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        Ok(Config::default())
    }

    pub fn merge_env(self) -> Self {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    pub fn merge_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(level) = lookup("PARLEY_LOG_LEVEL").and_then(|l| l.parse().ok()) {
            self.log.level = level;
        }

        if let Some(provider) = lookup("PARLEY_PROVIDER").and_then(|p| p.parse().ok()) {
            self.llm.provider = provider;
        }

        if let Some(model) = lookup("PARLEY_MODEL").filter(|m| !m.is_empty()) {
            self.llm.model = Some(model);
        }

        self
    }

    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_from(|key| std::env::var(key).ok())
    }

    /// Inline key, then `api_key_env`, then the provider's conventional variables.
    pub fn resolve_api_key_from(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        if let Some(key) = self.llm.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Ok(key.clone());
        }

        let named = self.llm.api_key_env.as_deref().into_iter();
        let conventional = self.llm.provider.key_env_vars().iter().copied();

        named
            .chain(conventional)
            .find_map(|var| lookup(var).filter(|v| !v.is_empty()))
            .ok_or_else(|| {
                let vars = self.llm.provider.key_env_vars().join(" or ");
                Error::missing_config(format!(
                    "API key for {}; set {} or llm.api_key_env",
                    self.llm.provider, vars
                ))
            })
    }
}
