#[cfg(feature = "gemini")]
mod gemini;
#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "gemini")]
pub use gemini::GeminiProvider;
#[cfg(feature = "openai")]
pub use openai::OpenAiProvider;

use crate::error::{LlmError, Result};
use crate::traits::LlmProvider;
use parley_core::config::{LlmConfig, ProviderKind};
use std::sync::Arc;
use std::time::Duration;

/// Builds the provider named by `config`, with `api_key` already resolved.
pub fn create_provider(config: &LlmConfig, api_key: String) -> Result<Arc<dyn LlmProvider>> {
    let timeout = Duration::from_secs(config.timeout_secs);

    match config.provider {
        #[cfg(feature = "openai")]
        ProviderKind::OpenAi => {
            let base_url = config.base_url.as_deref().unwrap_or(openai::DEFAULT_BASE_URL);
            let provider = OpenAiProvider::with_options(api_key, base_url, timeout)?
                .with_model(config.model());
            Ok(Arc::new(provider))
        }
        #[cfg(feature = "gemini")]
        ProviderKind::Gemini => {
            let base_url = config.base_url.as_deref().unwrap_or(gemini::DEFAULT_BASE_URL);
            let provider = GeminiProvider::with_options(api_key, base_url, timeout)?
                .with_model(config.model());
            Ok(Arc::new(provider))
        }
        #[allow(unreachable_patterns)]
        other => Err(LlmError::Config(format!(
            "provider '{}' is not compiled in; enable the '{}' feature",
            other, other
        ))),
    }
}

pub(crate) fn retry_after(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[cfg(all(test, feature = "openai", feature = "gemini"))]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_from_config() {
        let mut config = LlmConfig::default();
        let provider = create_provider(&config, "k".into()).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.default_model(), "gpt-4o-mini");

        config.provider = ProviderKind::Gemini;
        config.model = Some("gemini-2.0-flash".into());
        let provider = create_provider(&config, "k".into()).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.default_model(), "gemini-2.0-flash");
    }
}
