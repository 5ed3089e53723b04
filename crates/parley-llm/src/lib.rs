pub mod error;
pub mod providers;
pub mod traits;
pub mod types;

pub use error::{LlmError, Result};
pub use providers::create_provider;
pub use traits::LlmProvider;
pub use types::{CompletionRequest, CompletionResponse, ModelReply, StopReason, TokenUsage, ToolChoice};

#[cfg(feature = "gemini")]
pub use providers::GeminiProvider;
#[cfg(feature = "openai")]
pub use providers::OpenAiProvider;

pub mod prelude {
    pub use crate::error::{LlmError, Result};
    pub use crate::traits::LlmProvider;
    pub use crate::types::{
        CompletionRequest, CompletionResponse, ModelReply, StopReason, TokenUsage, ToolChoice,
    };

    #[cfg(feature = "gemini")]
    pub use crate::providers::GeminiProvider;
    #[cfg(feature = "openai")]
    pub use crate::providers::OpenAiProvider;
}
