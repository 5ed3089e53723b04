mod request;
mod response;

pub use request::{CompletionRequest, ToolChoice};
pub use response::{CompletionResponse, ModelReply, StopReason, TokenUsage};
