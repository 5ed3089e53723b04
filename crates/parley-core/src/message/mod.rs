mod content;
mod message;
mod role;

pub use content::{normalize_text, ContentBlock, ToolResult, ToolUse};
pub use message::Message;
pub use role::Role;
