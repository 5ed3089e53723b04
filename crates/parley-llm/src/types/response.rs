use crate::error::{LlmError, Result};
use parley_core::{normalize_text, ContentBlock, Message, Role, ToolUse};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// What one model call asked for: either a final answer or tool invocations.
///
/// Providers build this through [`ModelReply::from_blocks`] so that every
/// backend normalizes multi-part payloads the same way.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelReply {
    Final { text: String },
    ToolCalls { text: String, calls: Vec<ToolUse> },
}

impl ModelReply {
    /// Any tool-use block makes this a `ToolCalls` reply. Otherwise the text
    /// blocks are concatenated in order and everything else is dropped.
    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Result<Self> {
        let text = normalize_text(&blocks);
        let calls: Vec<ToolUse> = blocks
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse(call) => Some(call),
                _ => None,
            })
            .collect();

        if !calls.is_empty() {
            return Ok(ModelReply::ToolCalls { text, calls });
        }

        if text.trim().is_empty() {
            return Err(LlmError::invalid_response(
                "reply carried neither text nor tool calls",
            ));
        }

        Ok(ModelReply::Final { text })
    }

    pub fn final_text(text: impl Into<String>) -> Self {
        ModelReply::Final { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            ModelReply::Final { text } | ModelReply::ToolCalls { text, .. } => text,
        }
    }

    pub fn tool_calls(&self) -> &[ToolUse] {
        match self {
            ModelReply::Final { .. } => &[],
            ModelReply::ToolCalls { calls, .. } => calls,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, ModelReply::Final { .. })
    }

    /// The assistant message to append to the working context.
    pub fn to_message(&self) -> Message {
        let mut content = Vec::new();
        if !self.text().is_empty() {
            content.push(ContentBlock::text(self.text()));
        }
        content.extend(self.tool_calls().iter().cloned().map(ContentBlock::tool_use));
        Message::new(Role::Assistant, content)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    ToolUse,
    ContentFilter,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, other: Self) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub model: String,
    pub reply: ModelReply,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
    #[serde(default)]
    pub usage: TokenUsage,
}

impl CompletionResponse {
    pub fn new(id: impl Into<String>, model: impl Into<String>, reply: ModelReply) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            reply,
            stop_reason: None,
            usage: TokenUsage::default(),
        }
    }

    pub fn with_stop_reason(mut self, reason: StopReason) -> Self {
        self.stop_reason = Some(reason);
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }

    pub fn text_content(&self) -> &str {
        self.reply.text()
    }

    pub fn has_tool_use(&self) -> bool {
        !self.reply.tool_calls().is_empty()
    }
}
