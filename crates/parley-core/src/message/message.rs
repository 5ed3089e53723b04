use super::content::{normalize_text, ContentBlock, ToolResult, ToolUse};
use super::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of the working context sent to a model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: Vec<ContentBlock>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: Vec<ContentBlock>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            content,
            created_at: Utc::now(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, vec![ContentBlock::text(text)])
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentBlock::text(text)])
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![ContentBlock::text(text)])
    }

    pub fn tool_results(results: Vec<ToolResult>) -> Self {
        Self::new(
            Role::Tool,
            results.into_iter().map(ContentBlock::tool_result).collect(),
        )
    }

    pub fn text_content(&self) -> String {
        normalize_text(&self.content)
    }

    pub fn tool_uses(&self) -> Vec<&ToolUse> {
        self.content.iter().filter_map(|b| b.as_tool_use()).collect()
    }

    pub fn tool_results_iter(&self) -> impl Iterator<Item = &ToolResult> {
        self.content.iter().filter_map(|b| b.as_tool_result())
    }

    pub fn has_tool_use(&self) -> bool {
        self.content.iter().any(|b| b.is_tool_use())
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn push(&mut self, block: ContentBlock) {
        self.content.push(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text_content(), "Hello");
    }

    #[test]
    fn test_tool_results_message() {
        let msg = Message::tool_results(vec![
            ToolResult::success("a", "130"),
            ToolResult::error("b", "InvalidArguments: amount"),
        ]);
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_results_iter().count(), 2);
        assert!(msg.text_content().is_empty());
    }

    #[test]
    fn test_tool_uses() {
        let mut msg = Message::assistant("Let me look.");
        msg.push(ContentBlock::tool_use(ToolUse::new("1", "wikipedia", json!({"query": "Io"}))));
        assert!(msg.has_tool_use());
        assert_eq!(msg.tool_uses()[0].name, "wikipedia");
    }
}
