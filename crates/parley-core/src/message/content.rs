use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A model-issued request to run one tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolUse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub input: Value,
    /// Opaque provider token that has to be echoed back alongside this call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl ToolUse {
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }
}

/// The observation fed back to the model after running a [`ToolUse`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_use_id: String,
    /// Name of the tool that produced this result. Some providers key results by name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            name: String::new(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(tool_use_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            name: String::new(),
            content: error.into(),
            is_error: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    ToolUse(ToolUse),
    ToolResult(ToolResult),
    /// Any block type this crate does not model (reasoning metadata, citations, ...).
    #[serde(other)]
    Unknown,
}

impl ContentBlock {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text { text: s.into() }
    }

    pub fn tool_use(tool_use: ToolUse) -> Self {
        Self::ToolUse(tool_use)
    }

    pub fn tool_result(result: ToolResult) -> Self {
        Self::ToolResult(result)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    pub fn is_tool_use(&self) -> bool {
        matches!(self, Self::ToolUse(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn as_tool_use(&self) -> Option<&ToolUse> {
        match self {
            Self::ToolUse(tu) => Some(tu),
            _ => None,
        }
    }

    pub fn as_tool_result(&self) -> Option<&ToolResult> {
        match self {
            Self::ToolResult(tr) => Some(tr),
            _ => None,
        }
    }
}

/// Concatenates the text-bearing blocks in order. Every other block is dropped.
pub fn normalize_text(blocks: &[ContentBlock]) -> String {
    blocks.iter().filter_map(ContentBlock::as_text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_drops_non_text_parts() {
        let blocks: Vec<ContentBlock> = serde_json::from_value(json!([
            {"type": "text", "text": "A"},
            {"type": "other"},
            {"type": "text", "text": "B"}
        ]))
        .unwrap();

        assert_eq!(blocks[1], ContentBlock::Unknown);
        assert_eq!(normalize_text(&blocks), "AB");
    }

    #[test]
    fn test_normalize_ignores_tool_blocks() {
        let blocks = vec![
            ContentBlock::text("Checking. "),
            ContentBlock::tool_use(ToolUse::new("call_1", "web_search", json!({"query": "mars"}))),
            ContentBlock::tool_result(ToolResult::success("call_1", "red planet")),
        ];
        assert_eq!(normalize_text(&blocks), "Checking. ");
    }

    #[test]
    fn test_tool_use_roundtrip_tagging() {
        let block = ContentBlock::tool_use(ToolUse::new("c1", "add_fee", json!({"amount": 100})));
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "tool_use");
        assert_eq!(value["name"], "add_fee");
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("c1", "UnknownTool: nope").with_name("nope");
        assert!(result.is_error);
        assert_eq!(result.name, "nope");
    }
}
