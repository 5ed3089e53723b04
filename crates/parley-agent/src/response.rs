use parley_llm::TokenUsage;
use serde::{Deserialize, Serialize};

/// One tool call made while producing a response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub id: String,
    pub name: String,
    pub input: serde_json::Value,
    pub output: String,
    pub is_error: bool,
    pub duration_ms: u64,
}

impl ToolCallRecord {
    pub fn success(
        id: impl Into<String>,
        name: impl Into<String>,
        input: serde_json::Value,
        output: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
            output: output.into(),
            is_error: false,
            duration_ms,
        }
    }

    pub fn error(
        id: impl Into<String>,
        name: impl Into<String>,
        input: serde_json::Value,
        error_msg: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
            output: error_msg.into(),
            is_error: true,
            duration_ms,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentResponse {
    pub session_id: String,
    pub text: String,
    pub tool_calls: Vec<ToolCallRecord>,
    /// Model calls made, parse retries excluded.
    pub iterations: usize,
    #[serde(default)]
    pub usage: TokenUsage,
}

impl AgentResponse {
    pub fn new(session_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            text: text.into(),
            tool_calls: Vec::new(),
            iterations: 1,
            usage: TokenUsage::default(),
        }
    }

    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCallRecord>) -> Self {
        self.tool_calls = tool_calls;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    pub fn tool_call_count(&self) -> usize {
        self.tool_calls.len()
    }

    pub fn failed_tool_calls(&self) -> impl Iterator<Item = &ToolCallRecord> {
        self.tool_calls.iter().filter(|tc| tc.is_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_basic() {
        let response = AgentResponse::new("s1", "Hello, world!");
        assert_eq!(response.text(), "Hello, world!");
        assert!(!response.has_tool_calls());
        assert_eq!(response.usage.total(), 0);
    }

    #[test]
    fn test_response_with_tool_calls() {
        let ok = ToolCallRecord::success("call_1", "add_fee", serde_json::json!({"amount": 100}), "130", 3);
        let failed = ToolCallRecord::error(
            "call_2",
            "teleport",
            serde_json::json!({}),
            "UnknownTool: no tool named 'teleport' is registered",
            0,
        );

        let response = AgentResponse::new("s1", "The total is 130.")
            .with_tool_calls(vec![ok, failed])
            .with_iterations(2)
            .with_usage(TokenUsage::new(40, 12));

        assert_eq!(response.tool_call_count(), 2);
        assert_eq!(response.failed_tool_calls().count(), 1);
        assert_eq!(response.iterations, 2);
        assert_eq!(response.usage.total(), 52);
    }
}
