use crate::error::{Result, ToolError};
use async_trait::async_trait;
use parley_core::{Context, ToolDefinition};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text handed back to the model as the result of a tool call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: String,
}

impl ToolOutput {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self {
            content: serde_json::to_string_pretty(value)?,
        })
    }
}

impl From<String> for ToolOutput {
    fn from(content: String) -> Self {
        Self::text(content)
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    async fn execute(&self, ctx: &Context, input: Value) -> Result<ToolOutput>;

    fn validate_input(&self, input: &Value) -> Result<()> {
        self.definition()
            .validate_arguments(input)
            .map_err(|violation| ToolError::invalid_arguments(self.name(), violation.to_string()))
    }

    fn name(&self) -> &str {
        &self.definition().name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::ToolParameter;
    use serde_json::json;

    struct Gravity {
        def: ToolDefinition,
    }

    #[async_trait]
    impl Tool for Gravity {
        fn definition(&self) -> &ToolDefinition {
            &self.def
        }

        async fn execute(&self, _ctx: &Context, _input: Value) -> Result<ToolOutput> {
            Ok(ToolOutput::text("0.38g"))
        }
    }

    #[test]
    fn test_tool_output_json() {
        let output = ToolOutput::json(&json!({"planet": "mars"})).unwrap();
        assert!(output.content.contains("mars"));
    }

    #[test]
    fn test_default_validation_uses_schema() {
        let tool = Gravity {
            def: ToolDefinition::new("planet_gravity", "Surface gravity of a planet")
                .with_required_param("planet", ToolParameter::string()),
        };

        assert!(tool.validate_input(&json!({"planet": "mars"})).is_ok());
        let err = tool.validate_input(&json!({"planet": 4})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { ref tool, .. } if tool == "planet_gravity"));
    }
}
