use crate::error::{Result, ToolError};
use crate::traits::{Tool, ToolOutput};
use indexmap::IndexMap;
use parley_core::{Context, ToolDefinition};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Collects tools before the registry is frozen.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: IndexMap<String, Arc<dyn Tool>>,
}

impl ToolRegistryBuilder {
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<&mut Self> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(ToolError::AlreadyRegistered(name));
        }
        self.tools.insert(name, tool);
        Ok(self)
    }

    pub fn tool(mut self, tool: impl Tool + 'static) -> Result<Self> {
        self.register(Arc::new(tool))?;
        Ok(self)
    }

    pub fn build(self) -> ToolRegistry {
        ToolRegistry { tools: self.tools }
    }
}

/// An immutable, ordered set of tools. Advertisement order is registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Descriptors in registration order.
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|t| t.definition().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Looks up `name`, checks `arguments` against its schema and runs it.
    ///
    /// A `null` argument value is passed to the tool as `{}`.
    pub async fn invoke(&self, ctx: &Context, name: &str, arguments: Value) -> Result<ToolOutput> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::unknown_tool(name))?;

        if ctx.is_cancelled() {
            return Err(ToolError::Cancelled);
        }

        tool.validate_input(&arguments)?;

        let arguments = match arguments {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        debug!(tool = name, "Invoking tool");
        tool.execute(ctx, arguments)
            .await
            .map_err(|e| e.into_execution(name))
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FunctionTool;
    use async_trait::async_trait;
    use parley_core::ToolParameter;
    use serde_json::json;

    struct MockTool {
        def: ToolDefinition,
    }

    impl MockTool {
        fn new(name: &str) -> Self {
            Self {
                def: ToolDefinition::new(name, format!("{} tool", name)),
            }
        }
    }

    #[async_trait]
    impl Tool for MockTool {
        fn definition(&self) -> &ToolDefinition {
            &self.def
        }

        async fn execute(&self, _ctx: &Context, input: Value) -> Result<ToolOutput> {
            Ok(ToolOutput::text(input.to_string()))
        }
    }

    struct BrokenTool {
        def: ToolDefinition,
    }

    #[async_trait]
    impl Tool for BrokenTool {
        fn definition(&self) -> &ToolDefinition {
            &self.def
        }

        async fn execute(&self, _ctx: &Context, _input: Value) -> Result<ToolOutput> {
            let parsed: Value = serde_json::from_str("not json")?;
            Ok(ToolOutput::text(parsed.to_string()))
        }
    }

    fn add_fee() -> FunctionTool {
        FunctionTool::new(
            ToolDefinition::new("add_fee", "Adds a 30% fee to an amount")
                .with_required_param("amount", ToolParameter::number()),
            |input| {
                let amount = input["amount"].as_f64().unwrap_or_default();
                Ok(ToolOutput::text(format!("{}", amount * 1.3)))
            },
        )
    }

    #[test]
    fn test_registry_preserves_order() {
        let registry = ToolRegistry::builder()
            .tool(MockTool::new("zeta"))
            .unwrap()
            .tool(MockTool::new("alpha"))
            .unwrap()
            .tool(MockTool::new("mid"))
            .unwrap()
            .build();

        assert_eq!(registry.names(), vec!["zeta", "alpha", "mid"]);
        let listed: Vec<_> = registry.list().into_iter().map(|d| d.name).collect();
        assert_eq!(listed, vec!["zeta", "alpha", "mid"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_registry_duplicate() {
        let result = ToolRegistry::builder()
            .tool(MockTool::new("dup"))
            .unwrap()
            .tool(MockTool::new("dup"));

        assert!(matches!(result, Err(ToolError::AlreadyRegistered(ref n)) if n == "dup"));
    }

    #[tokio::test]
    async fn test_invoke_success() {
        let registry = ToolRegistry::builder().tool(add_fee()).unwrap().build();
        let output = registry
            .invoke(&Context::new(), "add_fee", json!({"amount": 100}))
            .await
            .unwrap();
        assert_eq!(output.content, "130");
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let registry = ToolRegistry::empty();
        let err = registry
            .invoke(&Context::new(), "teleport", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref n) if n == "teleport"));
    }

    #[tokio::test]
    async fn test_invoke_invalid_arguments() {
        let registry = ToolRegistry::builder().tool(add_fee()).unwrap().build();
        let err = registry
            .invoke(&Context::new(), "add_fee", json!({"amount": "lots"}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidArguments");
    }

    #[tokio::test]
    async fn test_invoke_wraps_tool_failures() {
        let registry = ToolRegistry::builder()
            .tool(BrokenTool {
                def: ToolDefinition::new("broken", "Always fails"),
            })
            .unwrap()
            .build();

        let err = registry
            .invoke(&Context::new(), "broken", Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Execution { ref tool, .. } if tool == "broken"));
    }

    #[tokio::test]
    async fn test_invoke_null_arguments_become_object() {
        let registry = ToolRegistry::builder().tool(MockTool::new("echo")).unwrap().build();
        let output = registry
            .invoke(&Context::new(), "echo", Value::Null)
            .await
            .unwrap();
        assert_eq!(output.content, "{}");
    }

    #[tokio::test]
    async fn test_invoke_respects_cancellation() {
        let registry = ToolRegistry::builder().tool(MockTool::new("echo")).unwrap().build();
        let ctx = Context::new();
        ctx.cancel();

        let err = registry.invoke(&ctx, "echo", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::Cancelled));
    }
}
