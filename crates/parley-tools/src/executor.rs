use crate::error::{Result, ToolError};
use crate::registry::ToolRegistry;
use crate::traits::ToolOutput;
use parley_core::Context;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// Runs registry invocations under a deadline and the caller's cancellation token.
#[derive(Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    default_timeout: Duration,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            default_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub async fn execute(&self, ctx: &Context, name: &str, input: Value) -> Result<ToolOutput> {
        let execute_timeout = ctx
            .remaining()
            .unwrap_or(self.default_timeout)
            .min(self.default_timeout);

        info!(tool = name, "Executing tool");

        let cancellation = ctx.cancellation_token();
        let result = tokio::select! {
            _ = cancellation.cancelled() => Err(ToolError::Cancelled),
            outcome = timeout(execute_timeout, self.registry.invoke(ctx, name, input)) => {
                outcome.unwrap_or_else(|_| Err(ToolError::Timeout {
                    tool: name.to_string(),
                    after_ms: execute_timeout.as_millis() as u64,
                }))
            }
        };

        match &result {
            Ok(output) => info!(tool = name, bytes = output.content.len(), "Tool execution completed"),
            Err(e) => warn!(tool = name, kind = e.kind(), error = %e, "Tool execution failed"),
        }

        result
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn timeout(&self) -> Duration {
        self.default_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Tool;
    use async_trait::async_trait;
    use parley_core::ToolDefinition;
    use serde_json::json;

    struct EchoTool {
        def: ToolDefinition,
    }

    impl EchoTool {
        fn new() -> Self {
            Self {
                def: ToolDefinition::new("echo", "Echoes input"),
            }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> &ToolDefinition {
            &self.def
        }

        async fn execute(&self, _ctx: &Context, input: Value) -> Result<ToolOutput> {
            Ok(ToolOutput::text(input.to_string()))
        }
    }

    struct SlowTool {
        def: ToolDefinition,
    }

    impl SlowTool {
        fn new() -> Self {
            Self {
                def: ToolDefinition::new("slow", "A slow tool"),
            }
        }
    }

    #[async_trait]
    impl Tool for SlowTool {
        fn definition(&self) -> &ToolDefinition {
            &self.def
        }

        async fn execute(&self, _ctx: &Context, _input: Value) -> Result<ToolOutput> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(ToolOutput::text("done"))
        }
    }

    fn executor() -> ToolExecutor {
        let registry = ToolRegistry::builder()
            .tool(EchoTool::new())
            .unwrap()
            .tool(SlowTool::new())
            .unwrap()
            .build();
        ToolExecutor::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_executor_execute() {
        let output = executor()
            .execute(&Context::new(), "echo", json!({"message": "hello"}))
            .await
            .unwrap();

        assert!(output.content.contains("hello"));
    }

    #[tokio::test]
    async fn test_executor_unknown_tool() {
        let result = executor().execute(&Context::new(), "nonexistent", Value::Null).await;
        assert!(matches!(result, Err(ToolError::UnknownTool(_))));
    }

    #[tokio::test]
    async fn test_executor_timeout() {
        let executor = executor().with_timeout(Duration::from_millis(50));
        let result = executor.execute(&Context::new(), "slow", Value::Null).await;
        assert!(matches!(result, Err(ToolError::Timeout { after_ms: 50, .. })));
    }

    #[tokio::test]
    async fn test_executor_context_deadline_wins() {
        let ctx = Context::new().with_timeout(Duration::from_millis(50));
        let result = executor().execute(&ctx, "slow", Value::Null).await;
        assert!(matches!(result, Err(ToolError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_executor_cancellation() {
        let ctx = Context::new();
        let token = ctx.cancellation_token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let result = executor().execute(&ctx, "slow", Value::Null).await;
        assert!(matches!(result, Err(ToolError::Cancelled)));
    }
}
