pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use server::{shutdown_signal, Server};
pub use state::AppState;

pub mod prelude {
    pub use crate::config::ServerConfig;
    pub use crate::error::{Result, ServerError};
    pub use crate::server::{shutdown_signal, Server};
    pub use crate::state::AppState;
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use parley_agent::Agent;
    use parley_core::{ToolDefinition, ToolParameter, ToolUse};
    use parley_llm::{CompletionRequest, CompletionResponse, LlmError, LlmProvider, ModelReply};
    use parley_tools::{FunctionTool, ToolRegistry};
    use std::collections::VecDeque;
    use std::sync::Arc;

    pub type Scripted = std::result::Result<ModelReply, LlmError>;

    pub struct MockLlm {
        replies: Mutex<VecDeque<Scripted>>,
    }

    #[async_trait]
    impl LlmProvider for MockLlm {
        fn name(&self) -> &str {
            "mock"
        }

        fn default_model(&self) -> &str {
            "mock"
        }

        async fn complete(&self, _request: CompletionRequest) -> std::result::Result<CompletionResponse, LlmError> {
            let next = self.replies.lock().pop_front();
            let reply = next.unwrap_or_else(|| Ok(ModelReply::final_text("Hi there")))?;
            Ok(CompletionResponse::new("id", "mock", reply))
        }
    }

    fn builder(replies: Vec<Scripted>) -> parley_agent::AgentBuilder {
        Agent::builder().llm(Arc::new(MockLlm {
            replies: Mutex::new(replies.into()),
        }))
    }

    pub fn test_agent(replies: Vec<Scripted>) -> Agent {
        builder(replies).build().unwrap()
    }

    pub fn test_agent_with_tools(replies: Vec<Scripted>) -> Agent {
        let add_fee = FunctionTool::typed(
            ToolDefinition::new("add_fee", "Adds a 30% fee to an amount")
                .with_required_param("amount", ToolParameter::number()),
            |args: serde_json::Value| Ok(format!("{}", args["amount"].as_f64().unwrap_or_default() * 1.3)),
        );
        let registry = ToolRegistry::builder().tool(add_fee).unwrap().build();
        builder(replies).tool_registry(Arc::new(registry)).build().unwrap()
    }

    pub fn add_fee_call(amount: u32) -> ModelReply {
        ModelReply::ToolCalls {
            text: String::new(),
            calls: vec![ToolUse::new("c1", "add_fee", serde_json::json!({"amount": amount}))],
        }
    }
}
