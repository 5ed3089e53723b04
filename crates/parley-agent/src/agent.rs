use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::event::AgentEvent;
use crate::executor::Executor;
use crate::response::AgentResponse;
use crate::store::{MemorySessionStore, SessionStore};
use parley_core::ToolDefinition;
use parley_llm::LlmProvider;
use parley_tools::{ToolExecutor, ToolRegistry};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;

/// The responder: answers user utterances per session, calling tools as the
/// model asks for them.
pub struct Agent {
    config: AgentConfig,
    llm: Arc<dyn LlmProvider>,
    tools: Option<Arc<ToolExecutor>>,
    sessions: Arc<dyn SessionStore>,
}

impl Agent {
    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    /// Session transcripts, for callers that show or reset history.
    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Tool descriptors advertised to the model, in registration order.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        match &self.tools {
            Some(tools) if self.config.tools_enabled => tools.registry().list(),
            _ => Vec::new(),
        }
    }

    /// Answers `message` in the context of `session_id` and returns the final text.
    pub async fn respond(&self, session_id: &str, message: &str) -> Result<String> {
        let response = self.process(session_id, message).await?;
        Ok(response.text)
    }

    pub async fn process(&self, session_id: &str, message: &str) -> Result<AgentResponse> {
        let transcript = self.sessions.get_or_create(session_id).await?;
        self.executor().execute(&transcript, message).await
    }

    /// Runs the turn in the background and reports its progress as events.
    /// The stream ends after `MessageEnd` or `Error`.
    pub fn respond_stream(
        &self,
        session_id: &str,
        message: &str,
    ) -> impl Stream<Item = AgentEvent> + Send {
        let (tx, rx) = mpsc::channel(100);
        let executor = self.executor();
        let sessions = self.sessions.clone();
        let session_id = session_id.to_string();
        let message = message.to_string();

        tokio::spawn(async move {
            match sessions.get_or_create(&session_id).await {
                Ok(transcript) => {
                    let _ = executor.execute_stream(&transcript, &message, tx).await;
                }
                Err(e) => {
                    let _ = tx.send(AgentEvent::error(e.kind(), e.to_string())).await;
                }
            }
        });

        ReceiverStream::new(rx)
    }

    fn executor(&self) -> Executor {
        Executor::new(self.config.clone(), self.llm.clone(), self.tools.clone())
    }
}

#[derive(Default)]
pub struct AgentBuilder {
    config: Option<AgentConfig>,
    name: Option<String>,
    system_prompt: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
    max_iterations: Option<usize>,
    max_parse_retries: Option<usize>,
    tools_enabled: Option<bool>,
    llm: Option<Arc<dyn LlmProvider>>,
    tool_registry: Option<Arc<ToolRegistry>>,
    sessions: Option<Arc<dyn SessionStore>>,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn max_parse_retries(mut self, retries: usize) -> Self {
        self.max_parse_retries = Some(retries);
        self
    }

    pub fn tools_enabled(mut self, enabled: bool) -> Self {
        self.tools_enabled = Some(enabled);
        self
    }

    pub fn llm(mut self, llm: Arc<dyn LlmProvider>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = Some(registry);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(store);
        self
    }

    pub fn build(self) -> Result<Agent> {
        let llm = self.llm.ok_or_else(|| AgentError::config("LLM provider is required"))?;

        let mut config = self.config.unwrap_or_default();

        if let Some(name) = self.name {
            config.name = name;
        }
        if let Some(prompt) = self.system_prompt {
            config.system_prompt = prompt;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(temp) = self.temperature {
            config.temperature = temp;
        }
        if let Some(max) = self.max_tokens {
            config.max_tokens = Some(max);
        }
        if let Some(max) = self.max_iterations {
            config.max_iterations = max;
        }
        if let Some(retries) = self.max_parse_retries {
            config.max_parse_retries = retries;
        }
        if let Some(enabled) = self.tools_enabled {
            config.tools_enabled = enabled;
        }

        if config.max_iterations == 0 {
            return Err(AgentError::config("max_iterations must be at least 1"));
        }

        let tool_timeout = config.tool_timeout();
        let tools = self
            .tool_registry
            .map(|registry| Arc::new(ToolExecutor::new(registry).with_timeout(tool_timeout)));

        let sessions = self
            .sessions
            .unwrap_or_else(|| Arc::new(MemorySessionStore::new()));

        Ok(Agent {
            config,
            llm,
            tools,
            sessions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::StreamExt;
    use parley_core::{ToolDefinition, ToolParameter, ToolUse};
    use parley_llm::{CompletionRequest, CompletionResponse, LlmError, ModelReply};
    use parley_tools::FunctionTool;
    use serde_json::json;
    use std::collections::VecDeque;

    struct MockLlm {
        replies: parking_lot::Mutex<VecDeque<ModelReply>>,
    }

    impl MockLlm {
        fn new(replies: Vec<ModelReply>) -> Self {
            Self {
                replies: parking_lot::Mutex::new(replies.into()),
            }
        }
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
            let reply = self
                .replies
                .lock()
                .pop_front()
                .unwrap_or_else(|| ModelReply::final_text("Hello from mock!"));
            Ok(CompletionResponse::new("id", "mock", reply))
        }
    }

    fn add_fee_registry() -> Arc<ToolRegistry> {
        let tool = FunctionTool::typed(
            ToolDefinition::new("add_fee", "Adds a 30% fee to an amount")
                .with_required_param("amount", ToolParameter::number()),
            |args: serde_json::Value| {
                let amount = args["amount"].as_f64().ok_or("amount must be a number")?;
                Ok(format!("{}", amount * 1.3))
            },
        );
        Arc::new(ToolRegistry::builder().tool(tool).unwrap().build())
    }

    #[test]
    fn test_builder_missing_llm() {
        let result = Agent::builder().system_prompt("You are helpful").build();
        assert!(matches!(result, Err(AgentError::Config(_))));
    }

    #[test]
    fn test_builder_rejects_zero_iterations() {
        let result = Agent::builder()
            .llm(Arc::new(MockLlm::new(vec![])))
            .max_iterations(0)
            .build();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_respond_persists_exchange() {
        let agent = Agent::builder()
            .system_prompt("You are helpful.")
            .llm(Arc::new(MockLlm::new(vec![])))
            .build()
            .unwrap();

        let reply = agent.respond("s1", "Hi").await.unwrap();
        assert_eq!(reply, "Hello from mock!");

        agent.respond("s1", "Again").await.unwrap();
        let transcript = agent.sessions().get_or_create("s1").await.unwrap();
        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript.turns()[2].text, "Again");
    }

    #[tokio::test]
    async fn test_add_fee_scenario() {
        let agent = Agent::builder()
            .llm(Arc::new(MockLlm::new(vec![
                ModelReply::ToolCalls {
                    text: String::new(),
                    calls: vec![ToolUse::new("c1", "add_fee", json!({"amount": 100}))],
                },
                ModelReply::final_text("130"),
            ])))
            .tool_registry(add_fee_registry())
            .build()
            .unwrap();

        let response = agent.process("s1", "Add the fee to 100").await.unwrap();

        assert_eq!(response.text, "130");
        assert_eq!(response.tool_calls[0].output, "130");
        assert_eq!(agent.tool_definitions().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_then_get_is_empty() {
        let agent = Agent::builder()
            .llm(Arc::new(MockLlm::new(vec![])))
            .build()
            .unwrap();

        agent.respond("s1", "Hi").await.unwrap();
        agent.sessions().clear("s1").await.unwrap();

        let transcript = agent.sessions().get_or_create("s1").await.unwrap();
        assert!(transcript.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let agent = Agent::builder()
            .llm(Arc::new(MockLlm::new(vec![])))
            .build()
            .unwrap();

        agent.respond("a", "Hi").await.unwrap();
        let b = agent.sessions().get_or_create("b").await.unwrap();
        assert!(b.is_empty());
    }

    #[tokio::test]
    async fn test_respond_stream() {
        let agent = Agent::builder()
            .llm(Arc::new(MockLlm::new(vec![])))
            .build()
            .unwrap();

        let events: Vec<AgentEvent> = agent.respond_stream("s1", "Hi").collect().await;

        assert!(matches!(events.first(), Some(AgentEvent::MessageStart { .. })));
        assert!(events.contains(&AgentEvent::text_complete("Hello from mock!")));
        assert!(events.last().is_some_and(|e| e.is_end() && !e.is_error()));
    }

    #[tokio::test]
    async fn test_tools_disabled_hides_definitions() {
        let agent = Agent::builder()
            .llm(Arc::new(MockLlm::new(vec![])))
            .tool_registry(add_fee_registry())
            .tools_enabled(false)
            .build()
            .unwrap();

        assert!(agent.tool_definitions().is_empty());
    }
}
