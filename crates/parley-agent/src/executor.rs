use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::event::AgentEvent;
use crate::response::{AgentResponse, ToolCallRecord};
use crate::transcript::Transcript;
use parley_core::{Context, Message, ToolResult, ToolUse};
use parley_llm::{CompletionRequest, LlmError, LlmProvider, ModelReply, TokenUsage};
use parley_tools::{ToolError, ToolExecutor};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const CORRECTIVE_PROMPT: &str = "Your previous reply could not be read. Reply again with either \
plain text for the user or a well-formed tool call.";

/// Runs one user turn: the bounded model/tool loop over a private working context.
///
/// The transcript is only written once a final answer exists, so a failed
/// turn leaves it exactly as it was.
#[derive(Clone)]
pub struct Executor {
    config: AgentConfig,
    llm: Arc<dyn LlmProvider>,
    tools: Option<Arc<ToolExecutor>>,
}

impl Executor {
    pub fn new(config: AgentConfig, llm: Arc<dyn LlmProvider>, tools: Option<Arc<ToolExecutor>>) -> Self {
        Self { config, llm, tools }
    }

    pub async fn execute(&self, transcript: &Transcript, user_input: &str) -> Result<AgentResponse> {
        self.run(transcript, user_input, None).await
    }

    /// Same as [`execute`](Self::execute), reporting progress on `tx`.
    /// A closed receiver does not stop the turn.
    pub async fn execute_stream(
        &self,
        transcript: &Transcript,
        user_input: &str,
        tx: mpsc::Sender<AgentEvent>,
    ) -> Result<AgentResponse> {
        let session_id = transcript.session_id().to_string();
        let _ = tx.send(AgentEvent::message_start(&session_id)).await;

        let result = self.run(transcript, user_input, Some(&tx)).await;

        match &result {
            Ok(response) => {
                let _ = tx.send(AgentEvent::text_complete(&response.text)).await;
                let _ = tx.send(AgentEvent::message_end(&session_id, response.iterations)).await;
            }
            Err(e) => {
                let _ = tx.send(AgentEvent::error(e.kind(), e.to_string())).await;
            }
        }

        result
    }

    async fn run(
        &self,
        transcript: &Transcript,
        user_input: &str,
        events: Option<&mpsc::Sender<AgentEvent>>,
    ) -> Result<AgentResponse> {
        let _turn = transcript.begin_turn().await;
        let session_id = transcript.session_id().to_string();

        let mut messages = transcript.context_messages(self.config.max_context_turns);
        messages.push(Message::user(user_input));

        let ctx = Context::new().with_session(&session_id);
        let mut tool_calls = Vec::new();
        let mut usage = TokenUsage::default();
        let mut iterations = 0;
        let mut parse_retries = 0;

        loop {
            if iterations >= self.config.max_iterations {
                warn!(session_id = %session_id, max = self.config.max_iterations, "No final answer within the round limit");
                return Err(AgentError::MaxIterationsExceeded(self.config.max_iterations));
            }

            info!(session_id = %session_id, iteration = iterations + 1, "Starting agent loop iteration");

            let request = self.build_request(messages.clone());
            let response = match self.llm.complete(request).await {
                Ok(response) => response,
                Err(e) if is_parse_failure(&e) && parse_retries < self.config.max_parse_retries => {
                    parse_retries += 1;
                    warn!(session_id = %session_id, retry = parse_retries, error = %e, "Unreadable model reply, asking again");
                    messages.push(Message::user(CORRECTIVE_PROMPT));
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            iterations += 1;
            usage += response.usage;

            let calls = match response.reply {
                ModelReply::Final { text } => {
                    transcript.record_exchange(user_input, &text);
                    info!(session_id = %session_id, iterations, tool_calls = tool_calls.len(), "Turn completed");

                    return Ok(AgentResponse::new(session_id, text)
                        .with_tool_calls(tool_calls)
                        .with_iterations(iterations)
                        .with_usage(usage));
                }
                reply => {
                    messages.push(reply.to_message());
                    reply.tool_calls().to_vec()
                }
            };

            let mut results = Vec::with_capacity(calls.len());
            for call in &calls {
                emit(events, AgentEvent::tool_use_start(&call.id, &call.name, call.input.clone())).await;

                let (result, record) = self.run_tool(&ctx, call).await?;
                emit(events, AgentEvent::tool_use_end(&record.id, &record.output, record.is_error)).await;

                results.push(result);
                tool_calls.push(record);
            }

            messages.push(Message::tool_results(results));
        }
    }

    fn model(&self) -> &str {
        if self.config.model.is_empty() {
            self.llm.default_model()
        } else {
            &self.config.model
        }
    }

    fn build_request(&self, messages: Vec<Message>) -> CompletionRequest {
        let mut request =
            CompletionRequest::new(self.model(), messages).with_temperature(self.config.temperature);

        if !self.config.system_prompt.is_empty() {
            request = request.with_system(&self.config.system_prompt);
        }

        if let Some(max_tokens) = self.config.max_tokens {
            request = request.with_max_tokens(max_tokens as u32);
        }

        if self.config.tools_enabled {
            if let Some(tools) = &self.tools {
                request = request.with_tools(tools.registry().list());
            }
        }

        request
    }

    /// Runs one requested call. Recoverable tool failures come back as an
    /// error observation for the model rather than aborting the turn.
    async fn run_tool(&self, ctx: &Context, call: &ToolUse) -> Result<(ToolResult, ToolCallRecord)> {
        let start = Instant::now();
        debug!(tool = %call.name, id = %call.id, "Executing tool");

        let outcome = match &self.tools {
            Some(tools) if self.config.tools_enabled => {
                tools.execute(&ctx.child(), &call.name, call.input.clone()).await
            }
            _ => Err(ToolError::unknown_tool(&call.name)),
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(output) => {
                let result = ToolResult::success(&call.id, &output.content).with_name(&call.name);
                let record = ToolCallRecord::success(&call.id, &call.name, call.input.clone(), output.content, duration_ms);
                Ok((result, record))
            }
            Err(e) if e.is_recoverable() => {
                let observation = e.observation();
                info!(tool = %call.name, kind = e.kind(), "Reporting tool failure to the model");
                let result = ToolResult::error(&call.id, &observation).with_name(&call.name);
                let record = ToolCallRecord::error(&call.id, &call.name, call.input.clone(), observation, duration_ms);
                Ok((result, record))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn is_parse_failure(err: &LlmError) -> bool {
    matches!(err, LlmError::InvalidResponse(_) | LlmError::Json(_))
}

async fn emit(events: Option<&mpsc::Sender<AgentEvent>>, event: AgentEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event).await;
    }
}
