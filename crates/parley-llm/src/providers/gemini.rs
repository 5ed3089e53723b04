use super::retry_after;
use crate::error::{LlmError, Result};
use crate::traits::LlmProvider;
use crate::types::{CompletionRequest, CompletionResponse, ModelReply, StopReason, TokenUsage, ToolChoice};
use async_trait::async_trait;
use parley_core::{ContentBlock, Message, Role, ToolDefinition, ToolUse};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Native `generateContent` client for Gemini models.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, base_url, Duration::from_secs(120))
    }

    pub fn with_options(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_model: "gemini-2.5-flash".to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    fn convert_messages(&self, messages: &[Message]) -> Vec<GeminiContent> {
        let mut contents = Vec::new();

        for msg in messages {
            let (role, parts) = match msg.role {
                // Folded into systemInstruction by build_body.
                Role::System => continue,
                Role::User => ("user", vec![GeminiPart::text(msg.text_content())]),
                Role::Assistant => {
                    let mut parts = Vec::new();
                    let text = msg.text_content();
                    if !text.is_empty() {
                        parts.push(GeminiPart::text(text));
                    }
                    for call in msg.tool_uses() {
                        parts.push(GeminiPart {
                            function_call: Some(GeminiFunctionCall {
                                id: None,
                                name: call.name.clone(),
                                args: call.input.clone(),
                            }),
                            thought_signature: call.signature.clone(),
                            ..Default::default()
                        });
                    }
                    ("model", parts)
                }
                Role::Tool => {
                    let parts = msg
                        .tool_results_iter()
                        .map(|tr| {
                            let response = if tr.is_error {
                                json!({ "error": tr.content })
                            } else {
                                json!({ "result": tr.content })
                            };
                            GeminiPart {
                                function_response: Some(GeminiFunctionResponse {
                                    name: tr.name.clone(),
                                    response,
                                }),
                                ..Default::default()
                            }
                        })
                        .collect();
                    ("user", parts)
                }
            };

            if !parts.is_empty() {
                contents.push(GeminiContent {
                    role: Some(role.to_string()),
                    parts,
                });
            }
        }

        contents
    }

    fn convert_tools(&self, tools: &[ToolDefinition]) -> Result<Value> {
        let declarations = tools
            .iter()
            .map(|t| {
                let mut decl = json!({
                    "name": t.name,
                    "description": t.description,
                });
                if let Some(params) = gemini_schema(serde_json::to_value(&t.parameters)?) {
                    decl["parameters"] = params;
                }
                Ok(decl)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(json!([{ "functionDeclarations": declarations }]))
    }

    fn convert_tool_choice(&self, choice: &ToolChoice) -> Value {
        let config = match choice {
            ToolChoice::Auto => json!({ "mode": "AUTO" }),
            ToolChoice::None => json!({ "mode": "NONE" }),
            ToolChoice::Required => json!({ "mode": "ANY" }),
            ToolChoice::Tool { name } => json!({ "mode": "ANY", "allowedFunctionNames": [name] }),
        };
        json!({ "functionCallingConfig": config })
    }

    fn build_body(&self, request: &CompletionRequest) -> Result<Value> {
        let mut body = json!({
            "contents": self.convert_messages(&request.messages),
        });

        let system: Vec<String> = request
            .system
            .iter()
            .cloned()
            .chain(
                request
                    .messages
                    .iter()
                    .filter(|m| m.role == Role::System)
                    .map(Message::text_content),
            )
            .collect();
        if !system.is_empty() {
            body["systemInstruction"] = json!({ "parts": [{ "text": system.join("\n\n") }] });
        }

        let mut generation = serde_json::Map::new();
        if let Some(temp) = request.temperature {
            generation.insert("temperature".into(), temp.into());
        }
        if let Some(max_tokens) = request.max_tokens {
            generation.insert("maxOutputTokens".into(), max_tokens.into());
        }
        if !generation.is_empty() {
            body["generationConfig"] = Value::Object(generation);
        }

        if let Some(tools) = request.tools.as_deref().filter(|t| !t.is_empty()) {
            body["tools"] = self.convert_tools(tools)?;
            if let Some(choice) = &request.tool_choice {
                body["toolConfig"] = self.convert_tool_choice(choice);
            }
        }

        Ok(body)
    }

    fn parse_response(&self, response: GeminiResponse, model: &str) -> Result<CompletionResponse> {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::invalid_response(format!("prompt blocked: {}", reason)));
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::invalid_response("No candidates in response"))?;

        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
        let blocks = parts.into_iter().map(GeminiPart::into_block).collect();
        let reply = ModelReply::from_blocks(blocks)?;

        let stop_reason = match candidate.finish_reason.as_deref() {
            Some("MAX_TOKENS") => StopReason::MaxTokens,
            Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
                StopReason::ContentFilter
            }
            _ if !reply.is_final() => StopReason::ToolUse,
            _ => StopReason::EndTurn,
        };

        let usage = response
            .usage_metadata
            .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();

        Ok(CompletionResponse::new(
            response.response_id.unwrap_or_default(),
            response.model_version.unwrap_or_else(|| model.to_string()),
            reply,
        )
        .with_usage(usage)
        .with_stop_reason(stop_reason))
    }
}

/// Gemini takes an OpenAPI subset: no `default`, and no empty object schemas.
fn gemini_schema(mut schema: Value) -> Option<Value> {
    strip_defaults(&mut schema);
    let empty_object = schema["type"] == "object"
        && schema
            .get("properties")
            .and_then(Value::as_object)
            .map_or(true, |p| p.is_empty());
    (!empty_object).then_some(schema)
}

fn strip_defaults(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.remove("default");
            map.values_mut().for_each(strip_defaults);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_defaults),
        _ => {}
    }
}

/// Gemini reports an invalid key as a 400, not a 401.
fn map_status(status: u16, body: &str, retry: Option<u64>) -> LlmError {
    if status == 400 && body.contains("API_KEY_INVALID") {
        return LlmError::AuthenticationFailed(format!("gemini rejected the API key: {}", body));
    }
    LlmError::from_status("gemini", status, body, retry)
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = self.build_body(&request)?;
        debug!(model = %request.model, messages = request.messages.len(), "Sending generateContent");

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let retry = retry_after(&response);
            let text = response.text().await.unwrap_or_default();
            return Err(map_status(status, &text, retry));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        self.parse_response(gemini_response, &request.model)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<GeminiFunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_response: Option<GeminiFunctionResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thought_signature: Option<String>,
}

impl GeminiPart {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Thought summaries and metadata-only parts carry no answer text.
    fn into_block(self) -> ContentBlock {
        if let Some(call) = self.function_call {
            let id = call
                .id
                .unwrap_or_else(|| format!("call_{}", Uuid::new_v4().simple()));
            let args = if call.args.is_null() {
                Value::Object(Default::default())
            } else {
                call.args
            };
            let mut tool_use = ToolUse::new(id, call.name, args);
            tool_use.signature = self.thought_signature;
            return ContentBlock::tool_use(tool_use);
        }

        match self.text {
            Some(text) if self.thought != Some(true) => ContentBlock::text(text),
            _ => ContentBlock::Unknown,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiFunctionCall {
    #[serde(default, skip_serializing)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiFunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
    usage_metadata: Option<GeminiUsage>,
    model_version: Option<String>,
    response_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::{ToolParameter, ToolResult};

    fn provider() -> GeminiProvider {
        GeminiProvider::new("test-key").unwrap()
    }

    fn parse(value: Value) -> Result<CompletionResponse> {
        let raw: GeminiResponse = serde_json::from_value(value).unwrap();
        provider().parse_response(raw, "gemini-2.5-flash")
    }

    #[test]
    fn test_provider_creation() {
        let provider = provider();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.default_model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_parse_drops_metadata_and_thought_parts() {
        let response = parse(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "A"},
                    {"thoughtSignature": "c2ln"},
                    {"text": "B"}
                ]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 2}
        }))
        .unwrap();

        assert_eq!(response.reply, ModelReply::final_text("AB"));
        assert_eq!(response.model, "gemini-2.5-flash");
        assert_eq!(response.usage.total(), 6);
    }

    #[test]
    fn test_parse_function_call() {
        let response = parse(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{
                    "functionCall": {"name": "planet_gravity", "args": {"planet": "mars"}},
                    "thoughtSignature": "c2ln"
                }]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        let calls = response.reply.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "planet_gravity");
        assert!(calls[0].id.starts_with("call_"));
        assert_eq!(calls[0].signature.as_deref(), Some("c2ln"));
        assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
    }

    #[test]
    fn test_parse_blocked_or_empty() {
        let err = parse(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));

        let err = parse(json!({"candidates": [{"finishReason": "SAFETY"}]})).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[test]
    fn test_body_shape() {
        let tools = vec![
            ToolDefinition::new("add_fee", "Adds a 30% fee").with_required_param(
                "amount",
                ToolParameter::number().with_default(json!(0)),
            ),
            ToolDefinition::new("ping", "No arguments"),
        ];

        let call = Message::new(
            Role::Assistant,
            vec![ContentBlock::tool_use(
                ToolUse::new("call_1", "add_fee", json!({"amount": 100})).with_signature("c2ln"),
            )],
        );
        let request = CompletionRequest::new(
            "gemini-2.5-flash",
            vec![
                Message::user("Fee on 100?"),
                call,
                Message::tool_results(vec![ToolResult::success("call_1", "130").with_name("add_fee")]),
            ],
        )
        .with_system("Be brief.")
        .with_tools(tools)
        .with_tool_choice(ToolChoice::Auto)
        .with_temperature(0.2);

        let body = provider().build_body(&request).unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be brief.");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][1]["parts"][0]["functionCall"]["name"], "add_fee");
        assert_eq!(body["contents"][1]["parts"][0]["thoughtSignature"], "c2ln");
        assert_eq!(body["contents"][2]["parts"][0]["functionResponse"]["name"], "add_fee");
        assert_eq!(
            body["contents"][2]["parts"][0]["functionResponse"]["response"]["result"],
            "130"
        );

        let decls = &body["tools"][0]["functionDeclarations"];
        assert!(decls[0]["parameters"]["properties"]["amount"].get("default").is_none());
        assert!(decls[1].get("parameters").is_none());
        assert_eq!(body["toolConfig"]["functionCallingConfig"]["mode"], "AUTO");
        assert!(body["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn test_invalid_key_maps_to_auth() {
        let err = map_status(400, r#"{"error":{"details":[{"reason":"API_KEY_INVALID"}]}}"#, None);
        assert!(err.is_auth());
        assert!(!map_status(400, "bad request", None).is_auth());
    }
}
