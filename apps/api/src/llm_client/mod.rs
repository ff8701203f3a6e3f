//! LLM Client: the single point of entry for all model calls in the adviser.
//!
//! ARCHITECTURAL RULE: No other module may call the OpenAI API directly.
//! All LLM interactions MUST go through this module.
//!
//! Model: gpt-4o-mini-2024-07-18 at temperature 0 (hardcoded; do not make configurable)
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

/// The model used for all LLM calls in the adviser.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gpt-4o-mini-2024-07-18";
const TEMPERATURE: f32 = 0.0;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM did not call the `{0}` tool")]
    MissingToolCall(String),

    #[error("Arguments of the `{tool}` tool are not a JSON object: {arguments}")]
    NonObjectArguments { tool: String, arguments: Value },
}

/// A function the model is forced to call; its arguments are the structured output.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema of the tool's parameters.
    pub parameters: Value,
}

impl ToolSpec {
    fn to_openai_format(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// The two ways the pipeline talks to a model. Callers pick the variant per stage.
///
/// Carried as `Arc<dyn ChatModel>` so stages can be driven by stubs in tests.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Free-text completion; returns the assistant message verbatim.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError>;

    /// Forced tool call; returns the parsed arguments of the first call to `tool`.
    async fn call_tool(&self, system: &str, prompt: &str, tool: &ToolSpec)
        -> Result<Value, LlmError>;
}

/// Calls `tool` and deserializes its arguments into `T`.
///
/// Tool parameters are always an object schema, so any other JSON value is
/// rejected before serde sees it (derived structs also accept positional arrays).
pub async fn call_tool_as<T: DeserializeOwned>(
    model: &dyn ChatModel,
    system: &str,
    prompt: &str,
    tool: &ToolSpec,
) -> Result<T, LlmError> {
    let arguments = model.call_tool(system, prompt, tool).await?;
    if !arguments.is_object() {
        return Err(LlmError::NonObjectArguments {
            tool: tool.name.to_string(),
            arguments,
        });
    }
    serde_json::from_value(arguments).map_err(LlmError::Parse)
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ResponseToolCall>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseToolCall {
    pub function: FunctionCall,
}

#[derive(Debug, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments, as a string.
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }

    /// Raw arguments of the first call to the named tool.
    pub fn tool_arguments(&self, name: &str) -> Option<&str> {
        self.choices
            .first()?
            .message
            .tool_calls
            .iter()
            .find(|c| c.function.name == name)
            .map(|c| c.function.arguments.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    error: OpenAIErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorBody {
    message: String,
}

/// The single LLM client used by all services in the adviser.
/// Wraps the OpenAI Chat Completions API. One attempt per call, no retries.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Makes a raw call to the Chat Completions API, returning the full response object.
    async fn call(
        &self,
        request_body: &ChatCompletionRequest<'_>,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let start = std::time::Instant::now();

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            // Try to parse error message
            let message = serde_json::from_str::<OpenAIError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}, duration_ms={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                start.elapsed().as_millis()
            );
        }

        Ok(completion)
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatCompletionRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            messages: messages(system, prompt),
            tools: None,
            tool_choice: None,
        };

        let response = self.call(&request_body).await?;

        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    async fn call_tool(
        &self,
        system: &str,
        prompt: &str,
        tool: &ToolSpec,
    ) -> Result<Value, LlmError> {
        let request_body = ChatCompletionRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            messages: messages(system, prompt),
            tools: Some(vec![tool.to_openai_format()]),
            tool_choice: Some(json!({
                "type": "function",
                "function": { "name": tool.name }
            })),
        };

        let response = self.call(&request_body).await?;

        let arguments = response
            .tool_arguments(tool.name)
            .ok_or_else(|| LlmError::MissingToolCall(tool.name.to_string()))?;

        serde_json::from_str(strip_json_fences(arguments)).map_err(LlmError::Parse)
    }
}

fn messages<'a>(system: &'a str, prompt: &'a str) -> Vec<ChatMessage<'a>> {
    let mut messages = Vec::with_capacity(2);
    if !system.is_empty() {
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: prompt,
    });
    messages
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
