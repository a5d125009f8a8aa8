/// LLM Client: the single point of entry for text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call the generation API directly.
/// Handlers depend on the `TextGenerator` trait; `LlmClient` is the production backend.
///
/// One attempt per call. A failed call surfaces as `LlmError` and the caller
/// answers the request with an error; personalization is never attempted on it.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

pub mod prompts;

pub const DEFAULT_API_URL: &str =
    "https://clovastudio.stream.ntruss.com/v3/chat-completions/HCX-007";
/// Model behind `DEFAULT_API_URL`. Logged at startup.
pub const MODEL: &str = "HCX-007";
const REQUEST_ID_HEADER: &str = "x-ncp-clovastudio-request-id";
const REQUEST_TIMEOUT_SECS: u64 = 120;
const MAX_COMPLETION_TOKENS: u32 = 20480;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Unexpected content type from generation API: {0}")]
    UnexpectedContent(String),
}

/// Anything that turns a system + user instruction into plain text.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    thinking: Thinking,
    top_p: f32,
    top_k: u32,
    max_completion_tokens: u32,
    temperature: f32,
    repetition_penalty: f32,
    seed: u32,
    include_ai_filters: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    #[serde(rename = "type")]
    part_type: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Thinking {
    effort: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub result: ChatResult,
}

#[derive(Debug, Deserialize)]
pub struct ChatResult {
    pub message: ChatResultMessage,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResultMessage {
    pub content: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Message content as one string. List content keeps only `text` segments,
    /// joined with newlines. The result is trimmed.
    pub fn text(&self) -> Result<String, LlmError> {
        let text = match &self.result.message.content {
            Value::String(s) => s.clone(),
            Value::Array(segments) => segments
                .iter()
                .filter(|seg| seg.get("type").and_then(Value::as_str) == Some("text"))
                .map(|seg| seg.get("text").and_then(Value::as_str).unwrap_or(""))
                .collect::<Vec<_>>()
                .join("\n"),
            other => return Err(LlmError::UnexpectedContent(type_name(other).to_string())),
        };
        Ok(text.trim().to_string())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    status: ApiErrorStatus,
}

#[derive(Debug, Deserialize)]
struct ApiErrorStatus {
    message: String,
}

/// Chat-completions client for the generation service.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_url: String, api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_url,
            api_key,
        })
    }

    /// Makes one call to the chat-completions endpoint and returns the parsed body.
    pub async fn call(&self, system: &str, user: &str) -> Result<ChatResponse, LlmError> {
        let request_body = build_request(system, user);
        let request_id = Uuid::new_v4();

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .header("Accept", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.status.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;

        if let Some(usage) = &chat.result.usage {
            debug!(
                "Generation call {} succeeded: prompt_tokens={}, completion_tokens={}",
                request_id, usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let text = self.call(system, user).await?.text()?;
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text)
    }
}

fn build_request<'a>(system: &'a str, user: &'a str) -> ChatRequest<'a> {
    let message = |role: &'a str, text: &'a str| ChatMessage {
        role,
        content: vec![TextPart {
            part_type: "text",
            text,
        }],
    };

    ChatRequest {
        messages: vec![message("system", system), message("user", user)],
        thinking: Thinking { effort: "low" },
        top_p: 0.8,
        top_k: 0,
        max_completion_tokens: MAX_COMPLETION_TOKENS,
        temperature: 0.3,
        repetition_penalty: 1.1,
        seed: 42,
        include_ai_filters: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(content: Value) -> ChatResponse {
        serde_json::from_value(json!({
            "status": {"code": "20000", "message": "OK"},
            "result": {
                "message": {"role": "assistant", "content": content},
                "usage": {"promptTokens": 10, "completionTokens": 20, "totalTokens": 30}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_text_from_string_content() {
        assert_eq!(response(json!("  {\"a\": 1}\n")).text().unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_text_from_segment_list() {
        let content = json!([
            {"type": "text", "text": "first"},
            {"type": "image", "url": "ignored"},
            {"type": "text", "text": "second"}
        ]);
        assert_eq!(response(content).text().unwrap(), "first\nsecond");
    }

    #[test]
    fn test_text_rejects_other_content() {
        assert!(matches!(
            response(json!(17)).text(),
            Err(LlmError::UnexpectedContent(kind)) if kind == "number"
        ));
    }

    #[test]
    fn test_usage_is_optional() {
        let parsed: ChatResponse =
            serde_json::from_value(json!({"result": {"message": {"content": "x"}}})).unwrap();
        assert!(parsed.result.usage.is_none());
    }

    #[test]
    fn test_request_serializes_in_api_shape() {
        let body = serde_json::to_value(build_request("sys", "usr")).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"][0]["type"], "text");
        assert_eq!(body["messages"][1]["content"][0]["text"], "usr");
        assert_eq!(body["maxCompletionTokens"], 20480);
        assert_eq!(body["includeAiFilters"], true);
        assert_eq!(body["thinking"]["effort"], "low");
        assert_eq!(body["topK"], 0);
        assert_eq!(body["seed"], 42);
    }
}
