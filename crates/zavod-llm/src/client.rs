//! JSON-constrained chat-completion client.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use zavod_core::AppConfig;

use crate::error::LlmError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const TEMPERATURE: f32 = 0.3;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("valid fence regex"));

/// A text-generation backend that answers with one JSON object.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a system instruction and a user prompt, returning the parsed
    /// JSON object from the reply.
    async fn complete_json(&self, system: &str, user: &str) -> Result<Value, LlmError>;
}

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock or
    /// for compatible gateways).
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("zavod/0.1 (carousel-pipeline)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.to_owned(),
        })
    }

    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] when no key is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, LlmError> {
        let api_key = config
            .openai_api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey)?;
        Self::with_base_url(
            api_key,
            &config.openai_model,
            config.request_timeout_secs,
            &config.openai_base_url,
        )
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete_json(&self, system: &str, user: &str) -> Result<Value, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let envelope: Value = serde_json::from_str(&body).map_err(|e| LlmError::Deserialize {
            context: "chat completion".to_string(),
            source: e,
        })?;

        let content = envelope
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                LlmError::UnexpectedResponse("missing choices[0].message.content".to_string())
            })?;

        tracing::debug!(model = %self.model, chars = content.len(), "completion received");
        parse_json_object(content)
    }
}

/// Strip a Markdown code fence around a JSON object, if present.
#[must_use]
pub fn extract_json_block(content: &str) -> &str {
    if content.contains("```") {
        if let Some(inner) = FENCED_BLOCK
            .captures_iter(content)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().trim())
            .find(|block| block.starts_with('{') && block.ends_with('}'))
        {
            return inner;
        }
    }
    content.trim()
}

/// Parse model output into a JSON object.
///
/// # Errors
///
/// Returns [`LlmError::InvalidJson`] when the content is not valid JSON or
/// is valid JSON but not an object.
pub fn parse_json_object(content: &str) -> Result<Value, LlmError> {
    let block = extract_json_block(content);
    let value: Value = serde_json::from_str(block)
        .map_err(|e| LlmError::InvalidJson(format!("{e}: {}", preview(block))))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(LlmError::InvalidJson(format!(
            "expected an object: {}",
            preview(block)
        )))
    }
}

fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 200;
    if text.chars().count() <= MAX_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX_CHARS).collect();
        format!("{cut}...")
    }
}
