//! AI completion gateway client
//!
//! One chat-style POST (system + user message) to an OpenAI-compatible
//! chat completions endpoint. The reply text is returned as-is; callers
//! pull the JSON object out of it with [`extract_json_object`] because
//! models sometimes wrap it in prose or markdown fences.

use async_trait::async_trait;
use coursehub_common::config::AiConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("CourseHub/", env!("CARGO_PKG_VERSION"));

/// AI gateway client errors
#[derive(Debug, Error)]
pub enum AiGatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("AI API key not configured")]
    MissingApiKey,
}

/// Text completion seam; faked in tests
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one system + user message pair and return the reply text
    async fn complete(&self, system: &str, user: &str) -> Result<String, AiGatewayError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// HTTP client for the chat completions endpoint
pub struct AiGatewayClient {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    timeout: Duration,
    api_key: Option<String>,
}

impl AiGatewayClient {
    /// Build a client from configuration
    ///
    /// A missing API key is allowed; every call then fails with
    /// [`AiGatewayError::MissingApiKey`] and callers fall back.
    pub fn new(config: &AiConfig, api_key: Option<String>) -> Result<Self, AiGatewayError> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AiGatewayError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout,
            api_key,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl CompletionClient for AiGatewayClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AiGatewayError> {
        let api_key = self.api_key.as_deref().ok_or(AiGatewayError::MissingApiKey)?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "Calling AI gateway");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiGatewayError::Timeout(self.timeout)
                } else {
                    AiGatewayError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AiGatewayError::Api(status.as_u16(), error_text));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AiGatewayError::Timeout(self.timeout)
            } else {
                AiGatewayError::Parse(e.to_string())
            }
        })?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AiGatewayError::Parse("response has no message content".to_string()))
    }
}

/// First balanced `{...}` object in `text`
///
/// Braces inside JSON string literals are ignored. Returns `None` when no
/// opening brace exists or the object is never closed.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}
