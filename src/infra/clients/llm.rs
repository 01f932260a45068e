//! Groq chat completion client (OpenAI-compatible API).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{endpoint, http_client};
use crate::config::{Config, LLM_TIMEOUT_SECONDS};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// One single-turn completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

/// Text generation backend.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Whether the provider currently serves `model`.
    async fn model_available(&self, model: &str) -> AppResult<bool>;

    /// Run a completion and return the first choice's text.
    async fn complete(&self, request: CompletionRequest) -> AppResult<String>;
}

/// Groq API client.
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GroqClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            client: http_client(LLM_TIMEOUT_SECONDS)?,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(config.groq_base_url.clone(), config.groq_api_key())
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn model_available(&self, model: &str) -> AppResult<bool> {
        let response = self
            .client
            .get(endpoint(&self.base_url, &format!("models/{}", model)))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                tracing::debug!(model, %status, "Model probe rejected");
                Ok(false)
            }
        }
    }

    async fn complete(&self, request: CompletionRequest) -> AppResult<String> {
        let body = ChatRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
        };

        let response = self
            .client
            .post(endpoint(&self.base_url, "chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::upstream("completion returned no choices"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_shape() {
        let body = ChatRequest {
            model: "llama-3.1-8b-instant",
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
            max_tokens: 300,
            temperature: 0.3,
            top_p: 0.9,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama-3.1-8b-instant");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert_eq!(json["max_tokens"], 300);
    }

    #[test]
    fn response_with_null_content() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
