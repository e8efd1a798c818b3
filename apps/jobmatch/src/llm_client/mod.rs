/// LLM Client — the single point of entry for all language-model calls.
///
/// Request parameters are fixed constants so identical queries over identical
/// listings produce comparable answers. One attempt per call, no retries.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::errors::AppError;

pub mod prompts;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
/// The model used for every recommendation.
pub const MODEL: &str = "gpt-3.5-turbo";
/// Low temperature keeps matching behavior stable across repeated queries.
pub const TEMPERATURE: f32 = 0.2;
pub const MAX_TOKENS: u32 = 500;
const REQUEST_TIMEOUT_SECS: u64 = 60;

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
}

/// Produces recommendation text for a rendered job context and a user query.
#[async_trait]
pub trait RecommendationClient: Send + Sync {
    async fn generate(&self, context: &str, query: &str) -> Result<String, AppError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
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
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if it carries any non-blank content.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// OpenAI Chat Completions client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, AppError> {
        Self::with_base_url(api_key, OPENAI_API_BASE)
    }

    /// Points the client at another OpenAI-compatible base URL (e.g. a local mock).
    pub(crate) fn with_base_url(api_key: String, base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::ExternalService(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            api_url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    /// Makes one chat completion call and returns the full response object.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let chat: ChatResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(chat)
    }
}

#[async_trait]
impl RecommendationClient for LlmClient {
    async fn generate(&self, context: &str, query: &str) -> Result<String, AppError> {
        let prompt = prompts::build_user_prompt(context, query);
        let result = self
            .call(&prompt, prompts::RECOMMENDATION_SYSTEM)
            .await
            .and_then(|response| {
                response
                    .text()
                    .map(str::to_string)
                    .ok_or(LlmError::EmptyContent)
            });

        result.map_err(|e| {
            error!("OpenAI API error: {e}");
            AppError::ExternalService(format!("Recommendation generation failed: {e}"))
        })
    }
}

/// Pulls the human-readable message out of an OpenAI error body, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<OpenAiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}
