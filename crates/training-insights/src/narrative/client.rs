use std::future::Future;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::prompt::SYSTEM_PROMPT;
use crate::config::NarrativeConfig;

/// Returned when the provider answers without any message content.
pub const FALLBACK_NARRATIVE: &str = "Unable to generate insights at this time.";

/// Generated prose plus whether the provider cut it short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative {
    pub text: String,
    pub truncated: bool,
}

/// Text-generation capability fed by the narrative prompt. Implementations
/// are constructed once and shared; they do not retry.
pub trait NarrativeGenerator: Send + Sync {
    fn generate(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<Narrative, NarrativeError>> + Send;
}

/// Error enumeration for text-generation failures.
#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("OpenAI API key not configured")]
    MissingApiKey,
    #[error("text generation provider rejected the API key")]
    Authentication,
    #[error("text generation provider rate limit exceeded")]
    RateLimited { retry_after_secs: Option<u64> },
    #[error("text generation API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the OpenAI chat completions API.
pub struct OpenAiClient {
    config: NarrativeConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: NarrativeConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

impl NarrativeGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<Narrative, NarrativeError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(NarrativeError::MissingApiKey)?;

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;
        let completion = check_response(response)
            .await?
            .json::<ChatCompletionResponse>()
            .await?;

        let choice = completion.choices.into_iter().next();
        let truncated = choice
            .as_ref()
            .and_then(|choice| choice.finish_reason.as_deref())
            == Some("length");
        if truncated {
            warn!(
                max_tokens = self.config.max_tokens,
                "narrative truncated by token limit; consider raising OPENAI_MAX_TOKENS"
            );
        }

        let text = choice
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| FALLBACK_NARRATIVE.to_string());

        Ok(Narrative { text, truncated })
    }
}

/// Maps provider status codes onto [`NarrativeError`] kinds.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, NarrativeError> {
    match response.status() {
        StatusCode::UNAUTHORIZED => Err(NarrativeError::Authentication),
        StatusCode::TOO_MANY_REQUESTS => Err(NarrativeError::RateLimited {
            retry_after_secs: parse_retry_after(&response),
        }),
        status if !status.is_success() => Err(NarrativeError::Api {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        }),
        _ => Ok(response),
    }
}

fn parse_retry_after(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}
