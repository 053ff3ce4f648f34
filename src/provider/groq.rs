//! Groq provider (OpenAI-compatible Chat Completions API).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ChatError;
use crate::types::Message;

use super::http::{bearer_headers, build_client, status_to_error, transport_error};
use super::{CompletionProvider, CompletionRequest, CompletionResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub struct GroqProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GroqProvider {
    /// Build a provider; fails if the HTTP client cannot be constructed.
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ChatError> {
        if api_key.trim().is_empty() {
            return Err(ChatError::Configuration("Missing GROQ_API_KEY".into()));
        }
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    fn provider_name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, ChatError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionBody {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Groq chat completion"
        );

        let resp = self
            .client
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: ChatCompletionResponse = resp
            .json()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::api(200, "No choices in completion response"))?;

        Ok(CompletionResponse {
            text: choice.message.content,
            finish_reason: choice.finish_reason,
        })
    }
}

// Wire types

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
