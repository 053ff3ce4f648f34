//! Completion provider trait and the Groq implementation.

pub mod groq;
pub mod http;

use async_trait::async_trait;

use crate::error::ChatError;
use crate::types::Message;

pub use groq::GroqProvider;

/// A request sent to a completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// Response from a provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionResponse {
    /// Generated text; `None` when the API returned no content.
    pub text: Option<String>,
    pub finish_reason: Option<String>,
}

/// Core trait implemented by completion transports.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g., "groq").
    fn provider_name(&self) -> &str;

    /// Run a single, non-streaming chat completion.
    async fn complete(&self, request: &CompletionRequest)
        -> Result<CompletionResponse, ChatError>;
}
