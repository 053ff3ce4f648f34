//! Completion client: one outbound chat completion with bounded retry and
//! fixed fallback replies.
//!
//! [`CompletionClient::get_response`] never fails. Every failure mode maps to
//! one of the canned strings below, so the web layer always has something to
//! show the user.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use tracing::{error, info};

use crate::config::{ChatConfig, DEFAULT_MODEL};
use crate::error::ChatError;
use crate::provider::{CompletionProvider, CompletionRequest, GroqProvider};
use crate::types::Message;
use crate::util::retry::RetryPolicy;
use crate::util::text::{ellipsize, truncate_chars};

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. Keep responses short and clear for mobile users. Limit responses to 2-3 sentences maximum.";

pub const SERVICE_UNAVAILABLE: &str = "Sorry, the AI service is not available.";
pub const EMPTY_RESPONSE: &str = "Sorry, I couldn't generate a response.";
pub const TIMEOUT_FALLBACK: &str = "Network timeout. Please try again with a shorter message.";
pub const CONNECTIVITY_FALLBACK: &str = "Sorry, I'm having trouble connecting. Please try again.";

/// Max characters of the current user message sent upstream.
pub const INPUT_CHARS: usize = 500;
/// Max characters of each history entry sent upstream.
pub const HISTORY_CHARS: usize = 200;
/// Max characters of a reply returned to the caller.
pub const OUTPUT_CHARS: usize = 300;
/// Trailing history slice considered for context; its last entry is the in-flight message.
pub const HISTORY_WINDOW: usize = 8;

/// Fixed request parameters for the completion call.
#[derive(Debug, Clone, Builder)]
pub struct CompletionSettings {
    #[builder(default = DEFAULT_MODEL.to_string())]
    pub model: String,
    #[builder(default = 150)]
    pub max_tokens: u32,
    #[builder(default = 0.7)]
    pub temperature: f64,
    /// Per-attempt timeout.
    #[builder(default = Duration::from_secs(15))]
    pub timeout: Duration,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Produces the assistant reply for a user message.
///
/// This is the seam the web layer depends on.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn get_response(&self, user_message: &str, history: &[Message])
        -> Result<String, ChatError>;
}

pub struct CompletionClient {
    provider: Option<Arc<dyn CompletionProvider>>,
    settings: CompletionSettings,
    retry: RetryPolicy,
}

impl CompletionClient {
    pub fn new(provider: Arc<dyn CompletionProvider>, settings: CompletionSettings) -> Self {
        Self {
            provider: Some(provider),
            settings,
            retry: RetryPolicy::default(),
        }
    }

    /// A client with no provider; every call returns [`SERVICE_UNAVAILABLE`].
    pub fn unavailable(settings: CompletionSettings) -> Self {
        Self {
            provider: None,
            settings,
            retry: RetryPolicy::default(),
        }
    }

    /// Build the Groq-backed client from configuration.
    ///
    /// A missing key or a transport that fails to build leaves the client
    /// unavailable rather than aborting startup.
    pub fn from_config(config: &ChatConfig) -> Self {
        let settings = CompletionSettings::builder()
            .model(config.model.clone())
            .build();

        let Some(api_key) = config.api_key.clone() else {
            error!("GROQ_API_KEY is not set; completion client disabled");
            return Self::unavailable(settings);
        };

        match GroqProvider::new(api_key, config.base_url.clone(), settings.timeout) {
            Ok(provider) => {
                info!(
                    model = %settings.model,
                    base_url = provider.base_url(),
                    "Completion client initialized"
                );
                Self::new(Arc::new(provider), settings)
            }
            Err(e) => {
                error!(error = %e, "Failed to initialize completion client");
                Self::unavailable(settings)
            }
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Assemble the message list sent upstream.
    ///
    /// `history` is expected to end with the in-flight user message, which is
    /// dropped from the context and re-added (truncated) at the end.
    pub fn build_messages(&self, user_message: &str, history: &[Message]) -> Vec<Message> {
        let mut messages = Vec::with_capacity(HISTORY_WINDOW + 1);
        messages.push(Message::system(SYSTEM_PROMPT));

        let window = &history[history.len().saturating_sub(HISTORY_WINDOW)..];
        if let Some((_in_flight, prior)) = window.split_last() {
            messages.extend(prior.iter().map(|m| Message {
                role: m.role,
                content: truncate_chars(&m.content, HISTORY_CHARS).to_string(),
            }));
        }

        messages.push(Message::user(truncate_chars(user_message, INPUT_CHARS)));
        messages
    }

    /// Ask the provider for a reply. Always returns displayable text.
    pub async fn get_response(&self, user_message: &str, history: &[Message]) -> String {
        let Some(provider) = self.provider.as_deref() else {
            error!("Completion client not initialized");
            return SERVICE_UNAVAILABLE.to_string();
        };

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: self.build_messages(user_message, history),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };
        let timeout = self.settings.timeout;

        let result = self
            .retry
            .execute(|attempt| {
                let request = &request;
                async move {
                    info!(
                        attempt,
                        provider = provider.provider_name(),
                        "Attempting completion call"
                    );
                    match tokio::time::timeout(timeout, provider.complete(request)).await {
                        Ok(response) => response,
                        Err(_) => Err(ChatError::Timeout(timeout.as_millis() as u64)),
                    }
                }
            })
            .await;

        match result {
            Ok(response) => {
                let text = match response.text {
                    Some(text) if !text.is_empty() => text.trim().to_string(),
                    _ => EMPTY_RESPONSE.to_string(),
                };
                let text = ellipsize(&text, OUTPUT_CHARS);
                info!(chars = text.chars().count(), "Received completion");
                text
            }
            Err(e) if e.is_timeout() => TIMEOUT_FALLBACK.to_string(),
            Err(_) => CONNECTIVITY_FALLBACK.to_string(),
        }
    }
}

#[async_trait]
impl Responder for CompletionClient {
    async fn get_response(
        &self,
        user_message: &str,
        history: &[Message],
    ) -> Result<String, ChatError> {
        Ok(CompletionClient::get_response(self, user_message, history).await)
    }
}
