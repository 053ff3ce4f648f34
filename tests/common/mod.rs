//! Shared test helpers: mock provider, canned responders and a live test server.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{COOKIE, SET_COOKIE};

use pocketchat::completion::Responder;
use pocketchat::config::ChatConfig;
use pocketchat::error::ChatError;
use pocketchat::provider::{CompletionProvider, CompletionRequest, CompletionResponse};
use pocketchat::types::Message;
use pocketchat::util::retry::RetryPolicy;
use pocketchat::web::{self, AppState};

/// A mock provider that returns queued outcomes and records every request.
pub struct MockProvider {
    outcomes: Mutex<VecDeque<Result<CompletionResponse, ChatError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    delay: Option<Duration>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// A provider that sleeps before answering every call.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    /// Queue a text response.
    pub fn queue_text(&self, text: &str) {
        self.push(Ok(CompletionResponse {
            text: Some(text.to_string()),
            finish_reason: Some("stop".to_string()),
        }));
    }

    /// Queue a response without content.
    pub fn queue_no_content(&self) {
        self.push(Ok(CompletionResponse::default()));
    }

    pub fn queue_error(&self, error: ChatError) {
        self.push(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    fn push(&self, outcome: Result<CompletionResponse, ChatError>) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, ChatError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.outcomes.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            Ok(CompletionResponse {
                text: Some("Mock response".to_string()),
                finish_reason: Some("stop".to_string()),
            })
        })
    }
}

/// Retry policy with a negligible pause, for tests on real time.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        delay: Duration::from_millis(1),
    }
}

/// Responder that always answers with the same text.
pub struct StaticResponder(pub String);

#[async_trait]
impl Responder for StaticResponder {
    async fn get_response(&self, _message: &str, _history: &[Message]) -> Result<String, ChatError> {
        Ok(self.0.clone())
    }
}

/// Responder that always fails.
pub struct FailingResponder;

#[async_trait]
impl Responder for FailingResponder {
    async fn get_response(&self, _message: &str, _history: &[Message]) -> Result<String, ChatError> {
        Err(ChatError::Configuration("responder exploded".into()))
    }
}

/// A running server plus a cookie-carrying client that does not follow redirects.
pub struct TestApp {
    pub base_url: String,
    pub state: AppState,
    http: reqwest::Client,
    cookie: Mutex<Option<String>>,
}

pub async fn spawn_app(responder: Arc<dyn Responder>) -> TestApp {
    let config = ChatConfig {
        session_secret: "test-secret".to_string(),
        ..ChatConfig::default()
    };
    let state = AppState::new(&config, responder);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_state = state.clone();
    tokio::spawn(async move {
        web::serve_with_shutdown(listener, server_state, std::future::pending())
            .await
            .unwrap();
    });

    TestApp {
        base_url: format!("http://{addr}"),
        state,
        http: reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap(),
        cookie: Mutex::new(None),
    }
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        let request = self.http.get(format!("{}{path}", self.base_url));
        self.send(request).await
    }

    pub async fn post_message(&self, message: &str) -> reqwest::Response {
        let request = self
            .http
            .post(format!("{}/chat", self.base_url))
            .form(&[("message", message)]);
        self.send(request).await
    }

    /// POST to `/chat` with an arbitrary body and optional content type.
    pub async fn post_raw(&self, content_type: Option<&str>, body: &str) -> reqwest::Response {
        let mut request = self
            .http
            .post(format!("{}/chat", self.base_url))
            .body(body.to_string());
        if let Some(content_type) = content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        self.send(request).await
    }

    /// Body of the chat page.
    pub async fn chat_page(&self) -> String {
        self.get("/chat").await.text().await.unwrap()
    }

    /// Replace the stored session cookie.
    pub fn set_cookie(&self, cookie: &str) {
        *self.cookie.lock().unwrap() = Some(cookie.to_string());
    }

    pub fn forget_cookie(&self) {
        *self.cookie.lock().unwrap() = None;
    }

    pub fn cookie(&self) -> Option<String> {
        self.cookie.lock().unwrap().clone()
    }

    async fn send(&self, mut request: reqwest::RequestBuilder) -> reqwest::Response {
        if let Some(cookie) = self.cookie() {
            request = request.header(COOKIE, cookie);
        }
        let response = request.send().await.unwrap();
        if let Some(set) = response.headers().get(SET_COOKIE) {
            let pair = set.to_str().unwrap().split(';').next().unwrap().to_string();
            self.set_cookie(&pair);
        }
        response
    }
}

/// Number of rendered chat messages in a page body.
pub fn message_count(body: &str) -> usize {
    body.matches("class=\"msg ").count()
}
