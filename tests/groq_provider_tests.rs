//! Groq provider tests against a mock HTTP server.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::fast_retry;
use pocketchat::completion::{
    CompletionClient, CompletionSettings, CONNECTIVITY_FALLBACK, SERVICE_UNAVAILABLE,
    TIMEOUT_FALLBACK,
};
use pocketchat::config::ChatConfig;
use pocketchat::error::ChatError;
use pocketchat::provider::{CompletionProvider, CompletionRequest, GroqProvider};
use pocketchat::types::Message;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, api_key: Option<&str>) -> ChatConfig {
    ChatConfig {
        api_key: api_key.map(str::to_string),
        base_url: Some(server.uri()),
        ..ChatConfig::default()
    }
}

fn completion_body(content: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

fn simple_request() -> CompletionRequest {
    CompletionRequest {
        model: "llama-3.1-8b-instant".to_string(),
        messages: vec![Message::user("hi")],
        max_tokens: 150,
        temperature: 0.7,
    }
}

fn provider_for(server: &MockServer) -> GroqProvider {
    GroqProvider::new(
        "gsk_test".to_string(),
        Some(server.uri()),
        Duration::from_secs(5),
    )
    .expect("provider")
}

#[tokio::test]
async fn chat_completion_happy_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer gsk_test"))
        .and(body_partial_json(json!({
            "model": "llama-3.1-8b-instant",
            "max_tokens": 150,
            "temperature": 0.7,
            "messages": [
                {"role": "system"},
                {"role": "user", "content": "What is Rust?"}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(json!(" A systems language. "))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = CompletionClient::from_config(&config_for(&server, Some("gsk_test")));
    let history = vec![Message::user("What is Rust?")];

    let reply = client.get_response("What is Rust?", &history).await;

    assert_eq!(reply, "A systems language.");
}

#[tokio::test]
async fn missing_key_never_reaches_the_api() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!("nope"))))
        .expect(0)
        .mount(&server)
        .await;

    let client = CompletionClient::from_config(&config_for(&server, None));

    assert_eq!(client.get_response("hi", &[]).await, SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn server_errors_are_retried_three_times() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream failure"))
        .expect(3)
        .mount(&server)
        .await;

    let client = CompletionClient::from_config(&config_for(&server, Some("gsk_test")))
        .with_retry_policy(fast_retry());

    assert_eq!(client.get_response("hi", &[]).await, CONNECTIVITY_FALLBACK);
}

#[tokio::test]
async fn slow_upstream_maps_to_timeout_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(json!("too late")))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let settings = CompletionSettings::builder()
        .timeout(Duration::from_millis(100))
        .build();
    let provider = GroqProvider::new("gsk_test".to_string(), Some(server.uri()), settings.timeout)
        .expect("provider");
    let client = CompletionClient::new(Arc::new(provider), settings).with_retry_policy(fast_retry());

    assert_eq!(client.get_response("hi", &[]).await, TIMEOUT_FALLBACK);
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .complete(&simple_request())
        .await
        .unwrap_err();

    match err {
        ChatError::Authentication(message) => assert_eq!(message, "invalid api key"),
        other => panic!("expected authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_carries_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"error": {"retry_after": 2.0}})),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .complete(&simple_request())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ChatError::RateLimited {
            retry_after_ms: Some(2000)
        }
    ));
}

#[tokio::test]
async fn response_without_choices_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .complete(&simple_request())
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::Api { status: 200, .. }));
}

#[tokio::test]
async fn null_content_is_returned_as_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!(null))))
        .mount(&server)
        .await;

    let response = provider_for(&server)
        .complete(&simple_request())
        .await
        .unwrap();

    assert_eq!(response.text, None);
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
}

#[test]
fn blank_key_is_rejected_at_construction() {
    let result = GroqProvider::new("  ".to_string(), None, Duration::from_secs(1));
    assert!(matches!(result, Err(ChatError::Configuration(_))));
}

#[test]
fn trailing_slash_in_base_url_is_ignored() {
    let provider = GroqProvider::new(
        "gsk_test".to_string(),
        Some("http://localhost:1234/v1/".to_string()),
        Duration::from_secs(1),
    )
    .unwrap();
    assert_eq!(provider.base_url(), "http://localhost:1234/v1");
}
