//! HTTP helpers shared by completion providers.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::ChatError;

/// Build a reqwest client whose requests give up after `timeout`.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, ChatError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(4)
        .build()
        .map_err(ChatError::Network)
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> ChatError {
    match status {
        401 | 403 => ChatError::Authentication(body.to_string()),
        429 => ChatError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => ChatError::api(status, body),
    }
}

/// Map a transport error, folding timeouts into [`ChatError::Timeout`].
pub fn transport_error(err: reqwest::Error, timeout: Duration) -> ChatError {
    if err.is_timeout() {
        ChatError::Timeout(timeout.as_millis() as u64)
    } else {
        ChatError::Network(err)
    }
}

fn extract_retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}
