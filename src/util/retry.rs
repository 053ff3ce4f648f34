//! Retry with a fixed pause between attempts.

use std::future::Future;
use std::time::Duration;

use crate::error::ChatError;

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Execute an async operation, retrying every failure until attempts run out.
    ///
    /// The closure receives the 1-based attempt number. On exhaustion the last
    /// error is returned.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, ChatError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ChatError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::error!(
                        attempt,
                        max_attempts,
                        category = ?e.category(),
                        error = %e,
                        "Completion attempt failed"
                    );

                    if attempt >= max_attempts {
                        return Err(e);
                    }

                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
