//! Bounded retry with exponential backoff for backend calls
//!
//! Every backend invocation (embedding or generation) goes through this
//! policy. Transient failures back off exponentially with jitter;
//! permanent failures surface immediately.

use crate::config::RetryConfig;
use crate::errors::{CommsError, Result};
use std::time::Duration;
use tokio::time::sleep;

/// Maximum delay cap between attempts (8 seconds)
const MAX_DELAY_MS: u64 = 8000;

/// Retry policy with binary exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
    enable_jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Create a retry policy from configuration
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: MAX_DELAY_MS,
            enable_jitter: true,
        }
    }

    /// Execute an operation, retrying transient failures
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !Self::is_retryable(&e) {
                        return Err(e);
                    }

                    attempt += 1;

                    if attempt > self.max_retries {
                        return Err(e);
                    }

                    sleep(self.calculate_delay(attempt)).await;
                }
            }
        }
    }

    /// Delay before the given attempt number (1-based)
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let exponential = self.base_delay_ms.saturating_mul(2u64.saturating_pow(attempt - 1));
        let delay_ms = exponential.min(self.max_delay_ms);

        // ±25% jitter to avoid thundering herds against a shared backend
        let final_delay = if self.enable_jitter {
            let jitter = (delay_ms / 4) as i64;
            let random_jitter = (rand::random::<f64>() * 2.0 - 1.0) * jitter as f64;
            ((delay_ms as i64) + random_jitter as i64).max(0) as u64
        } else {
            delay_ms
        };

        Duration::from_millis(final_delay)
    }

    /// Transient errors are retried; contract and input errors are not
    fn is_retryable(error: &CommsError) -> bool {
        match error {
            CommsError::Http(_) => true,
            CommsError::Backend(_) => true,
            CommsError::Timeout { .. } => true,
            CommsError::Json(_) => false,
            CommsError::Config(_) => false,
            CommsError::Load(_) => false,
            CommsError::IndexBuild(_) => false,
            CommsError::Retrieval(_) => false,
            CommsError::Generation(_) => false,
            CommsError::Io(_) => false,
            CommsError::Generic(_) => false,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}
