use crate::PredictError;
use rand::{Rng, rng};
use std::time::Duration;

/// Exponential backoff with jitter for idempotent reads.
///
/// Only errors reporting [`PredictError::is_transient`] are retried; anything
/// else is returned on the first failure.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub async fn retry_async<F, Fut, T>(&self, mut f: F) -> Result<T, PredictError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, PredictError>>,
    {
        let mut attempt = 0u32;
        loop {
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries || !e.is_transient() {
                        return Err(e);
                    }
                    // exponential backoff with jitter
                    let max_delay = self.base_delay * (1u32 << attempt.min(16));
                    let max_ms = (max_delay.as_millis() as u64).max(1);
                    let jitter = rng().random_range(0..max_ms);
                    tracing::debug!(attempt, delay_ms = jitter, error = %e, "retrying read");
                    tokio::time::sleep(Duration::from_millis(jitter)).await;
                }
            }
        }
    }
}
