use std::future::Future;
use std::time::Duration;

/// Retry schedule for one logical remote call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total invocations allowed, including the first. Clamped to at least 1.
    pub max_attempts: u32,
    /// Backoff before the first retry; doubles on each further retry.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    /// Backoff slept after failed attempt `i` (0-based): `initial × 2^i`.
    fn backoff_after(&self, failed_attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2u32.saturating_pow(failed_attempt))
    }
}

/// Drive `op` through the retry schedule until it succeeds or the schedule
/// is exhausted.
///
/// `op` is invoked up to `max_attempts` times; after failed attempt `i`
/// (0-based, not the last) the transport sleeps `initial_delay × 2^i` and
/// tries again. The final failure is returned to the caller unchanged — no
/// wrapping, so the caller classifies it. Every failure is treated as
/// retryable; there is no jitter and no cap on delay growth.
///
/// Pure control-flow wrapper: no side effects beyond the wrapped call's own.
pub async fn call<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut failed = 0u32;
    loop {
        match op().await {
            Ok(value) => {
                if failed > 0 {
                    tracing::info!(attempt = failed + 1, "remote call recovered after retries");
                }
                return Ok(value);
            }
            Err(err) if failed + 1 < max_attempts => {
                let delay = policy.backoff_after(failed);
                tracing::warn!(
                    attempt = failed + 1,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "remote call failed, retrying"
                );
                tokio::time::sleep(delay).await;
                failed += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
