//! Bounded per-endpoint retry
//!
//! Rate limiting (HTTP 429) backs off exponentially and, once the retry
//! budget is spent, forces mock mode and tells the caller to synthesize.
//! Transport failures get exactly one jittered retry. Any other HTTP status
//! is handed back untouched so the orchestrator can move to the next
//! endpoint.

use super::Orchestrator;
use super::cancel::CancelSignal;
use super::envelope::GenerateRequest;
use super::transport::TransportResponse;
use crate::error::AssistantError;
use crate::metrics::AttemptOutcome;
use rand::Rng;
use std::time::Duration;

/// Backoff settings for one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Rate-limited responses tolerated per endpoint before mock mode is forced
    pub max_retries: u32,
    pub rate_limit_base_delay: Duration,
    pub rate_limit_jitter: Duration,
    pub transport_retry_min_delay: Duration,
    pub transport_retry_max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            rate_limit_base_delay: Duration::from_millis(2000),
            rate_limit_jitter: Duration::from_millis(1000),
            transport_retry_min_delay: Duration::from_millis(1000),
            transport_retry_max_delay: Duration::from_millis(2000),
        }
    }
}

/// Result of [`Orchestrator::make_request_with_retry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome {
    /// An HTTP response, successful or not
    Response(TransportResponse),
    /// Stop talking to the backend and synthesize locally
    UseMockData,
}

/// Delay before the retry following the `retry_index`-th rate-limited response
///
/// `base * 2^retry_index` plus up to `rate_limit_jitter` of uniform jitter.
pub fn rate_limit_delay<R: Rng>(policy: &RetryPolicy, retry_index: u32, rng: &mut R) -> Duration {
    let backoff = policy
        .rate_limit_base_delay
        .saturating_mul(1u32 << retry_index.min(16));
    let jitter_ms = u64::try_from(policy.rate_limit_jitter.as_millis()).unwrap_or(u64::MAX);
    backoff.saturating_add(Duration::from_millis(rng.random_range(0..=jitter_ms)))
}

/// Delay before the single retry after a transport failure
pub fn transport_retry_delay<R: Rng>(policy: &RetryPolicy, rng: &mut R) -> Duration {
    let min = policy.transport_retry_min_delay;
    let max = policy.transport_retry_max_delay.max(min);
    let min_ms = u64::try_from(min.as_millis()).unwrap_or(u64::MAX);
    let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    Duration::from_millis(rng.random_range(min_ms..=max_ms))
}

impl Orchestrator {
    /// Call one endpoint, retrying within the policy's budget
    ///
    /// # Errors
    ///
    /// - [`AssistantError::Cancelled`] when the shared deadline passes before
    ///   or during an attempt or backoff sleep
    /// - [`AssistantError::Transport`] when a transport failure repeats on the
    ///   single retry
    pub async fn make_request_with_retry(
        &self,
        endpoint: &str,
        prompt: &str,
        signal: &CancelSignal,
        max_retries: u32,
    ) -> Result<RetryOutcome, AssistantError> {
        if self.mode.is_locked_down() {
            tracing::debug!(endpoint = %endpoint, "Locked-down mode, skipping backend call");
            return Ok(RetryOutcome::UseMockData);
        }

        let body = GenerateRequest::new(prompt);
        let mut attempt: u32 = 0;
        let mut rate_limited: u32 = 0;
        let mut transport_retried = false;

        loop {
            if signal.is_cancelled() {
                return Err(AssistantError::Cancelled);
            }
            attempt += 1;

            tracing::debug!(
                endpoint = %endpoint,
                attempt,
                max_retries,
                "Sending request to backend"
            );

            let result = signal
                .guard(self.transport.post(endpoint, &self.settings.api_key, &body))
                .await?;

            match result {
                Ok(response) if response.is_success() => {
                    self.record_attempt(AttemptOutcome::Success);
                    return Ok(RetryOutcome::Response(response));
                }
                Ok(response) if response.is_rate_limited() => {
                    self.record_attempt(AttemptOutcome::RateLimited);
                    rate_limited += 1;

                    if rate_limited >= max_retries {
                        tracing::warn!(
                            endpoint = %endpoint,
                            attempt,
                            max_retries,
                            "Rate limit retries exhausted, switching to mock data"
                        );
                        self.mode.force_mock();
                        self.sync_mode_gauge();
                        return Ok(RetryOutcome::UseMockData);
                    }

                    let delay =
                        rate_limit_delay(&self.settings.retry, rate_limited - 1, &mut rand::rng());
                    tracing::warn!(
                        endpoint = %endpoint,
                        attempt,
                        max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Rate limited, backing off"
                    );
                    signal.sleep(delay).await?;
                }
                Ok(response) => {
                    self.record_attempt(AttemptOutcome::HttpError);
                    tracing::warn!(
                        endpoint = %endpoint,
                        attempt,
                        status = response.status,
                        "Backend returned non-success status"
                    );
                    return Ok(RetryOutcome::Response(response));
                }
                Err(err) => {
                    self.record_attempt(AttemptOutcome::TransportError);
                    if transport_retried {
                        tracing::warn!(
                            endpoint = %endpoint,
                            attempt,
                            error = %err,
                            "Transport failure persisted after retry"
                        );
                        return Err(AssistantError::Transport {
                            endpoint: endpoint.to_string(),
                            message: err.message,
                        });
                    }
                    transport_retried = true;

                    let delay = transport_retry_delay(&self.settings.retry, &mut rand::rng());
                    tracing::warn!(
                        endpoint = %endpoint,
                        attempt,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "Transport failure, retrying once"
                    );
                    signal.sleep(delay).await?;
                }
            }
        }
    }
}
