//! Per-request cancellation
//!
//! A [`CancelSignal`] is a deadline created once per orchestrated request and
//! shared by every attempt and backoff sleep under it. Wrapping a future with
//! [`CancelSignal::guard`] drops it when the deadline passes, which aborts an
//! in-flight HTTP call.

use crate::error::AssistantError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct CancelSignal {
    deadline: Instant,
    timeout: Duration,
}

impl CancelSignal {
    /// Signal that fires `timeout` from now
    pub fn after(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
            timeout,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Run `fut` unless the deadline passes first
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, AssistantError> {
        tokio::time::timeout_at(self.deadline, fut)
            .await
            .map_err(|_| AssistantError::Cancelled)
    }

    /// Sleep for `delay`, waking early with an error if the deadline passes
    pub async fn sleep(&self, delay: Duration) -> Result<(), AssistantError> {
        self.guard(tokio::time::sleep(delay)).await
    }
}
