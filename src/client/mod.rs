//! Request orchestration against the generative backend
//!
//! [`Orchestrator::make_api_request`] turns a prompt into raw model text:
//!
//! 1. In mock mode it returns synthesized text shaped like a model reply.
//! 2. Offline, it fails immediately with `ConnectivityUnavailable`.
//! 3. Otherwise it walks the configured endpoints strictly in order under one
//!    shared deadline, stopping at the first HTTP success.
//!
//! A successful response must carry `candidates[0].content.parts[0].text`;
//! anything else is `MalformedEnvelope` and is not retried. Deadline expiry
//! anywhere surfaces as `Timeout` and stops all further attempts.

pub mod cancel;
pub mod connectivity;
pub mod envelope;
pub mod mode;
pub mod retry;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use cancel::CancelSignal;
pub use connectivity::NetworkStatus;
pub use mode::{ModeSwitch, ServiceMode};
pub use retry::{RetryOutcome, RetryPolicy};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};

use crate::clock::{Clock, SystemClock};
use crate::error::AssistantError;
use crate::metrics::{AttemptOutcome, Metrics};
use crate::prompts::Prompt;
use crate::synthesis;
use std::sync::Arc;
use std::time::Duration;

/// Static request settings
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorSettings {
    pub api_key: String,
    /// Fully-qualified endpoint URLs, tried in this order
    pub endpoints: Vec<String>,
    pub retry: RetryPolicy,
    /// Deadline for one whole multi-endpoint request
    pub request_timeout: Duration,
}

pub struct Orchestrator {
    transport: Arc<dyn Transport>,
    settings: OrchestratorSettings,
    mode: Arc<ModeSwitch>,
    network: Arc<NetworkStatus>,
    clock: Arc<dyn Clock>,
    metrics: Option<Arc<Metrics>>,
}

impl Orchestrator {
    pub fn new(
        transport: Arc<dyn Transport>,
        settings: OrchestratorSettings,
        mode: Arc<ModeSwitch>,
        network: Arc<NetworkStatus>,
    ) -> Self {
        Self {
            transport,
            settings,
            mode,
            network,
            clock: Arc::new(SystemClock),
            metrics: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        metrics.set_mock_mode(self.mode.is_mock());
        self.metrics = Some(metrics);
        self
    }

    pub fn mode(&self) -> &Arc<ModeSwitch> {
        &self.mode
    }

    pub fn network(&self) -> &Arc<NetworkStatus> {
        &self.network
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    fn record_attempt(&self, outcome: AttemptOutcome) {
        if let Some(metrics) = &self.metrics {
            metrics.record_attempt(outcome);
        }
    }

    fn sync_mode_gauge(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.set_mock_mode(self.mode.is_mock());
        }
    }

    /// Force mock mode for the rest of this instance's lifetime
    pub fn force_mock(&self) -> bool {
        let transitioned = self.mode.force_mock();
        self.sync_mode_gauge();
        transitioned
    }

    fn mock_output(&self, prompt: &Prompt) -> String {
        synthesis::model_output(prompt, self.clock.today(), &mut rand::rng())
    }

    /// Obtain raw model text for `prompt`
    ///
    /// # Errors
    ///
    /// - `ConnectivityUnavailable` when the process is offline
    /// - `Timeout` when the shared deadline passes
    /// - `MalformedEnvelope` when a success body lacks the text path
    /// - `AllEndpointsFailed` when every endpoint fails; if the last failure
    ///   was rate limiting, mock mode is forced first
    pub async fn make_api_request(&self, prompt: &Prompt) -> Result<String, AssistantError> {
        if self.mode.is_mock() {
            tracing::debug!(
                kind = prompt.kind().as_str(),
                mode = self.mode.current().as_str(),
                "Mock mode active, synthesizing model output"
            );
            return Ok(self.mock_output(prompt));
        }

        if !self.network.is_online() {
            tracing::warn!("Network offline, not attempting backend request");
            return Err(AssistantError::ConnectivityUnavailable);
        }

        let signal = CancelSignal::after(self.settings.request_timeout);
        let max_retries = self.settings.retry.max_retries;
        let mut last_status: Option<u16> = None;
        let mut last_error = String::from("no endpoints configured");

        for (index, endpoint) in self.settings.endpoints.iter().enumerate() {
            tracing::debug!(
                endpoint = %endpoint,
                endpoint_index = index,
                endpoint_count = self.settings.endpoints.len(),
                "Trying endpoint"
            );

            match self
                .make_request_with_retry(endpoint, prompt.text(), &signal, max_retries)
                .await
            {
                Ok(RetryOutcome::UseMockData) => {
                    tracing::info!(
                        endpoint = %endpoint,
                        "Falling back to synthesized output"
                    );
                    return Ok(self.mock_output(prompt));
                }
                Ok(RetryOutcome::Response(response)) if response.is_success() => {
                    return envelope::extract_text(&response.body).map_err(|reason| {
                        tracing::warn!(
                            endpoint = %endpoint,
                            reason = %reason,
                            "Malformed response envelope"
                        );
                        AssistantError::MalformedEnvelope {
                            endpoint: endpoint.clone(),
                            reason,
                        }
                    });
                }
                Ok(RetryOutcome::Response(response)) => {
                    let err = if response.is_rate_limited() {
                        AssistantError::RateLimited {
                            endpoint: endpoint.clone(),
                        }
                    } else {
                        AssistantError::EndpointHttpFailure {
                            endpoint: endpoint.clone(),
                            status: response.status,
                        }
                    };
                    last_status = Some(response.status);
                    last_error = err.to_string();
                }
                Err(AssistantError::Cancelled) => {
                    let timeout_seconds = signal.timeout().as_secs();
                    tracing::warn!(
                        endpoint = %endpoint,
                        timeout_seconds,
                        "Request deadline passed, abandoning remaining endpoints"
                    );
                    return Err(AssistantError::Timeout { timeout_seconds });
                }
                Err(err) => {
                    last_status = None;
                    last_error = err.to_string();
                }
            }
        }

        tracing::warn!(
            attempted = self.settings.endpoints.len(),
            last_status = ?last_status,
            last_error = %last_error,
            "All endpoints failed"
        );

        let err = AssistantError::AllEndpointsFailed {
            attempted: self.settings.endpoints.len(),
            last_status,
            last_error,
        };
        if err.is_rate_limited() {
            self.force_mock();
        }
        Err(err)
    }
}
