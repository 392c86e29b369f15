//! HTTP transport to the generative backend
//!
//! The orchestrator only sees [`Transport`], so tests can script responses
//! without a network. [`HttpTransport`] is the reqwest implementation.

use super::envelope::GenerateRequest;
use crate::error::AssistantError;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }
}

/// The call never produced an HTTP response (connection refused, reset, DNS)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `endpoint`, authenticating with `api_key`
    async fn post(
        &self,
        endpoint: &str,
        api_key: &str,
        body: &GenerateRequest,
    ) -> Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client whose own timeout backs up the per-request deadline
    pub fn new(timeout: Duration) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AssistantError::InvalidConfiguration(format!(
                    "failed to build HTTP client: {}",
                    e
                ))
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        endpoint: &str,
        api_key: &str,
        body: &GenerateRequest,
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(endpoint)
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::new(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| {
                TransportError::new(format!(
                    "failed to read response body: {}",
                    e.without_url()
                ))
            })?;

        Ok(TransportResponse { status, body })
    }
}
