//! Scripted transport for orchestrator tests

use super::envelope::GenerateRequest;
use super::transport::{Transport, TransportError, TransportResponse};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

pub type Scripted = Result<TransportResponse, TransportError>;

/// Replays queued results per endpoint and records every call
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<String>>,
    latency: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps this long before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn script(self, endpoint: &str, results: Vec<Scripted>) -> Self {
        self.scripts
            .lock()
            .expect("script lock")
            .insert(endpoint.to_string(), results.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == endpoint).count()
    }
}

pub fn ok_text(text: &str) -> Scripted {
    let body = serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    });
    Ok(TransportResponse::new(200, body.to_string()))
}

pub fn status(code: u16) -> Scripted {
    Ok(TransportResponse::new(code, format!("status {}", code)))
}

pub fn connection_reset() -> Scripted {
    Err(TransportError::new("connection reset by peer"))
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(
        &self,
        endpoint: &str,
        _api_key: &str,
        _body: &GenerateRequest,
    ) -> Result<TransportResponse, TransportError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(endpoint.to_string());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.scripts
            .lock()
            .expect("script lock")
            .get_mut(endpoint)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Err(TransportError::new(format!("unscripted call to {}", endpoint))))
    }
}
