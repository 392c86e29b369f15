//! HTTP request handlers for the Searchlight API

use crate::config::Config;
use crate::metrics::Metrics;
use crate::middleware::request_id::request_id_middleware;
use crate::service::SearchAssistant;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod health;
pub mod metrics;
pub mod search;

/// Application state shared across all handlers
///
/// All fields are Arc'd for cheap cloning across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    assistant: Arc<SearchAssistant>,
}

impl AppState {
    pub fn new(config: Arc<Config>, assistant: Arc<SearchAssistant>) -> Self {
        Self { config, assistant }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn assistant(&self) -> &SearchAssistant {
        &self.assistant
    }

    pub fn metrics(&self) -> &Metrics {
        self.assistant.metrics()
    }
}

/// Build the full router with tracing and request-id layers
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/v1/search/enhance", post(search::enhance))
        .route("/v1/search/categorize", post(search::categorize))
        .route("/v1/search/market", post(search::market))
        .route("/v1/search/recommendations", post(search::recommendations))
        .route("/v1/chat", post(search::chat))
        .route("/health", get(health::handler))
        .route("/metrics", get(metrics::handler))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_state {
    use super::*;
    use crate::client::NetworkStatus;
    use crate::client::test_support::ScriptedTransport;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    /// State whose assistant has no API key and therefore synthesizes everything
    pub fn mock_state() -> AppState {
        let config = Config::default();
        let assistant = SearchAssistant::new(
            &config,
            Arc::new(ScriptedTransport::new()),
            Arc::new(NetworkStatus::online()),
            Arc::new(Metrics::new().expect("metrics")),
        )
        .with_clock(Arc::new(FixedClock(
            NaiveDate::from_ymd_opt(2024, 10, 15).expect("valid date"),
        )));
        AppState::new(Arc::new(config), Arc::new(assistant))
    }
}
