//! Search assistant façade
//!
//! [`SearchAssistant`] is the one logical instance per process. It is built
//! once at startup and shared behind an `Arc`. Its five operations never
//! fail: any orchestrator, recovery or shape-validation failure is logged and
//! replaced with a synthesized value of the same type.
//!
//! # Mode
//!
//! The instance starts in `AlwaysMock` for production deployments, in
//! `ForcedMock` when the API key does not validate, and otherwise `Live`.
//! [`SearchAssistant::launch`] additionally spawns a one-time connectivity
//! probe that forces mock mode if the backend cannot be reached.

use crate::client::{
    HttpTransport, ModeSwitch, NetworkStatus, Orchestrator, OrchestratorSettings, ServiceMode,
    Transport,
};
use crate::clock::Clock;
use crate::config::Config;
use crate::error::AssistantError;
use crate::insights::{
    ChatTurn, MarketAnalysis, ProductCategory, ProductRecommendation, ProductSummary,
    SmartSearchResult, ValidateShape,
};
use crate::metrics::{FallbackStage, Metrics, Operation, Source};
use crate::prompts::Prompt;
use crate::recovery;
use crate::synthesis;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Instant;
use tokio::task::JoinHandle;

/// Shortest key accepted as syntactically valid
pub const MIN_API_KEY_LEN: usize = 10;

/// Characters of unparsable output kept in diagnostics
const PREVIEW_CHARS: usize = 120;

static API_KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^AIza[0-9A-Za-z_\-]+$").expect("API key pattern is valid")
});

/// Check that a key is present, long enough, and carries the provider prefix
pub fn validate_api_key(key: Option<&str>) -> bool {
    match key.map(str::trim) {
        Some(key) => key.len() >= MIN_API_KEY_LEN && API_KEY_PATTERN.is_match(key),
        None => false,
    }
}

fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

pub struct SearchAssistant {
    orchestrator: Orchestrator,
    metrics: Arc<Metrics>,
    debug: bool,
    probe_started: AtomicBool,
}

impl SearchAssistant {
    /// Build the assistant over an explicit transport and connectivity signal
    ///
    /// Does not contact the backend. Use [`SearchAssistant::launch`] to also
    /// start the connectivity probe.
    pub fn new(
        config: &Config,
        transport: Arc<dyn Transport>,
        network: Arc<NetworkStatus>,
        metrics: Arc<Metrics>,
    ) -> Self {
        let api_key = config.assistant.api_key.clone();
        let key_valid = validate_api_key(api_key.as_deref());
        let locked_down = config.assistant.is_locked_down();

        if !locked_down && !key_valid {
            tracing::warn!(
                key_present = api_key.is_some(),
                "API key missing or invalid, using synthesized results only"
            );
        }

        let mode = Arc::new(ModeSwitch::new(locked_down, key_valid));
        let settings = OrchestratorSettings {
            api_key: api_key.unwrap_or_default(),
            endpoints: config.assistant.endpoints.clone(),
            retry: config.retry_policy(),
            request_timeout: config.request_timeout(),
        };
        let orchestrator =
            Orchestrator::new(transport, settings, mode, network).with_metrics(metrics.clone());

        tracing::info!(
            mode = orchestrator.mode().current().as_str(),
            endpoint_count = config.assistant.endpoints.len(),
            "Search assistant initialized"
        );

        Self {
            orchestrator,
            metrics,
            debug: config.assistant.debug,
            probe_started: AtomicBool::new(false),
        }
    }

    /// Build the assistant with the reqwest transport
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the HTTP client cannot be built.
    pub fn from_config(config: &Config, metrics: Arc<Metrics>) -> Result<Self, AssistantError> {
        let transport = HttpTransport::new(config.request_timeout())?;
        Ok(Self::new(
            config,
            Arc::new(transport),
            Arc::new(NetworkStatus::online()),
            metrics,
        ))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.orchestrator = self.orchestrator.with_clock(clock);
        self
    }

    /// Share the assistant and start its connectivity probe
    ///
    /// Must be called from within a Tokio runtime.
    pub fn launch(self) -> Arc<Self> {
        let assistant = Arc::new(self);
        assistant.start_probe();
        assistant
    }

    /// Spawn the connectivity probe unless it already ran or mock mode is active
    pub fn start_probe(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if self.mode().is_mock() {
            return None;
        }
        if self.probe_started.swap(true, Ordering::AcqRel) {
            return None;
        }

        let assistant = Arc::clone(self);
        Some(tokio::spawn(async move {
            assistant.probe().await;
        }))
    }

    async fn probe(&self) {
        match self.orchestrator.make_api_request(&Prompt::probe()).await {
            Ok(_) => tracing::info!(
                mode = self.mode().as_str(),
                "Backend connectivity probe completed"
            ),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    error_kind = err.kind(),
                    "Backend connectivity probe failed, switching to synthesized results"
                );
                self.orchestrator.force_mock();
            }
        }
    }

    pub fn mode(&self) -> ServiceMode {
        self.orchestrator.mode().current()
    }

    pub fn network(&self) -> &Arc<NetworkStatus> {
        self.orchestrator.network()
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Structured insights for a free-text search query
    pub async fn enhance_search_query(&self, query: &str) -> SmartSearchResult {
        self.run_structured(Operation::Enhance, Prompt::enhance(query), || {
            synthesis::search_result(query, self.today(), &mut rand::rng())
        })
        .await
    }

    /// Ranked categories for a set of products
    pub async fn categorize_products(&self, products: &[ProductSummary]) -> Vec<ProductCategory> {
        self.run_structured(Operation::Categorize, Prompt::categorize(products), || {
            synthesis::product_categories(products)
        })
        .await
    }

    pub async fn analyze_market(&self, query: &str) -> MarketAnalysis {
        self.run_structured(
            Operation::MarketAnalysis,
            Prompt::market_analysis(query),
            || synthesis::market_analysis(query, self.today(), &mut rand::rng()),
        )
        .await
    }

    /// Recommendations from recent searches and an optional preferred category
    pub async fn get_recommendations(
        &self,
        history: &[String],
        category: Option<&str>,
    ) -> Vec<ProductRecommendation> {
        self.run_structured(
            Operation::Recommend,
            Prompt::recommend(history, category),
            || {
                synthesis::recommendations_for_history(
                    history,
                    category,
                    self.today(),
                    &mut rand::rng(),
                )
            },
        )
        .await
    }

    /// Conversational reply to `message`
    pub async fn chat(&self, message: &str, history: &[ChatTurn]) -> String {
        let prompt = Prompt::chat(message, history);
        let started = Instant::now();

        let (reply, source) = if self.mode().is_mock() {
            (
                synthesis::chat_reply(prompt.text(), &mut rand::rng()),
                Source::Mock,
            )
        } else {
            match self.orchestrator.make_api_request(&prompt).await {
                Ok(text) if !text.trim().is_empty() => (text.trim().to_string(), self.source()),
                Ok(text) => {
                    self.report_fallback(
                        Operation::Chat,
                        FallbackStage::Recovery,
                        &AssistantError::UnparsableOutput {
                            kind: "chat".to_string(),
                            preview: preview(&text),
                        },
                    );
                    (
                        synthesis::chat_reply(prompt.text(), &mut rand::rng()),
                        Source::Mock,
                    )
                }
                Err(err) => {
                    self.report_fallback(Operation::Chat, FallbackStage::Request, &err);
                    (
                        synthesis::chat_reply(prompt.text(), &mut rand::rng()),
                        Source::Mock,
                    )
                }
            }
        };

        self.finish(Operation::Chat, source, started);
        reply
    }

    fn today(&self) -> chrono::NaiveDate {
        self.orchestrator.clock().today()
    }

    /// Source label for a value that came back from the orchestrator
    ///
    /// The orchestrator substitutes synthesized text when rate limiting
    /// forces mock mode mid-request.
    fn source(&self) -> Source {
        if self.mode().is_mock() {
            Source::Mock
        } else {
            Source::Live
        }
    }

    async fn run_structured<T, F>(&self, operation: Operation, prompt: Prompt, fallback: F) -> T
    where
        T: DeserializeOwned + ValidateShape,
        F: FnOnce() -> T,
    {
        let started = Instant::now();

        let (value, source) = if self.mode().is_mock() {
            (fallback(), Source::Mock)
        } else {
            match self.fetch_structured::<T>(&prompt).await {
                Ok(value) => (value, self.source()),
                Err((stage, err)) => {
                    self.report_fallback(operation, stage, &err);
                    (fallback(), Source::Mock)
                }
            }
        };

        self.finish(operation, source, started);
        value
    }

    async fn fetch_structured<T>(&self, prompt: &Prompt) -> Result<T, (FallbackStage, AssistantError)>
    where
        T: DeserializeOwned + ValidateShape,
    {
        let kind = prompt.kind().as_str();
        let raw = self
            .orchestrator
            .make_api_request(prompt)
            .await
            .map_err(|err| (FallbackStage::Request, err))?;

        let value: T = recovery::parse_as(&raw).ok_or_else(|| {
            (
                FallbackStage::Recovery,
                AssistantError::UnparsableOutput {
                    kind: kind.to_string(),
                    preview: preview(&raw),
                },
            )
        })?;

        value.validate_shape().map_err(|reason| {
            (
                FallbackStage::Validation,
                AssistantError::UnparsableOutput {
                    kind: kind.to_string(),
                    preview: reason,
                },
            )
        })?;

        Ok(value)
    }

    fn report_fallback(&self, operation: Operation, stage: FallbackStage, err: &AssistantError) {
        self.metrics.record_fallback(operation, stage);

        if self.debug {
            tracing::warn!(
                operation = operation.as_str(),
                stage = stage.as_str(),
                error = %err,
                error_kind = err.kind(),
                user_message = err.user_message(),
                timestamp = %chrono::Utc::now().to_rfc3339(),
                "Falling back to synthesized result"
            );
        } else {
            tracing::debug!(
                operation = operation.as_str(),
                stage = stage.as_str(),
                error = %err,
                error_kind = err.kind(),
                "Falling back to synthesized result"
            );
        }
    }

    fn finish(&self, operation: Operation, source: Source, started: Instant) {
        self.metrics.record_operation(operation, source);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        if let Err(e) = self.metrics.record_duration(operation, elapsed_ms) {
            tracing::warn!(
                operation = operation.as_str(),
                error = %e,
                "Failed to record operation duration"
            );
        }
    }
}
