//! Prometheus metrics collection for Searchlight
//!
//! This module provides metrics instrumentation for tracking:
//! - Façade operations by whether the result came from the live backend or synthesis
//! - Fallbacks to synthesis by the stage that failed
//! - Individual endpoint attempts by outcome
//! - Operation latency
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Façade operation label
///
/// Restricting labels to an enum keeps cardinality fixed at five values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Enhance,
    Categorize,
    MarketAnalysis,
    Recommend,
    Chat,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Enhance => "enhance",
            Operation::Categorize => "categorize",
            Operation::MarketAnalysis => "market_analysis",
            Operation::Recommend => "recommend",
            Operation::Chat => "chat",
        }
    }
}

/// Where a returned result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Live,
    Mock,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Live => "live",
            Source::Mock => "mock",
        }
    }
}

/// Pipeline stage whose failure triggered a fallback to synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackStage {
    /// The orchestrator returned an error
    Request,
    /// No recovery stage produced a value of the expected type
    Recovery,
    /// The recovered value violated a shape constraint
    Validation,
}

impl FallbackStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackStage::Request => "request",
            FallbackStage::Recovery => "recovery",
            FallbackStage::Validation => "validation",
        }
    }
}

/// Outcome of a single call to one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    RateLimited,
    HttpError,
    TransportError,
}

impl AttemptOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptOutcome::Success => "success",
            AttemptOutcome::RateLimited => "rate_limited",
            AttemptOutcome::HttpError => "http_error",
            AttemptOutcome::TransportError => "transport_error",
        }
    }
}

/// Metrics collector for Searchlight
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    operations_total: IntCounterVec,
    fallbacks_total: IntCounterVec,
    endpoint_attempts_total: IntCounterVec,
    request_duration: HistogramVec,
    forced_mock: IntGauge,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// Registers all metrics with a new Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Cardinality: 5 operations x 2 sources = 10 time series
        let operations_total = IntCounterVec::new(
            Opts::new(
                "searchlight_operations_total",
                "Total façade operations by operation and result source",
            ),
            &["operation", "source"],
        )?;

        let fallbacks_total = IntCounterVec::new(
            Opts::new(
                "searchlight_fallbacks_total",
                "Live attempts that fell back to synthesized results, by failing stage",
            ),
            &["operation", "stage"],
        )?;

        let endpoint_attempts_total = IntCounterVec::new(
            Opts::new(
                "searchlight_endpoint_attempts_total",
                "Individual backend calls by outcome",
            ),
            &["outcome"],
        )?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "searchlight_request_duration_ms",
                "Façade operation latency in milliseconds",
            )
            .buckets(vec![
                1.0, 5.0, 25.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0,
            ]),
            &["operation"],
        )?;

        let forced_mock = IntGauge::with_opts(Opts::new(
            "searchlight_mock_mode",
            "1 when the service is synthesizing every result locally, else 0",
        ))?;

        registry.register(Box::new(operations_total.clone()))?;
        registry.register(Box::new(fallbacks_total.clone()))?;
        registry.register(Box::new(endpoint_attempts_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;
        registry.register(Box::new(forced_mock.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            operations_total,
            fallbacks_total,
            endpoint_attempts_total,
            request_duration,
            forced_mock,
        })
    }

    pub fn record_operation(&self, operation: Operation, source: Source) {
        self.operations_total
            .with_label_values(&[operation.as_str(), source.as_str()])
            .inc();
    }

    pub fn record_fallback(&self, operation: Operation, stage: FallbackStage) {
        self.fallbacks_total
            .with_label_values(&[operation.as_str(), stage.as_str()])
            .inc();
    }

    pub fn record_attempt(&self, outcome: AttemptOutcome) {
        self.endpoint_attempts_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    pub fn set_mock_mode(&self, mock: bool) {
        self.forced_mock.set(i64::from(mock));
    }

    /// Record façade operation duration
    ///
    /// # Errors
    ///
    /// Returns an error if `duration_ms` is NaN, infinite, or negative. Such
    /// values would corrupt every percentile of the histogram.
    pub fn record_duration(
        &self,
        operation: Operation,
        duration_ms: f64,
    ) -> Result<(), prometheus::Error> {
        if !duration_ms.is_finite() {
            return Err(prometheus::Error::Msg(format!(
                "Histogram value must be finite (not NaN or Infinity), got: {}",
                duration_ms
            )));
        }

        if duration_ms < 0.0 {
            return Err(prometheus::Error::Msg(format!(
                "Histogram value must be non-negative (duration cannot be negative), got: {}",
                duration_ms
            )));
        }

        self.request_duration
            .get_metric_with_label_values(&[operation.as_str()])?
            .observe(duration_ms);
        Ok(())
    }

    pub fn operations_count(&self, operation: Operation, source: Source) -> u64 {
        self.operations_total
            .with_label_values(&[operation.as_str(), source.as_str()])
            .get()
    }

    pub fn fallbacks_count(&self, operation: Operation, stage: FallbackStage) -> u64 {
        self.fallbacks_total
            .with_label_values(&[operation.as_str(), stage.as_str()])
            .get()
    }

    pub fn attempts_count(&self, outcome: AttemptOutcome) -> u64 {
        self.endpoint_attempts_total
            .with_label_values(&[outcome.as_str()])
            .get()
    }

    /// Gather all metrics in Prometheus text format
    ///
    /// # Errors
    ///
    /// Returns an error if metric encoding fails.
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();
        let metric_count = metric_families.len();

        tracing::debug!(
            metric_family_count = metric_count,
            "Encoding metrics to Prometheus text format"
        );

        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();

        encoder.encode(&metric_families, &mut buffer).map_err(|e| {
            tracing::error!(
                error = %e,
                metric_family_count = metric_count,
                "Prometheus text encoder failed"
            );
            prometheus::Error::Msg(format!(
                "Failed to encode {} metric families: {}",
                metric_count, e
            ))
        })?;

        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!(
                "Failed to convert metrics to UTF-8 at byte {}: {}",
                e.utf8_error().valid_up_to(),
                e
            ))
        })
    }
}
