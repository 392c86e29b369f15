//! Prometheus metrics endpoint
//!
//! Exposes metrics in Prometheus text format for scraping.

use axum::{extract::State, http::StatusCode};

use crate::handlers::AppState;

/// Metrics handler for Prometheus scraping
///
/// # Response
///
/// - `200 OK` with metrics in Prometheus text format
/// - `500 Internal Server Error` if metrics collection fails
///
/// # Example
///
/// ```bash
/// curl http://localhost:3000/metrics
/// # HELP searchlight_operations_total Total façade operations by operation and result source
/// # TYPE searchlight_operations_total counter
/// searchlight_operations_total{operation="enhance",source="mock"} 3
/// ```
pub async fn handler(State(state): State<AppState>) -> (StatusCode, String) {
    match state.metrics().gather() {
        Ok(output) => (StatusCode::OK, output),
        Err(e) => {
            tracing::error!(error = %e, "Failed to gather metrics for Prometheus scraping");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to gather metrics: {}", e),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_state::mock_state;

    #[tokio::test]
    async fn test_metrics_handler_returns_prometheus_format() {
        let state = mock_state();
        let _ = state.assistant().analyze_market("sofa").await;

        let (status, body) = handler(State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("# TYPE searchlight_operations_total counter"));
        assert!(body.contains(
            r#"searchlight_operations_total{operation="market_analysis",source="mock"} 1"#
        ));
    }
}
