//! Health check endpoint
//!
//! Reports liveness plus whether results are currently synthesized.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::handlers::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// "live", "forced_mock" or "always_mock"
    pub mode: &'static str,
    pub online: bool,
}

pub async fn handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let assistant = state.assistant();
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK",
            mode: assistant.mode().as_str(),
            online: assistant.network().is_online(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_state::mock_state;

    #[tokio::test]
    async fn test_health_handler_reports_mode() {
        let state = mock_state();
        let (status, Json(body)) = handler(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "OK");
        assert_eq!(body.mode, "forced_mock");
        assert!(body.online);
    }

    #[tokio::test]
    async fn test_health_handler_reports_offline() {
        let state = mock_state();
        state.assistant().network().set_online(false);
        let (_, Json(body)) = handler(State(state)).await;
        assert!(!body.online);
    }
}
