//! Search insight and chat endpoints
//!
//! Each handler validates its input, then delegates to the assistant. The
//! assistant never fails, so the only error responses are 400s for bad input.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::insights::{
    ChatTurn, MarketAnalysis, ProductCategory, ProductRecommendation, ProductSummary,
    SmartSearchResult,
};
use crate::middleware::request_id::RequestId;

/// Longest accepted query or chat message
pub const MAX_INPUT_CHARS: usize = 1000;

/// Most products accepted in one categorize call
pub const MAX_PRODUCTS: usize = 50;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct CategorizeRequest {
    pub products: Vec<ProductSummary>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    #[serde(default)]
    pub history: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

fn require_text<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    if trimmed.chars().count() > MAX_INPUT_CHARS {
        return Err(AppError::Validation(format!(
            "{} exceeds {} characters",
            field, MAX_INPUT_CHARS
        )));
    }
    Ok(trimmed)
}

pub async fn enhance(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<QueryRequest>,
) -> AppResult<Json<SmartSearchResult>> {
    let query = require_text("query", &request.query)?;
    tracing::info!(request_id = %request_id, query_len = query.len(), "Enhance request");
    Ok(Json(state.assistant().enhance_search_query(query).await))
}

pub async fn categorize(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<CategorizeRequest>,
) -> AppResult<Json<Vec<ProductCategory>>> {
    if request.products.is_empty() {
        return Err(AppError::Validation(
            "products must contain at least one entry".to_string(),
        ));
    }
    if request.products.len() > MAX_PRODUCTS {
        return Err(AppError::Validation(format!(
            "products cannot contain more than {} entries",
            MAX_PRODUCTS
        )));
    }
    for product in &request.products {
        require_text("product title", &product.title)?;
    }
    tracing::info!(
        request_id = %request_id,
        product_count = request.products.len(),
        "Categorize request"
    );
    Ok(Json(
        state.assistant().categorize_products(&request.products).await,
    ))
}

pub async fn market(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<QueryRequest>,
) -> AppResult<Json<MarketAnalysis>> {
    let query = require_text("query", &request.query)?;
    tracing::info!(request_id = %request_id, query_len = query.len(), "Market analysis request");
    Ok(Json(state.assistant().analyze_market(query).await))
}

pub async fn recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationsRequest>,
) -> AppResult<Json<Vec<ProductRecommendation>>> {
    tracing::info!(
        request_id = %request_id,
        history_len = request.history.len(),
        has_category = request.category.is_some(),
        "Recommendations request"
    );
    Ok(Json(
        state
            .assistant()
            .get_recommendations(&request.history, request.category.as_deref())
            .await,
    ))
}

pub async fn chat(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let message = require_text("message", &request.message)?;
    tracing::info!(
        request_id = %request_id,
        history_len = request.history.len(),
        "Chat request"
    );
    let reply = state.assistant().chat(message, &request.history).await;
    Ok(Json(ChatResponse { reply }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_state::mock_state;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("query", "  tv  ").expect("valid"), "tv");
        assert!(matches!(
            require_text("query", "   "),
            Err(AppError::Validation(ref msg)) if msg == "query must not be empty"
        ));
        assert!(require_text("query", &"a".repeat(MAX_INPUT_CHARS + 1)).is_err());
    }

    #[tokio::test]
    async fn test_enhance_handler_returns_result() {
        let Json(result) = enhance(
            State(mock_state()),
            Extension(RequestId::new()),
            Json(QueryRequest {
                query: "iphone".to_string(),
            }),
        )
        .await
        .expect("ok");
        assert_eq!(result.enhanced_query, "iphone best deals 2024");
    }

    #[tokio::test]
    async fn test_categorize_rejects_empty_list() {
        let result = categorize(
            State(mock_state()),
            Extension(RequestId::new()),
            Json(CategorizeRequest { products: vec![] }),
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_recommendations_without_input_are_generic() {
        let Json(picks) = recommendations(
            State(mock_state()),
            Extension(RequestId::new()),
            Json(RecommendationsRequest {
                history: vec![],
                category: None,
            }),
        )
        .await
        .expect("ok");
        assert_eq!(picks.len(), 3);
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_message() {
        let result = chat(
            State(mock_state()),
            Extension(RequestId::new()),
            Json(ChatRequest {
                message: " ".to_string(),
                history: vec![],
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
