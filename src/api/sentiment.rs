//! Sentiment API endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::services::sentiment::{format_age, DEFAULT_HISTORY_LIMIT};
use crate::types::{RefreshResult, SentimentHistoryResponse};
use crate::AppState;

/// Upper bound on history entries per request.
const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub symbol: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/signals/:symbol/sentiment", get(get_sentiment_history))
        .route("/api/sentiment/refresh", post(refresh_sentiment))
}

/// Latest analysis and recent history for a symbol.
async fn get_sentiment_history(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Json<ApiResponse<SentimentHistoryResponse>> {
    let symbol = symbol.trim().to_uppercase();
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let latest = state.sentiment_store.latest(&symbol);
    let analyzed = latest
        .as_ref()
        .map(|l| format_age(l.analyzed_at, Utc::now()));

    Json(ApiResponse::new(SentimentHistoryResponse {
        history: state.sentiment_store.history(&symbol, limit),
        symbol,
        latest,
        analyzed,
    }))
}

/// Run a fresh sentiment analysis for a symbol.
async fn refresh_sentiment(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResult>>> {
    let symbol = request
        .symbol
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Symbol is required".to_string()))?;

    let result = state.signal_store.refresh_sentiment(&symbol).await?;
    Ok(Json(ApiResponse::new(result)))
}
