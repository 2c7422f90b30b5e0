use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    tracked_symbols: usize,
    cached_signals: usize,
    sentiment_configured: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        tracked_symbols: state.signal_store.tracked().len(),
        cached_signals: state.signal_store.cached_signals(),
        sentiment_configured: state.config.openai_api_key.is_some(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}
