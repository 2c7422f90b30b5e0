//! Signal API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::types::{SymbolSignal, TickerSnapshot};
use crate::AppState;

const BULK_CACHE_CONTROL: &str = "public, s-maxage=60, stale-while-revalidate=300";

/// Query parameters for the bulk signals endpoint.
#[derive(Debug, Deserialize)]
pub struct BulkSignalsQuery {
    /// Comma separated symbols.
    pub symbols: Option<String>,
}

/// Create the signals router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/signals", get(get_bulk_signals))
        .route("/api/signals/:symbol", get(get_signal))
        .route("/api/signals/:symbol/snapshot", get(get_snapshot))
}

/// Split a comma separated symbol list, trimming and uppercasing each entry.
pub fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Stored signals and sentiment for several symbols.
async fn get_bulk_signals(
    State(state): State<AppState>,
    Query(query): Query<BulkSignalsQuery>,
) -> Result<impl IntoResponse> {
    let raw = query
        .symbols
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing symbols parameter".to_string()))?;

    let symbols = parse_symbols(&raw);
    if symbols.is_empty() {
        return Err(AppError::BadRequest("No valid symbols provided".to_string()));
    }

    let snapshots = state.signal_store.snapshots(&symbols);

    Ok(([(header::CACHE_CONTROL, BULK_CACHE_CONTROL)], Json(snapshots)))
}

/// Live signal for one symbol.
async fn get_signal(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<SymbolSignal>>> {
    let (signal, cached) = state.signal_store.analyze_cached(&symbol).await?;
    Ok(Json(ApiResponse::with_cached(signal, cached)))
}

/// Ticker detail recorded by the last scheduled update.
async fn get_snapshot(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<TickerSnapshot>>> {
    let snapshot = state.signal_store.snapshot(&symbol).ok_or_else(|| {
        AppError::NotFound(format!("No snapshot for {}", symbol.trim().to_uppercase()))
    })?;
    Ok(Json(ApiResponse::new(snapshot)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbols() {
        assert_eq!(parse_symbols(" aapl, msft ,,TSLA"), vec!["AAPL", "MSFT", "TSLA"]);
        assert!(parse_symbols(" , ,").is_empty());
    }

    #[test]
    fn test_bulk_query_from_url() {
        let query: BulkSignalsQuery = serde_urlencoded::from_str("symbols=aapl%2Cmsft").unwrap();
        assert_eq!(query.symbols.as_deref(), Some("aapl,msft"));

        let query: BulkSignalsQuery = serde_urlencoded::from_str("").unwrap();
        assert!(query.symbols.is_none());
    }
}
