//! Scheduled update trigger.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::warn;

use crate::error::{AppError, Result};
use crate::types::UpdateReport;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CronQuery {
    pub secret: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/cron/update-signals",
        get(update_signals).post(update_signals),
    )
}

/// Whether a caller-supplied secret matches the configured one.
///
/// With no secret configured nothing is authorized.
pub fn is_authorized(configured: Option<&str>, provided: Option<&str>) -> bool {
    match (configured, provided) {
        (Some(expected), Some(given)) => !expected.is_empty() && expected == given,
        _ => false,
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Refresh every tracked symbol.
///
/// The secret is read from `?secret=` or an `Authorization: Bearer` header.
async fn update_signals(
    State(state): State<AppState>,
    Query(query): Query<CronQuery>,
    headers: HeaderMap,
) -> Result<Json<UpdateReport>> {
    let provided = query.secret.as_deref().or_else(|| bearer_token(&headers));

    if !is_authorized(state.config.cron_secret.as_deref(), provided) {
        warn!("Rejected unauthorized signal update request");
        return Err(AppError::Unauthorized);
    }

    Ok(Json(state.signal_store.update_tracked().await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_is_authorized() {
        assert!(is_authorized(Some("s3cret"), Some("s3cret")));
        assert!(!is_authorized(Some("s3cret"), Some("wrong")));
        assert!(!is_authorized(Some("s3cret"), None));
        assert!(!is_authorized(None, Some("anything")));
        assert!(!is_authorized(None, None));
        assert!(!is_authorized(Some(""), Some("")));
    }

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
    }
}
