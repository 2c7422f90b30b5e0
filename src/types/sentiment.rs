use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{SentimentLabel, SentimentResult, SignalResult};

/// Most recent sentiment analysis stored for a symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSentiment {
    pub symbol: String,
    #[serde(flatten)]
    pub sentiment: SentimentResult,
    /// Unix timestamp (milliseconds) of the analysis.
    pub analyzed_at: i64,
    pub headlines_count: usize,
    /// Up to the first 10 headlines that were analyzed.
    pub headlines: Vec<String>,
}

/// One entry in a symbol's sentiment history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentHistoryEntry {
    pub id: Uuid,
    pub score: f64,
    pub label: SentimentLabel,
    pub rationale: String,
    /// Unix timestamp (milliseconds).
    pub analyzed_at: i64,
    pub headlines_count: usize,
}

/// Response for the sentiment history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentHistoryResponse {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<StoredSentiment>,
    pub history: Vec<SentimentHistoryEntry>,
    /// Relative age of the latest analysis ("5 min ago").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed: Option<String>,
}

/// Result of an on-demand sentiment refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResult {
    pub symbol: String,
    pub sentiment: SentimentResult,
    /// Signal recomputed with the new sentiment, when market data was available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<SignalResult>,
    pub headlines_analyzed: usize,
    /// RFC 3339 timestamp of the stored analysis.
    pub stored_at: String,
}
