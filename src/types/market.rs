use serde::{Deserialize, Serialize};

use super::{SentimentResult, SignalResult};

/// Current quote for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    /// Display name reported by the provider, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub previous_close: f64,
    pub volume: u64,
}

/// Lookback window for daily price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HistoryRange {
    #[serde(rename = "1mo")]
    OneMonth,
    #[default]
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl HistoryRange {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1mo" => Some(Self::OneMonth),
            "3mo" => Some(Self::ThreeMonths),
            "6mo" => Some(Self::SixMonths),
            "1y" => Some(Self::OneYear),
            _ => None,
        }
    }

    /// Provider range token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
        }
    }
}

/// Market data persisted alongside a ticker's signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerMarketData {
    pub price: f64,
    pub change_percent: f64,
    pub change: f64,
    pub volume: u64,
    pub rsi14: f64,
    pub macd_hist: f64,
}

/// Latest scheduled analysis for a tracked ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerSnapshot {
    pub symbol: String,
    pub name: String,
    /// Unix timestamp (milliseconds).
    pub last_updated: i64,
    pub market_data: TickerMarketData,
    pub sentiment: SentimentResult,
    pub signal: SignalResult,
}

/// Stored signal and sentiment for a ticker, as served in bulk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub signal: SignalResult,
    pub sentiment: SentimentResult,
}

impl From<&TickerSnapshot> for SignalSnapshot {
    fn from(snapshot: &TickerSnapshot) -> Self {
        Self {
            signal: snapshot.signal.clone(),
            sentiment: snapshot.sentiment.clone(),
        }
    }
}

/// A symbol tracked by the scheduled update job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedSymbol {
    pub symbol: String,
    pub name: String,
}

impl TrackedSymbol {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

/// Outcome of updating one tracked symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    Success,
    Skipped,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub symbol: String,
    pub status: UpdateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSummary {
    pub total: usize,
    pub success: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Report returned by a scheduled signal update run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReport {
    pub success: bool,
    /// RFC 3339 timestamp of the run.
    pub timestamp: String,
    pub results: Vec<UpdateResult>,
    pub summary: UpdateSummary,
}

impl UpdateReport {
    /// Build a report, tallying the summary from the per-symbol results.
    pub fn from_results(results: Vec<UpdateResult>) -> Self {
        let count = |status| results.iter().filter(|r| r.status == status).count();
        let summary = UpdateSummary {
            total: results.len(),
            success: count(UpdateStatus::Success),
            skipped: count(UpdateStatus::Skipped),
            errors: count(UpdateStatus::Error),
        };

        Self {
            success: true,
            timestamp: chrono::Utc::now().to_rfc3339(),
            results,
            summary,
        }
    }
}
