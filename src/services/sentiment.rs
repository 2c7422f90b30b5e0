//! In-memory store for sentiment analyses.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::types::{SentimentHistoryEntry, SentimentResult, StoredSentiment};

/// Headlines kept with the latest analysis.
const STORED_HEADLINES: usize = 10;
/// History entries retained per symbol.
const MAX_HISTORY: usize = 365;
/// Default number of history entries returned.
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Latest sentiment per symbol plus a bounded history.
pub struct SentimentStore {
    latest: DashMap<String, StoredSentiment>,
    /// Oldest first.
    history: DashMap<String, Vec<SentimentHistoryEntry>>,
}

impl SentimentStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Record an analysis as the symbol's latest and append it to history.
    pub fn store(
        &self,
        symbol: &str,
        sentiment: SentimentResult,
        headlines: &[String],
    ) -> StoredSentiment {
        let symbol = symbol.to_uppercase();
        let now = Utc::now().timestamp_millis();

        let stored = StoredSentiment {
            symbol: symbol.clone(),
            sentiment: sentiment.clone(),
            analyzed_at: now,
            headlines_count: headlines.len(),
            headlines: headlines.iter().take(STORED_HEADLINES).cloned().collect(),
        };
        self.latest.insert(symbol.clone(), stored.clone());

        let mut history = self.history.entry(symbol.clone()).or_default();
        history.push(SentimentHistoryEntry {
            id: Uuid::new_v4(),
            score: sentiment.score,
            label: sentiment.label,
            rationale: sentiment.rationale,
            analyzed_at: now,
            headlines_count: headlines.len(),
        });
        if history.len() > MAX_HISTORY {
            let excess = history.len() - MAX_HISTORY;
            history.drain(..excess);
        }

        info!("Stored sentiment for {}", symbol);
        stored
    }

    /// Latest stored analysis for a symbol.
    pub fn latest(&self, symbol: &str) -> Option<StoredSentiment> {
        self.latest
            .get(&symbol.to_uppercase())
            .map(|entry| entry.value().clone())
    }

    /// Most recent history entries, newest first.
    pub fn history(&self, symbol: &str, max_entries: usize) -> Vec<SentimentHistoryEntry> {
        self.history
            .get(&symbol.to_uppercase())
            .map(|entries| entries.iter().rev().take(max_entries).cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for SentimentStore {
    fn default() -> Self {
        Self {
            latest: DashMap::new(),
            history: DashMap::new(),
        }
    }
}

/// Describe how long ago an analysis ran.
///
/// Recent analyses read as "Just now", "N min ago", "N hours ago" or
/// "N days ago"; anything a week or older shows the date, with the year
/// only when it differs from `now`'s.
pub fn format_age(analyzed_at_ms: i64, now: DateTime<Utc>) -> String {
    let Some(analyzed) = Utc.timestamp_millis_opt(analyzed_at_ms).single() else {
        return String::new();
    };

    let diff_ms = now.timestamp_millis() - analyzed_at_ms;
    let mins = diff_ms.div_euclid(60_000);
    let hours = diff_ms.div_euclid(3_600_000);
    let days = diff_ms.div_euclid(86_400_000);

    let plural = |n: i64| if n > 1 { "s" } else { "" };

    if mins < 1 {
        "Just now".to_string()
    } else if mins < 60 {
        format!("{} min ago", mins)
    } else if hours < 24 {
        format!("{} hour{} ago", hours, plural(hours))
    } else if days < 7 {
        format!("{} day{} ago", days, plural(days))
    } else if analyzed.year() != now.year() {
        analyzed.format("%b %-d, %Y").to_string()
    } else {
        analyzed.format("%b %-d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SentimentLabel;
    use chrono::Duration;

    fn bullish() -> SentimentResult {
        SentimentResult {
            score: 0.6,
            label: SentimentLabel::Bullish,
            rationale: "Strong quarter".to_string(),
        }
    }

    #[test]
    fn test_store_and_latest() {
        let store = SentimentStore::new();
        let headlines: Vec<String> = (0..15).map(|i| format!("headline {}", i)).collect();

        store.store("aapl", bullish(), &headlines);

        let latest = store.latest("AAPL").unwrap();
        assert_eq!(latest.symbol, "AAPL");
        assert_eq!(latest.sentiment, bullish());
        assert_eq!(latest.headlines_count, 15);
        assert_eq!(latest.headlines.len(), 10);
        assert!(store.latest("MSFT").is_none());
    }

    #[test]
    fn test_history_newest_first() {
        let store = SentimentStore::new();
        for i in 0..5 {
            let sentiment = SentimentResult {
                score: i as f64 / 10.0,
                ..bullish()
            };
            store.store("TSLA", sentiment, &[]);
        }

        let history = store.history("tsla", 3);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].score, 0.4);
        assert_eq!(history[2].score, 0.2);
        assert!(store.history("NVDA", 30).is_empty());
    }

    #[test]
    fn test_history_is_bounded() {
        let store = SentimentStore::new();
        for _ in 0..(MAX_HISTORY + 5) {
            store.store("AMD", bullish(), &[]);
        }
        assert_eq!(store.history("AMD", usize::MAX).len(), MAX_HISTORY);
    }

    #[test]
    fn test_stored_sentiment_flattens_result() {
        let store = SentimentStore::new();
        let stored = store.store("META", bullish(), &["Meta news".to_string()]);
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["score"], 0.6);
        assert_eq!(json["label"], "Bullish");
        assert_eq!(json["headlinesCount"], 1);
        assert!(json.get("sentiment").is_none());
    }

    #[test]
    fn test_format_age() {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap();
        let ago = |d: Duration| (now - d).timestamp_millis();

        assert_eq!(format_age(ago(Duration::seconds(30)), now), "Just now");
        assert_eq!(format_age(ago(Duration::minutes(5)), now), "5 min ago");
        assert_eq!(format_age(ago(Duration::minutes(60)), now), "1 hour ago");
        assert_eq!(format_age(ago(Duration::hours(3)), now), "3 hours ago");
        assert_eq!(format_age(ago(Duration::hours(24)), now), "1 day ago");
        assert_eq!(format_age(ago(Duration::days(6)), now), "6 days ago");
        assert_eq!(format_age(ago(Duration::days(10)), now), "Mar 5");
        assert_eq!(format_age(ago(Duration::days(100)), now), "Dec 5, 2025");
    }
}
