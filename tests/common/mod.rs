//! Fixed-data sources shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use augur::config::Config;
use augur::services::signals::{SignalSettings, SignalSources};
use augur::services::{Cache, SentimentStore, SignalStore};
use augur::sources::{NewsSource, PriceSource, SentimentSource, SourceError};
use augur::types::{
    HistoryRange, Quote, SentimentLabel, SentimentResult, SymbolSignal, TrackedSymbol,
};
use augur::AppState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// `n` closes starting at `start`, moving `step` per day.
pub fn trend(n: usize, start: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

pub fn quote(symbol: &str, price: f64) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        name: None,
        price,
        change: 1.5,
        change_percent: 1.2,
        previous_close: price - 1.5,
        volume: 1_000_000,
    }
}

/// Price source backed by in-memory quotes and histories.
#[derive(Default)]
pub struct FakeMarket {
    quotes: HashMap<String, Quote>,
    closes: HashMap<String, Vec<f64>>,
    pub quote_calls: AtomicUsize,
}

impl FakeMarket {
    pub fn with_symbol(mut self, symbol: &str, price: f64, closes: Vec<f64>) -> Self {
        self.quotes.insert(symbol.to_string(), quote(symbol, price));
        self.closes.insert(symbol.to_string(), closes);
        self
    }

    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quotes.insert(quote.symbol.clone(), quote);
        self
    }
}

#[async_trait]
impl PriceSource for FakeMarket {
    async fn quote(&self, symbol: &str) -> Result<Quote, SourceError> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        self.quotes
            .get(symbol)
            .cloned()
            .ok_or_else(|| SourceError::NoData(symbol.to_string()))
    }

    async fn daily_closes(
        &self,
        symbol: &str,
        _range: HistoryRange,
    ) -> Result<Vec<f64>, SourceError> {
        self.closes
            .get(symbol)
            .cloned()
            .ok_or_else(|| SourceError::NoData(symbol.to_string()))
    }
}

/// News source returning the same headlines for every symbol.
pub struct FakeNews(pub Vec<String>);

#[async_trait]
impl NewsSource for FakeNews {
    async fn headlines(&self, _symbol: &str) -> Result<Vec<String>, SourceError> {
        Ok(self.0.clone())
    }
}

/// Sentiment source returning a fixed reading whenever there are headlines.
pub struct FakeSentiment(pub SentimentResult);

#[async_trait]
impl SentimentSource for FakeSentiment {
    async fn analyze(&self, _symbol: &str, headlines: &[String]) -> SentimentResult {
        if headlines.is_empty() {
            return SentimentResult::neutral("No recent news headlines available for analysis.");
        }
        self.0.clone()
    }
}

pub fn bullish() -> SentimentResult {
    SentimentResult {
        score: 0.6,
        label: SentimentLabel::Bullish,
        rationale: "Record iPhone revenue and raised guidance.".to_string(),
    }
}

pub fn headlines() -> Vec<String> {
    vec![
        "Apple beats earnings estimates".to_string(),
        "Apple raises dividend".to_string(),
    ]
}

/// The market most tests run against.
///
/// AAPL has a full history, NVDA only 30 days, MSFT has no quote at all.
pub fn default_market() -> FakeMarket {
    FakeMarket::default()
        .with_symbol("AAPL", 160.0, trend(60, 100.0, 1.0))
        .with_symbol("NVDA", 900.0, trend(30, 850.0, 1.0))
}

pub fn tracked() -> Vec<TrackedSymbol> {
    vec![
        TrackedSymbol::new("AAPL", "Apple Inc."),
        TrackedSymbol::new("MSFT", "Microsoft Corporation"),
        TrackedSymbol::new("NVDA", "NVIDIA Corporation"),
    ]
}

pub struct Harness {
    pub market: Arc<FakeMarket>,
    pub signal_store: Arc<SignalStore>,
    pub sentiment_store: Arc<SentimentStore>,
}

pub fn harness(market: FakeMarket, news: Vec<String>) -> Harness {
    harness_with_ttl(market, news, Duration::from_secs(60))
}

pub fn harness_with_ttl(market: FakeMarket, news: Vec<String>, ttl: Duration) -> Harness {
    let market = Arc::new(market);
    let sentiment_store = SentimentStore::new();
    let signal_store = SignalStore::new(
        SignalSources {
            prices: market.clone(),
            news: Arc::new(FakeNews(news)),
            sentiment: Arc::new(FakeSentiment(bullish())),
        },
        sentiment_store.clone(),
        Arc::new(Cache::<SymbolSignal>::new(ttl)),
        SignalSettings {
            tracked: tracked(),
            update_delay: Duration::ZERO,
            ..Default::default()
        },
    );

    Harness {
        market,
        signal_store,
        sentiment_store,
    }
}

pub fn app_state(cron_secret: Option<&str>) -> AppState {
    let h = harness(default_market(), headlines());
    AppState {
        config: Arc::new(Config {
            cron_secret: cron_secret.map(str::to_string),
            ..Default::default()
        }),
        signal_store: h.signal_store,
        sentiment_store: h.sentiment_store,
    }
}
