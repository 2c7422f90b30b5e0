//! Signal store: fetches market data, combines it with stored sentiment and
//! memoizes the resulting signals.

use chrono::{TimeZone, Utc};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::engine::{generate_quick_signal, generate_signal};
use super::indicators::MacdSignalMode;
use super::technicals::calculate_technicals_with;
use crate::error::{AppError, Result};
use crate::services::cache::CacheStore;
use crate::services::sentiment::SentimentStore;
use crate::sources::{NewsSource, PriceSource, SentimentSource};
use crate::types::{
    HistoryRange, Quote, RefreshResult, SentimentResult, SignalResult, SignalSnapshot,
    SymbolSignal, TickerMarketData, TickerSnapshot, TrackedSymbol, UpdateReport, UpdateResult,
    UpdateStatus,
};

/// Fewest daily closes the scheduled update accepts for a symbol.
pub const MIN_UPDATE_POINTS: usize = 50;

/// Tunables for a [`SignalStore`].
#[derive(Debug, Clone)]
pub struct SignalSettings {
    pub macd_mode: MacdSignalMode,
    /// History window used for technicals.
    pub history_range: HistoryRange,
    /// Symbols refreshed by [`SignalStore::update_tracked`].
    pub tracked: Vec<TrackedSymbol>,
    /// Pause after each successful symbol during an update run.
    pub update_delay: Duration,
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            macd_mode: MacdSignalMode::default(),
            history_range: HistoryRange::ThreeMonths,
            tracked: Vec::new(),
            update_delay: Duration::from_millis(500),
        }
    }
}

/// External collaborators a [`SignalStore`] is driven by.
pub struct SignalSources {
    pub prices: Arc<dyn PriceSource>,
    pub news: Arc<dyn NewsSource>,
    pub sentiment: Arc<dyn SentimentSource>,
}

enum UpdateOutcome {
    Updated,
    Skipped(&'static str),
}

/// Computes, caches and records trading signals.
pub struct SignalStore {
    sources: SignalSources,
    sentiment_store: Arc<SentimentStore>,
    cache: Arc<dyn CacheStore<SymbolSignal>>,
    /// Latest scheduled analysis per symbol.
    snapshots: DashMap<String, TickerSnapshot>,
    settings: SignalSettings,
}

impl SignalStore {
    pub fn new(
        sources: SignalSources,
        sentiment_store: Arc<SentimentStore>,
        cache: Arc<dyn CacheStore<SymbolSignal>>,
        settings: SignalSettings,
    ) -> Arc<Self> {
        Arc::new(Self {
            sources,
            sentiment_store,
            cache,
            snapshots: DashMap::new(),
            settings,
        })
    }

    pub fn tracked(&self) -> &[TrackedSymbol] {
        &self.settings.tracked
    }

    /// Number of signals currently held by the cache.
    pub fn cached_signals(&self) -> usize {
        self.cache.entry_count()
    }

    /// Signal for a symbol from live market data.
    ///
    /// Uses the latest stored sentiment when there is one, otherwise falls
    /// back to a quick signal with `sentiment_analyzed: false`.
    pub async fn analyze(&self, symbol: &str) -> Result<SymbolSignal> {
        self.analyze_cached(symbol).await.map(|(signal, _)| signal)
    }

    /// Like [`SignalStore::analyze`], also reporting whether the signal was
    /// served from cache.
    pub async fn analyze_cached(&self, symbol: &str) -> Result<(SymbolSignal, bool)> {
        let symbol = normalize_symbol(symbol)?;

        if let Some(cached) = self.cache.get(&symbol) {
            debug!("Serving cached signal for {}", symbol);
            return Ok((cached, true));
        }

        let (quote, closes) = self.market_data(&symbol).await;
        let quote = quote?;
        // Missing history degrades the technicals rather than failing the request.
        let closes = closes.unwrap_or_else(|e| {
            warn!("No history for {}, using live price only: {}", symbol, e);
            Vec::new()
        });

        let stored = self.sentiment_store.latest(&symbol).map(|s| s.sentiment);
        let signal = self.compute(&symbol, &quote, &closes, stored);

        self.cache.put(symbol, signal.clone());
        Ok((signal, false))
    }

    /// Run a fresh sentiment analysis for a symbol and store it.
    ///
    /// Symbols without a quote are refused before anything is stored. The
    /// signal is recomputed with the new sentiment when history is
    /// available; a history failure only leaves `signal` empty.
    pub async fn refresh_sentiment(&self, symbol: &str) -> Result<RefreshResult> {
        let symbol = normalize_symbol(symbol)?;

        let (quote, closes) = self.market_data(&symbol).await;
        let quote = quote.map_err(|e| {
            warn!("Refusing sentiment refresh for {}: {}", symbol, e);
            AppError::from(e)
        })?;

        info!("Refreshing sentiment for {}", symbol);

        let headlines = self.headlines(&symbol).await;
        let sentiment = self.sources.sentiment.analyze(&symbol, &headlines).await;
        let stored = self
            .sentiment_store
            .store(&symbol, sentiment.clone(), &headlines);

        let signal = match closes {
            Ok(closes) if !closes.is_empty() => {
                let computed = self.compute(&symbol, &quote, &closes, Some(sentiment.clone()));
                let signal = computed.signal.clone();
                self.cache.put(symbol.clone(), computed);
                Some(signal)
            }
            Ok(_) => None,
            Err(e) => {
                warn!("No history for {} after sentiment refresh: {}", symbol, e);
                None
            }
        };

        Ok(RefreshResult {
            symbol,
            sentiment,
            signal,
            headlines_analyzed: headlines.len(),
            stored_at: to_rfc3339(stored.analyzed_at),
        })
    }

    /// Refresh every tracked symbol, one at a time.
    ///
    /// Per-symbol failures are reported, never propagated.
    pub async fn update_tracked(&self) -> UpdateReport {
        info!(
            "Starting signal update for {} symbols",
            self.settings.tracked.len()
        );

        let mut results = Vec::with_capacity(self.settings.tracked.len());

        for tracked in &self.settings.tracked {
            let result = match self.update_one(tracked).await {
                Ok(UpdateOutcome::Updated) => {
                    info!("Updated {}", tracked.symbol);
                    if !self.settings.update_delay.is_zero() {
                        tokio::time::sleep(self.settings.update_delay).await;
                    }
                    UpdateResult {
                        symbol: tracked.symbol.clone(),
                        status: UpdateStatus::Success,
                        error: None,
                    }
                }
                Ok(UpdateOutcome::Skipped(reason)) => {
                    warn!("Skipping {}: {}", tracked.symbol, reason);
                    UpdateResult {
                        symbol: tracked.symbol.clone(),
                        status: UpdateStatus::Skipped,
                        error: Some(reason.to_string()),
                    }
                }
                Err(e) => {
                    error!("Error processing {}: {}", tracked.symbol, e);
                    UpdateResult {
                        symbol: tracked.symbol.clone(),
                        status: UpdateStatus::Error,
                        error: Some(e.to_string()),
                    }
                }
            };
            results.push(result);
        }

        let report = UpdateReport::from_results(results);
        info!(
            "Signal update finished: {} updated, {} skipped, {} errors",
            report.summary.success, report.summary.skipped, report.summary.errors
        );
        report
    }

    async fn update_one(&self, tracked: &TrackedSymbol) -> Result<UpdateOutcome> {
        let symbol = normalize_symbol(&tracked.symbol)?;

        let quote = match self.sources.prices.quote(&symbol).await {
            Ok(quote) => quote,
            Err(e) => {
                debug!("Quote failed for {}: {}", symbol, e);
                return Ok(UpdateOutcome::Skipped("No quote data"));
            }
        };
        if !quote.price.is_finite() || quote.price <= 0.0 {
            return Err(AppError::ExternalApi(format!(
                "Invalid price {} for {}",
                quote.price, symbol
            )));
        }

        let closes = self
            .sources
            .prices
            .daily_closes(&symbol, self.settings.history_range)
            .await
            .unwrap_or_else(|e| {
                debug!("History failed for {}: {}", symbol, e);
                Vec::new()
            });
        if closes.len() < MIN_UPDATE_POINTS {
            return Ok(UpdateOutcome::Skipped("Insufficient historical data"));
        }

        let headlines = self.headlines(&symbol).await;
        let sentiment = self.sources.sentiment.analyze(&symbol, &headlines).await;
        self.sentiment_store
            .store(&symbol, sentiment.clone(), &headlines);

        let computed = self.compute(&symbol, &quote, &closes, Some(sentiment.clone()));

        let snapshot = TickerSnapshot {
            symbol: symbol.clone(),
            name: tracked.name.clone(),
            last_updated: computed.computed_at,
            market_data: TickerMarketData {
                price: quote.price,
                change_percent: quote.change_percent,
                change: quote.change,
                volume: quote.volume,
                rsi14: computed.technicals.rsi,
                macd_hist: computed.technicals.macd_hist,
            },
            sentiment,
            signal: computed.signal.clone(),
        };

        self.snapshots.insert(symbol.clone(), snapshot);
        self.cache.put(symbol, computed);
        Ok(UpdateOutcome::Updated)
    }

    /// Stored signal and sentiment for each requested symbol.
    ///
    /// Symbols without a recorded snapshot are left out.
    pub fn snapshots(&self, symbols: &[String]) -> BTreeMap<String, SignalSnapshot> {
        symbols
            .iter()
            .filter_map(|symbol| {
                let key = symbol.trim().to_uppercase();
                let snapshot = self.snapshots.get(&key)?;
                Some((key, SignalSnapshot::from(snapshot.value())))
            })
            .collect()
    }

    /// Full snapshot recorded for a symbol by the last update run.
    pub fn snapshot(&self, symbol: &str) -> Option<TickerSnapshot> {
        self.snapshots
            .get(&symbol.trim().to_uppercase())
            .map(|s| s.value().clone())
    }

    async fn market_data(
        &self,
        symbol: &str,
    ) -> (
        std::result::Result<Quote, crate::sources::SourceError>,
        std::result::Result<Vec<f64>, crate::sources::SourceError>,
    ) {
        tokio::join!(
            self.sources.prices.quote(symbol),
            self.sources
                .prices
                .daily_closes(symbol, self.settings.history_range)
        )
    }

    async fn headlines(&self, symbol: &str) -> Vec<String> {
        self.sources
            .news
            .headlines(symbol)
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to fetch headlines for {}: {}", symbol, e);
                Vec::new()
            })
    }

    fn compute(
        &self,
        symbol: &str,
        quote: &Quote,
        closes: &[f64],
        sentiment: Option<SentimentResult>,
    ) -> SymbolSignal {
        let (technicals, sufficiency) =
            calculate_technicals_with(closes, quote.price, self.settings.macd_mode);

        debug!(
            "Computed technicals for {} from {} closes (full history: {}, MACD signal: {:?})",
            symbol,
            sufficiency.points,
            sufficiency.history_complete(),
            self.settings.macd_mode
        );

        let signal: SignalResult = match &sentiment {
            Some(s) => generate_signal(&technicals, s),
            None => generate_quick_signal(&technicals),
        };

        SymbolSignal {
            symbol: symbol.to_string(),
            price: quote.price,
            change_percent: quote.change_percent,
            technicals,
            sufficiency,
            sentiment_analyzed: sentiment.is_some(),
            sentiment,
            signal,
            computed_at: Utc::now().timestamp_millis(),
        }
    }
}

fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AppError::BadRequest("Symbol is required".to_string()));
    }
    Ok(symbol)
}

fn to_rfc3339(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_else(Utc::now)
        .to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" aapl ").unwrap(), "AAPL");
        assert!(matches!(normalize_symbol("  "), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_to_rfc3339() {
        assert_eq!(to_rfc3339(0), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_default_settings() {
        let settings = SignalSettings::default();
        assert_eq!(settings.history_range, HistoryRange::ThreeMonths);
        assert_eq!(settings.update_delay, Duration::from_millis(500));
        assert!(settings.tracked.is_empty());
    }
}
