use std::env;
use std::time::Duration;

use crate::services::signals::MacdSignalMode;
use crate::types::TrackedSymbol;

/// Symbols tracked by the scheduled update when `TRACKED_SYMBOLS` is unset.
const DEFAULT_TRACKED: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("GOOGL", "Alphabet Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("NVDA", "NVIDIA Corporation"),
    ("TSLA", "Tesla, Inc."),
    ("AMZN", "Amazon.com, Inc."),
    ("META", "Meta Platforms, Inc."),
    ("AMD", "Advanced Micro Devices"),
];

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// OpenAI API key. Sentiment is neutral without one.
    pub openai_api_key: Option<String>,
    /// OpenAI chat model.
    pub openai_model: String,
    /// Shared secret for the scheduled update endpoint.
    pub cron_secret: Option<String>,
    /// Symbols refreshed by the scheduled update.
    pub tracked_symbols: Vec<TrackedSymbol>,
    /// How long a computed signal is served from cache (seconds).
    pub signal_cache_ttl_secs: u64,
    /// Pause between symbols during the scheduled update (ms).
    pub cron_delay_ms: u64,
    /// Run the scheduled update in-process every N seconds (0 = only via the cron endpoint).
    pub update_interval_secs: u64,
    /// How the MACD signal line is derived.
    pub macd_signal_mode: MacdSignalMode,
    /// Timeout for outbound HTTP requests (seconds).
    pub http_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        // Format: "AAPL|Apple Inc.,MSFT|Microsoft Corporation"
        let tracked_symbols = env::var("TRACKED_SYMBOLS")
            .ok()
            .map(|s| parse_tracked_symbols(&s))
            .filter(|symbols| !symbols.is_empty())
            .unwrap_or_else(default_tracked_symbols);

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            cron_secret: env::var("CRON_SECRET").ok().filter(|s| !s.is_empty()),
            tracked_symbols,
            signal_cache_ttl_secs: env::var("SIGNAL_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            cron_delay_ms: env::var("CRON_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            update_interval_secs: env::var("UPDATE_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            macd_signal_mode: env::var("MACD_SIGNAL_MODE")
                .ok()
                .and_then(|v| MacdSignalMode::from_str(&v))
                .unwrap_or_default(),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    pub fn signal_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.signal_cache_ttl_secs)
    }

    pub fn cron_delay(&self) -> Duration {
        Duration::from_millis(self.cron_delay_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            cron_secret: None,
            tracked_symbols: default_tracked_symbols(),
            signal_cache_ttl_secs: 60,
            cron_delay_ms: 500,
            update_interval_secs: 0,
            macd_signal_mode: MacdSignalMode::default(),
            http_timeout_secs: 30,
        }
    }
}

/// Parse a comma separated `SYMBOL|Name` list.
///
/// Entries without a name use the symbol as the name. Blank entries are
/// dropped and symbols are uppercased.
pub fn parse_tracked_symbols(s: &str) -> Vec<TrackedSymbol> {
    s.split(',')
        .filter_map(|entry| {
            let mut parts = entry.splitn(2, '|');
            let symbol = parts.next()?.trim().to_uppercase();
            if symbol.is_empty() {
                return None;
            }
            let name = parts
                .next()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| symbol.clone());
            Some(TrackedSymbol { symbol, name })
        })
        .collect()
}

fn default_tracked_symbols() -> Vec<TrackedSymbol> {
    DEFAULT_TRACKED
        .iter()
        .map(|(symbol, name)| TrackedSymbol::new(*symbol, *name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert!(config.cron_secret.is_none());
        assert_eq!(config.macd_signal_mode, MacdSignalMode::Approximate);
        assert_eq!(config.signal_cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.cron_delay(), Duration::from_millis(500));
        assert_eq!(config.update_interval_secs, 0);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_tracked_symbols() {
        let symbols = default_tracked_symbols();
        assert_eq!(symbols.len(), 8);
        assert_eq!(symbols[0], TrackedSymbol::new("AAPL", "Apple Inc."));
        assert_eq!(symbols[4].name, "Tesla, Inc.");
    }

    #[test]
    fn test_parse_tracked_symbols() {
        let symbols = parse_tracked_symbols(" aapl|Apple Inc. , MSFT ,,brk.b|Berkshire Hathaway");
        assert_eq!(
            symbols,
            vec![
                TrackedSymbol::new("AAPL", "Apple Inc."),
                TrackedSymbol::new("MSFT", "MSFT"),
                TrackedSymbol::new("BRK.B", "Berkshire Hathaway"),
            ]
        );
    }

    #[test]
    fn test_parse_tracked_symbols_empty() {
        assert!(parse_tracked_symbols("").is_empty());
        assert!(parse_tracked_symbols(" , ,").is_empty());
    }
}
