//! Yahoo Finance client for quotes, daily history and news headlines.
//!
//! Uses the unofficial chart and search endpoints, which need no API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{NewsSource, PriceSource, SourceError};
use crate::types::{HistoryRange, Quote};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// News items considered when filtering for relevance.
const NEWS_SCAN_LIMIT: usize = 20;
/// Maximum headlines handed to sentiment analysis.
const HEADLINE_LIMIT: usize = 10;

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    symbol: String,
    short_name: Option<String>,
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
    regular_market_volume: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    close: Option<Vec<Option<f64>>>,
}

/// Yahoo Finance search response (only the parts we read).
#[derive(Debug, Deserialize)]
struct YahooSearchResponse {
    #[serde(default)]
    quotes: Vec<YahooSearchQuote>,
    #[serde(default)]
    news: Vec<YahooNewsItem>,
}

#[derive(Debug, Deserialize)]
struct YahooSearchQuote {
    symbol: Option<String>,
    shortname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooNewsItem {
    title: Option<String>,
}

/// Normalize symbol for Yahoo Finance API.
/// Yahoo uses hyphens instead of dots for share classes (e.g., BRK-B not BRK.B)
fn normalize_yahoo_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase().replace('.', "-")
}

impl YahooChartResponse {
    /// Unwrap the first chart result, surfacing API errors.
    fn into_result(self, symbol: &str) -> Result<YahooResult, SourceError> {
        if let Some(error) = self.chart.error {
            return Err(SourceError::Api(format!(
                "Yahoo API error: {} - {}",
                error.code, error.description
            )));
        }

        self.chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| SourceError::NoData(symbol.to_string()))
    }
}

impl YahooResult {
    /// Closing prices with null entries dropped.
    fn closes(&self) -> Vec<f64> {
        self.indicators
            .quote
            .first()
            .and_then(|q| q.close.as_ref())
            .map(|closes| closes.iter().filter_map(|c| *c).filter(|c| *c > 0.0).collect())
            .unwrap_or_default()
    }

    fn quote(&self) -> Result<Quote, SourceError> {
        let meta = &self.meta;
        let price = meta
            .regular_market_price
            .ok_or_else(|| SourceError::NoData(meta.symbol.clone()))?;
        let previous_close = meta
            .previous_close
            .or(meta.chart_previous_close)
            .unwrap_or(0.0);

        let change = if previous_close > 0.0 {
            price - previous_close
        } else {
            0.0
        };
        let change_percent = if previous_close > 0.0 {
            change / previous_close * 100.0
        } else {
            0.0
        };

        Ok(Quote {
            symbol: meta.symbol.clone(),
            name: meta.short_name.clone(),
            price,
            change,
            change_percent,
            previous_close,
            volume: meta.regular_market_volume.unwrap_or(0),
        })
    }
}

/// Pick headlines that mention the symbol or company.
///
/// Only the first 20 titles are considered and at most 10 are kept. When
/// nothing mentions the company, the first 10 non-empty titles are used
/// instead so sentiment analysis still has something to read.
pub fn filter_headlines(symbol: &str, company_name: &str, titles: &[String]) -> Vec<String> {
    let symbol_upper = symbol.to_uppercase();
    let company_lower = company_name.to_lowercase();
    let company_first_word = company_lower
        .split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .unwrap_or_default()
        .to_string();

    let relevant: Vec<String> = titles
        .iter()
        .take(NEWS_SCAN_LIMIT)
        .filter(|title| {
            if title.is_empty() {
                return false;
            }
            let lower = title.to_lowercase();
            title.to_uppercase().contains(&symbol_upper)
                || lower.contains(&company_lower)
                || (!company_first_word.is_empty() && lower.contains(&company_first_word))
        })
        .take(HEADLINE_LIMIT)
        .cloned()
        .collect();

    if !relevant.is_empty() {
        return relevant;
    }

    debug!(
        "No headlines mention {} or {}, using all available",
        symbol, company_name
    );
    titles
        .iter()
        .take(HEADLINE_LIMIT)
        .filter(|t| !t.is_empty())
        .cloned()
        .collect()
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client.
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Create a client against a different host (for proxies or stubs).
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch a chart for a symbol.
    ///
    /// Arguments:
    /// - range: Time range ("5d", "1mo", "3mo", "6mo", "1y", ...)
    /// - interval: Data interval ("1d", "1wk", ...)
    async fn chart(&self, symbol: &str, range: &str, interval: &str) -> Result<YahooResult, SourceError> {
        let yahoo_symbol = normalize_yahoo_symbol(symbol);
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}&includePrePost=false",
            self.base_url, yahoo_symbol, range, interval
        );

        debug!("Fetching Yahoo Finance chart: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Api(format!("Yahoo chart: {}", response.status())));
        }

        let data: YahooChartResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        data.into_result(&yahoo_symbol)
    }

    async fn search(&self, symbol: &str) -> Result<YahooSearchResponse, SourceError> {
        let url = format!(
            "{}/v1/finance/search?q={}&quotesCount=1&newsCount={}",
            self.base_url,
            normalize_yahoo_symbol(symbol),
            NEWS_SCAN_LIMIT
        );

        debug!("Fetching Yahoo Finance news: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Api(format!("Yahoo search: {}", response.status())));
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PriceSource for YahooFinanceClient {
    async fn quote(&self, symbol: &str) -> Result<Quote, SourceError> {
        self.chart(symbol, "5d", "1d").await?.quote()
    }

    async fn daily_closes(
        &self,
        symbol: &str,
        range: HistoryRange,
    ) -> Result<Vec<f64>, SourceError> {
        Ok(self.chart(symbol, range.as_str(), "1d").await?.closes())
    }
}

#[async_trait]
impl NewsSource for YahooFinanceClient {
    async fn headlines(&self, symbol: &str) -> Result<Vec<String>, SourceError> {
        let search = self.search(symbol).await?;
        let symbol_upper = normalize_yahoo_symbol(symbol);

        let company_name = search
            .quotes
            .iter()
            .find(|q| q.symbol.as_deref() == Some(symbol_upper.as_str()))
            .and_then(|q| q.shortname.clone())
            .unwrap_or_else(|| symbol_upper.clone());

        let titles: Vec<String> = search
            .news
            .into_iter()
            .map(|item| item.title.unwrap_or_default())
            .collect();

        Ok(filter_headlines(&symbol_upper, &company_name, &titles))
    }
}
