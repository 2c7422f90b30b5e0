//! External data collaborators.
//!
//! Signal computation only needs three things from the outside world:
//! price history plus a live quote, news headlines, and a sentiment
//! reading for those headlines. Each is a trait so services can be driven
//! by real providers in production and by fixed data in tests.

pub mod openai;
pub mod yahoo;

pub use openai::OpenAiSentimentClient;
pub use yahoo::YahooFinanceClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{HistoryRange, Quote, SentimentResult};

/// Errors returned by data sources.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No data for {0}")]
    NoData(String),
}

/// Supplies live quotes and daily closing history.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Current quote for a symbol.
    async fn quote(&self, symbol: &str) -> Result<Quote, SourceError>;

    /// Daily closes, oldest first, with missing closes dropped.
    async fn daily_closes(&self, symbol: &str, range: HistoryRange)
        -> Result<Vec<f64>, SourceError>;
}

/// Supplies recent news headlines for a symbol.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn headlines(&self, symbol: &str) -> Result<Vec<String>, SourceError>;
}

/// Turns headlines into a sentiment reading.
///
/// Implementations degrade to a neutral reading rather than failing, so
/// a sentiment outage never blocks signal generation.
#[async_trait]
pub trait SentimentSource: Send + Sync {
    async fn analyze(&self, symbol: &str, headlines: &[String]) -> SentimentResult;
}
