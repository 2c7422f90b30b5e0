//! Augur - technical indicator and sentiment-weighted trading signal server

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use std::sync::Arc;

use config::Config;
use services::{SentimentStore, SignalStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub signal_store: Arc<SignalStore>,
    pub sentiment_store: Arc<SentimentStore>,
}

// Re-export commonly used types
pub use error::{AppError, Result};
pub use types::*;
