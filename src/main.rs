use augur::config::Config;
use augur::services::signals::{SignalSettings, SignalSources};
use augur::services::{Cache, SentimentStore, SignalStore};
use augur::sources::openai::OpenAiConfig;
use augur::sources::{OpenAiSentimentClient, YahooFinanceClient};
use augur::types::SymbolSignal;
use augur::{api, AppState};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "augur=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting Augur server on {}:{}", config.host, config.port);

    let yahoo = Arc::new(YahooFinanceClient::new(config.http_timeout())?);
    let openai = Arc::new(OpenAiSentimentClient::new(OpenAiConfig {
        api_key: config.openai_api_key.clone(),
        model: config.openai_model.clone(),
        timeout: config.http_timeout(),
        ..Default::default()
    })?);
    if !openai.is_configured() {
        warn!("OPENAI_API_KEY not set - signals will use neutral sentiment");
    }
    if config.cron_secret.is_none() {
        warn!("CRON_SECRET not set - the update endpoint will reject all requests");
    }

    let sentiment_store = SentimentStore::new();
    let signal_store = SignalStore::new(
        SignalSources {
            prices: yahoo.clone(),
            news: yahoo,
            sentiment: openai,
        },
        sentiment_store.clone(),
        Arc::new(Cache::<SymbolSignal>::new(config.signal_cache_ttl())),
        SignalSettings {
            macd_mode: config.macd_signal_mode,
            tracked: config.tracked_symbols.clone(),
            update_delay: config.cron_delay(),
            ..Default::default()
        },
    );
    info!(
        "Tracking {} symbols, MACD signal mode {:?}",
        config.tracked_symbols.len(),
        config.macd_signal_mode
    );

    // Start the in-process scheduled update if configured
    if config.update_interval_secs > 0 {
        let signal_store = signal_store.clone();
        let period = Duration::from_secs(config.update_interval_secs);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let report = signal_store.update_tracked().await;
                info!(
                    "Scheduled update: {}/{} symbols updated",
                    report.summary.success, report.summary.total
                );
            }
        });
    }

    let state = AppState {
        config: config.clone(),
        signal_store,
        sentiment_store,
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = api::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Augur server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
