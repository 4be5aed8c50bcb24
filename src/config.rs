use anyhow::{Context, Result};
use chrono::NaiveDate;
use common::DateRange;
use market::{CachedQuoteSource, YahooClient};
use std::sync::Arc;
use std::time::Duration;

use crate::schemas::AppState;

/// Runtime configuration drawn from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// First day of the historical fetch window.
    pub history_start: NaiveDate,
    /// Chart-API base URL.
    pub provider_url: String,
    /// Maximum number of tickers retained in the fetch cache.
    pub cache_capacity: usize,
    /// Lifetime of a cached fetch outcome.
    pub cache_ttl: Duration,
}

impl AppConfig {
    /// Loads configuration, falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let history_start = match std::env::var("STOCKCAST_START_DATE") {
            Ok(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .with_context(|| format!("invalid STOCKCAST_START_DATE: {raw}"))?,
            Err(_) => NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
        };

        let provider_url = std::env::var("STOCKCAST_PROVIDER_URL")
            .unwrap_or_else(|_| market::yahoo::DEFAULT_BASE_URL.to_string());

        let cache_capacity = match std::env::var("STOCKCAST_CACHE_CAPACITY") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("invalid STOCKCAST_CACHE_CAPACITY: {raw}"))?,
            Err(_) => 100,
        };

        let cache_ttl = match std::env::var("STOCKCAST_CACHE_TTL_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse()
                    .with_context(|| format!("invalid STOCKCAST_CACHE_TTL_SECS: {raw}"))?,
            ),
            Err(_) => Duration::from_secs(300),
        };

        Ok(Self {
            history_start,
            provider_url,
            cache_capacity,
            cache_ttl,
        })
    }

    /// The fetch window: fixed start through `today`.
    pub fn fetch_range(&self, today: NaiveDate) -> DateRange {
        DateRange::new(self.history_start, today)
    }
}

/// Initialize application configuration and state
pub fn initialize_app_state() -> Result<AppState> {
    let config = AppConfig::from_env()?;

    tracing::info!(
        provider_url = %config.provider_url,
        history_start = %config.history_start,
        "initializing market-data source"
    );
    let client = YahooClient::new(&config.provider_url)?;
    let source = CachedQuoteSource::new(client, config.cache_capacity, config.cache_ttl);

    Ok(AppState {
        source: Arc::new(source),
        config,
    })
}

/// Get bind address from environment or use default
pub fn get_bind_address() -> String {
    std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}
