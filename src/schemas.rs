use crate::config::AppConfig;
use market::QuoteSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Memoizing market-data source
    pub source: Arc<dyn QuoteSource>,
    /// Runtime configuration
    pub config: AppConfig,
}

/// Raw form submission from the dashboard. `ticker` is `None` until the
/// user submits the form for the first time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub ticker: Option<String>,
    pub years: Option<u8>,
}

/// A validated-shape forecast request: ticker plus horizon years.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForecastRequest {
    /// Security symbol, forwarded verbatim to the provider
    #[validate(length(
        min = 1,
        message = "Please enter a stock ticker (e.g. \"RELIANCE.NS\", \"AAPL\")."
    ))]
    pub ticker: String,
    /// Forecast horizon in years
    #[validate(range(min = 1, max = 4, message = "Prediction years must be between 1 and 4."))]
    pub years: u8,
}

impl ForecastRequest {
    /// Builds a request from the raw form values, trimming the ticker so
    /// whitespace-only input fails the non-empty validation.
    pub fn from_query(query: &DashboardQuery) -> Option<Self> {
        query.ticker.as_ref().map(|raw| Self {
            ticker: raw.trim().to_string(),
            years: query.years.unwrap_or(1),
        })
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}
