use common::PriceSeries;
use thiserror::Error;

/// Error types for market-data operations.
///
/// Variants are `Clone` so a complete fetch outcome, failure included, can
/// live in the memoization cache and be replayed on later calls.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    /// The HTTP round-trip itself failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The provider responded with something that is not the chart schema.
    #[error("invalid provider response: {0}")]
    Parse(String),

    /// The provider answered with an explicit error payload.
    #[error("provider error [{code}]: {description}")]
    Api { code: String, description: String },

    /// The fetch succeeded but carried zero usable rows.
    #[error("no data found for {0}")]
    NoData(String),
}

/// Type alias for Result with MarketError.
pub type Result<T> = std::result::Result<T, MarketError>;

/// A complete fetch outcome, as stored in the memoization cache.
pub type FetchResult = Result<PriceSeries>;
