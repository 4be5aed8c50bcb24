//! Market-data acquisition: a `QuoteSource` trait, a Yahoo Finance chart
//! client implementing it, and a memoizing wrapper that caches fetch
//! outcomes per ticker.

pub mod cache;
pub mod error;
pub mod yahoo;

pub use cache::CachedQuoteSource;
pub use error::{FetchResult, MarketError, Result};
pub use yahoo::YahooClient;

use async_trait::async_trait;
use common::{DateRange, PriceSeries, Ticker};

/// A provider of daily OHLCV history.
///
/// The web handlers and the CLI only ever see this trait; the concrete
/// client and the caching wrapper both implement it, so tests can inject a
/// canned source.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetches the daily history for `ticker` over `range`.
    ///
    /// An empty result set is reported as [`MarketError::NoData`], distinct
    /// from transport or provider failures.
    async fn history(&self, ticker: &Ticker, range: DateRange) -> Result<PriceSeries>;
}
