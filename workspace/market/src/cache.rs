use async_trait::async_trait;
use cached::{Cached, TimedSizedCache};
use common::{DateRange, PriceSeries, Ticker};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

use crate::error::{FetchResult, Result};
use crate::QuoteSource;

/// A memoizing wrapper for QuoteSource implementations.
///
/// Wraps any source and caches complete fetch outcomes keyed by ticker so
/// that repeated requests for the same symbol within the entry lifetime
/// perform no network round-trip. Failures are memoized the same way as
/// successes: the second caller replays the identical outcome.
///
/// Features:
/// - Caches history results with TTL
/// - Cache clearing functionality
/// - Thread-safe implementation using Arc<Mutex<>>
pub struct CachedQuoteSource<
    S: QuoteSource,
    C: Cached<String, FetchResult> = TimedSizedCache<String, FetchResult>,
> {
    /// The wrapped source
    inner: S,
    /// Cache for history results
    fetch_cache: Arc<Mutex<C>>,
}

impl<S: QuoteSource, C: Cached<String, FetchResult>> CachedQuoteSource<S, C> {
    /// Creates a memoizing source wrapping `inner` with a custom cache store.
    pub fn new_with_store(inner: S, cache_store: C) -> Self {
        Self {
            inner,
            fetch_cache: Arc::new(Mutex::new(cache_store)),
        }
    }

    /// Removes all cached entries, forcing fresh fetches on the next calls.
    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.fetch_cache.lock() {
            cache.cache_clear();
        }
    }

    /// Returns the current number of cached outcomes.
    pub fn cache_size(&self) -> usize {
        if let Ok(cache) = self.fetch_cache.lock() {
            cache.cache_size()
        } else {
            0
        }
    }
}

impl<S: QuoteSource> CachedQuoteSource<S, TimedSizedCache<String, FetchResult>> {
    /// Creates a memoizing source with the given capacity and entry TTL.
    ///
    /// # Arguments
    /// * `inner` - The source to wrap with memoization
    /// * `capacity` - Maximum number of tickers to retain
    /// * `ttl` - Time to live for cached outcomes
    pub fn new(inner: S, capacity: usize, ttl: Duration) -> Self {
        Self::new_with_store(
            inner,
            TimedSizedCache::with_size_and_lifespan(capacity, ttl.as_secs()),
        )
    }

    /// Creates a memoizing source with default settings.
    ///
    /// Default settings:
    /// - Capacity: 100 tickers
    /// - TTL: 5 minutes
    pub fn with_defaults(inner: S) -> Self {
        Self::new(inner, 100, Duration::from_secs(300))
    }
}

#[async_trait]
impl<S, C> QuoteSource for CachedQuoteSource<S, C>
where
    S: QuoteSource + Send + Sync,
    C: Cached<String, FetchResult> + Send + Sync,
{
    async fn history(&self, ticker: &Ticker, range: DateRange) -> Result<PriceSeries> {
        // Keyed by ticker alone: the fetch window is fixed per process.
        let key = ticker.as_str().to_string();

        if let Ok(mut cache) = self.fetch_cache.lock() {
            if let Some(outcome) = cache.cache_get(&key) {
                debug!(%ticker, "history served from cache");
                return outcome.clone();
            }
        }

        let outcome = self.inner.history(ticker, range).await;

        if let Ok(mut cache) = self.fetch_cache.lock() {
            cache.cache_set(key, outcome.clone());
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarketError;
    use common::PricePoint;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A source that counts round-trips and answers from a canned script.
    struct CountingSource {
        calls: AtomicUsize,
        outcome: fn(&Ticker) -> FetchResult,
    }

    impl CountingSource {
        fn new(outcome: fn(&Ticker) -> FetchResult) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                outcome,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuoteSource for CountingSource {
        async fn history(&self, ticker: &Ticker, _range: DateRange) -> Result<PriceSeries> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)(ticker)
        }
    }

    fn two_rows(ticker: &Ticker) -> FetchResult {
        let points = (1..=2)
            .map(|day| PricePoint {
                date: chrono::NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                open: 10.0,
                high: 11.0,
                low: 9.0,
                close: 10.5,
                volume: 100,
            })
            .collect();
        Ok(PriceSeries::new(ticker.clone(), points))
    }

    fn always_fails(ticker: &Ticker) -> FetchResult {
        Err(MarketError::Request(format!("boom for {ticker}")))
    }

    fn range() -> DateRange {
        DateRange::new(
            chrono::NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let source = CachedQuoteSource::with_defaults(CountingSource::new(two_rows));
        let ticker = Ticker::parse("AAPL").unwrap();

        let first = source.history(&ticker, range()).await.unwrap();
        let second = source.history(&ticker, range()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.inner.calls(), 1);
        assert_eq!(source.cache_size(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_memoized() {
        let source = CachedQuoteSource::with_defaults(CountingSource::new(always_fails));
        let ticker = Ticker::parse("ZZZZINVALID").unwrap();

        let first = source.history(&ticker, range()).await.unwrap_err();
        let second = source.history(&ticker, range()).await.unwrap_err();

        assert_eq!(first, second);
        assert_eq!(source.inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_distinct_tickers_fetch_separately() {
        let source = CachedQuoteSource::with_defaults(CountingSource::new(two_rows));

        source
            .history(&Ticker::parse("AAPL").unwrap(), range())
            .await
            .unwrap();
        source
            .history(&Ticker::parse("MSFT").unwrap(), range())
            .await
            .unwrap();

        assert_eq!(source.inner.calls(), 2);
        assert_eq!(source.cache_size(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let source = CachedQuoteSource::with_defaults(CountingSource::new(two_rows));
        let ticker = Ticker::parse("AAPL").unwrap();

        source.history(&ticker, range()).await.unwrap();
        source.clear_cache();
        assert_eq!(source.cache_size(), 0);

        source.history(&ticker, range()).await.unwrap();
        assert_eq!(source.inner.calls(), 2);
    }

    #[tokio::test]
    async fn test_ttl_expiry_refetches() {
        let source = CachedQuoteSource::new(
            CountingSource::new(two_rows),
            10,
            Duration::from_secs(1),
        );
        let ticker = Ticker::parse("AAPL").unwrap();

        source.history(&ticker, range()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1_100)).await;
        source.history(&ticker, range()).await.unwrap();

        assert_eq!(source.inner.calls(), 2);
    }
}
