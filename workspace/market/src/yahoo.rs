//! Yahoo Finance chart-API client.
//!
//! One GET per fetch: `{base}/{symbol}?period1=&period2=&interval=1d`,
//! answered with columnar OHLCV arrays indexed by a timestamp array.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use common::{DateRange, PricePoint, PriceSeries, Ticker};
use serde::Deserialize;
use tracing::debug;

use crate::error::{MarketError, Result};
use crate::QuoteSource;

/// Public chart endpoint. Overridable for tests and mirrors.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartOutcome,
}

#[derive(Debug, Deserialize)]
struct ChartOutcome {
    result: Option<Vec<ChartSlice>>,
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartSlice {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct QuoteColumns {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

/// HTTP client for the chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooClient {
    http: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    /// Builds a client against `base_url`.
    ///
    /// No per-request timeout is set here; the serving layer bounds the
    /// whole interaction instead.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| MarketError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn chart_url(&self, ticker: &Ticker, range: DateRange) -> String {
        // period2 is exclusive, so advance one day to include the end date.
        let period2 = range.end.succ_opt().unwrap_or(range.end);
        format!(
            "{}/{}?period1={}&period2={}&interval=1d",
            self.base_url,
            ticker,
            unix_seconds(range.start),
            unix_seconds(period2),
        )
    }
}

fn unix_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Decodes a chart response body into a chronological series.
///
/// Rows with any missing OHLCV field are skipped. A response that decodes
/// but yields no rows maps to [`MarketError::NoData`].
fn parse_chart(ticker: &Ticker, body: &str) -> Result<PriceSeries> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| MarketError::Parse(e.to_string()))?;

    if let Some(err) = envelope.chart.error {
        return Err(MarketError::Api {
            code: err.code,
            description: err.description,
        });
    }

    let slice = envelope
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| MarketError::NoData(ticker.to_string()))?;
    let columns = slice
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| MarketError::NoData(ticker.to_string()))?;

    let mut points = Vec::with_capacity(slice.timestamp.len());
    for (i, ts) in slice.timestamp.iter().enumerate() {
        let open = columns.open.get(i).copied().flatten();
        let high = columns.high.get(i).copied().flatten();
        let low = columns.low.get(i).copied().flatten();
        let close = columns.close.get(i).copied().flatten();
        let volume = columns.volume.get(i).copied().flatten();

        if let (Some(open), Some(high), Some(low), Some(close), Some(volume)) =
            (open, high, low, close, volume)
        {
            if let Some(moment) = DateTime::from_timestamp(*ts, 0) {
                points.push(PricePoint {
                    date: moment.date_naive(),
                    open,
                    high,
                    low,
                    close,
                    volume,
                });
            }
        }
    }

    if points.is_empty() {
        return Err(MarketError::NoData(ticker.to_string()));
    }

    Ok(PriceSeries::new(ticker.clone(), points))
}

#[async_trait]
impl QuoteSource for YahooClient {
    async fn history(&self, ticker: &Ticker, range: DateRange) -> Result<PriceSeries> {
        let url = self.chart_url(ticker, range);
        debug!(%ticker, %url, "fetching daily history");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| MarketError::Request(e.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|e| MarketError::Request(e.to_string()))?;

        let series = parse_chart(ticker, &body)?;
        debug!(%ticker, rows = series.len(), "history fetched");
        Ok(series)
    }
}
