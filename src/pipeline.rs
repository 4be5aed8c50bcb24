use chrono::NaiveDate;
use common::{DateRange, Forecast, ForecastSummary, Horizon, PriceSeries, Ticker};
use market::{MarketError, QuoteSource};
use tracing::{info, warn};

use crate::helpers::converters::forecast_from_frame;

/// Where one interaction ended.
///
/// The whole request is a short linear pipeline gated on two checks —
/// "ticker non-empty" and "row count > 1" — and every terminal state is a
/// variant here, so the halting behavior is testable without the UI.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// Nothing submitted yet; only the input form renders.
    AwaitingInput,
    /// The submission failed validation; no fetch happened.
    InvalidRequest(Vec<String>),
    /// The fetch succeeded but carried zero rows.
    NoData { ticker: Ticker },
    /// Transport, parse or provider failure at the fetch boundary.
    FetchFailed { ticker: Ticker, message: String },
    /// A single row came back: too little to fit a trend, so the model is
    /// never invoked.
    InsufficientData { series: PriceSeries },
    /// The model ran but its output could not be produced.
    ForecastFailed { series: PriceSeries, message: String },
    /// History, forecast and summary are all available.
    Ready {
        series: PriceSeries,
        forecast: Forecast,
        summary: Option<ForecastSummary>,
    },
}

/// Runs fetch → project → fit → extrapolate for one validated request.
///
/// Pure with respect to the UI: everything it needs arrives as a value and
/// everything it produces is returned. Errors never propagate out; they
/// are folded into the outcome.
pub async fn run(
    source: &dyn QuoteSource,
    ticker: &Ticker,
    horizon: Horizon,
    range: DateRange,
    today: NaiveDate,
) -> PipelineOutcome {
    let series = match source.history(ticker, range).await {
        Ok(series) => series,
        Err(MarketError::NoData(_)) => {
            warn!(%ticker, "provider returned no rows");
            return PipelineOutcome::NoData {
                ticker: ticker.clone(),
            };
        }
        Err(err) => {
            warn!(%ticker, error = %err, "fetch failed");
            return PipelineOutcome::FetchFailed {
                ticker: ticker.clone(),
                message: err.to_string(),
            };
        }
    };

    if series.len() < 2 {
        warn!(%ticker, rows = series.len(), "not enough history to forecast");
        return PipelineOutcome::InsufficientData { series };
    }

    let forecast = match forecast_series(&series, horizon) {
        Ok(forecast) => forecast,
        Err(compute::ComputeError::InsufficientData { .. }) => {
            return PipelineOutcome::InsufficientData { series };
        }
        Err(err) => {
            warn!(%ticker, error = %err, "forecast failed");
            return PipelineOutcome::ForecastFailed {
                message: err.to_string(),
                series,
            };
        }
    };

    let summary = forecast.summary(today);
    info!(
        %ticker,
        history_rows = series.len(),
        forecast_rows = forecast.len(),
        years = horizon.get(),
        "forecast produced"
    );

    PipelineOutcome::Ready {
        series,
        forecast,
        summary,
    }
}

/// Projects the close series, fits the default model and extrapolates
/// `horizon` beyond the end of history.
fn forecast_series(series: &PriceSeries, horizon: Horizon) -> compute::Result<Forecast> {
    let train = compute::training_frame(series)?;
    let fitted = compute::default_model().fit(&train)?;
    let prediction = fitted.predict(&fitted.future_dates(horizon.days()))?;
    forecast_from_frame(&prediction)
}
