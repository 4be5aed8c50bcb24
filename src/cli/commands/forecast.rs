use anyhow::{anyhow, Result};
use chrono::Utc;
use common::{format_usd, Horizon, Ticker};
use market::YahooClient;
use tracing::info;

use crate::config::AppConfig;
use crate::pipeline::{self, PipelineOutcome};

/// One-shot forecast: fetch, fit, print the tail and the summary.
pub async fn forecast(raw_ticker: &str, years: u8) -> Result<()> {
    let ticker =
        Ticker::parse(raw_ticker).ok_or_else(|| anyhow!("ticker must not be empty"))?;
    let horizon = Horizon::years(years).ok_or_else(|| {
        anyhow!(
            "years must be between {} and {}",
            Horizon::MIN_YEARS,
            Horizon::MAX_YEARS
        )
    })?;

    let config = AppConfig::from_env()?;
    let client = YahooClient::new(&config.provider_url)?;
    let today = Utc::now().date_naive();

    info!(%ticker, years, "running one-shot forecast");
    let outcome =
        pipeline::run(&client, &ticker, horizon, config.fetch_range(today), today).await;

    match outcome {
        PipelineOutcome::Ready {
            series,
            forecast,
            summary,
        } => {
            println!("=== {ticker} ===");
            if let Some(latest) = series.latest() {
                println!(
                    "Latest close: {} on {} (volume {})",
                    format_usd(latest.close),
                    latest.date,
                    latest.volume
                );
            }
            println!(
                "History: {} rows, forecast: {} rows\n",
                series.len(),
                forecast.len()
            );

            println!(
                "{:<12} {:>12} {:>12} {:>12}",
                "Date", "Predicted", "Lower", "Upper"
            );
            for point in forecast.tail(5) {
                println!(
                    "{:<12} {:>12.2} {:>12.2} {:>12.2}",
                    point.ds.to_string(),
                    point.yhat,
                    point.yhat_lower,
                    point.yhat_upper
                );
            }

            if let Some(summary) = summary {
                println!();
                println!(
                    "Expected average price: {}",
                    format_usd(summary.expected_mean)
                );
                println!("Predicted high: {}", format_usd(summary.predicted_high));
                println!("Predicted low: {}", format_usd(summary.predicted_low));
            }
            Ok(())
        }
        PipelineOutcome::NoData { ticker } => Err(anyhow!("no data found for {ticker}")),
        PipelineOutcome::FetchFailed { ticker, message } => {
            Err(anyhow!("error loading data for {ticker}: {message}"))
        }
        PipelineOutcome::InsufficientData { series } => Err(anyhow!(
            "not enough data to forecast: {} row(s)",
            series.len()
        )),
        PipelineOutcome::ForecastFailed { message, .. } => {
            Err(anyhow!("forecasting failed: {message}"))
        }
        PipelineOutcome::AwaitingInput | PipelineOutcome::InvalidRequest(_) => {
            Err(anyhow!("invalid request"))
        }
    }
}
