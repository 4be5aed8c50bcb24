//! Server-rendered HTML for the dashboard page. The handlers compute a
//! [`PipelineOutcome`]; this module only turns it into markup.

use common::{format_usd, Forecast, ForecastSummary, PriceSeries};

use crate::helpers::charts;
use crate::pipeline::PipelineOutcome;
use crate::schemas::DashboardQuery;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

/// Renders the whole page for one interaction.
pub fn render(query: &DashboardQuery, outcome: &PipelineOutcome) -> String {
    let ticker_value = query.ticker.as_deref().unwrap_or("");
    let years = query.years.unwrap_or(1).clamp(1, 4);

    let main = match outcome {
        PipelineOutcome::AwaitingInput => {
            error_block("Please enter a stock ticker (e.g. \"RELIANCE.NS\", \"AAPL\").")
        }
        PipelineOutcome::InvalidRequest(messages) => messages
            .iter()
            .map(|m| error_block(m))
            .collect::<Vec<_>>()
            .join("\n"),
        PipelineOutcome::NoData { ticker } => error_block(&format!(
            "No data found for {}. Please choose a different stock.",
            escape_html(ticker.as_str())
        )),
        PipelineOutcome::FetchFailed { ticker, message } => error_block(&format!(
            "Error loading data for ticker {}: {}",
            escape_html(ticker.as_str()),
            escape_html(message)
        )),
        PipelineOutcome::InsufficientData { .. } => warning_block(
            "Not enough data to perform forecasting. Please try again with a different stock or date range.",
        ),
        PipelineOutcome::ForecastFailed { message, .. } => {
            warning_block(&format!("Forecasting failed: {}", escape_html(message)))
        }
        PipelineOutcome::Ready {
            series,
            forecast,
            summary,
        } => ready_sections(series, forecast, summary.as_ref(), years),
    };

    page_shell(ticker_value, years, &main)
}

fn ready_sections(
    series: &PriceSeries,
    forecast: &Forecast,
    summary: Option<&ForecastSummary>,
    years: u8,
) -> String {
    let ticker = escape_html(series.ticker.as_str());
    let mut sections = Vec::new();

    if let Some(latest) = series.latest() {
        sections.push(format!(
            "<h2>{ticker} - Latest Data</h2>\n\
             <p><strong>Latest Closing Price:</strong> {}</p>\n\
             <p><strong>Volume:</strong> {}</p>",
            format_usd(latest.close),
            latest.volume
        ));
    }

    sections.push(charts::raw_chart(series).to_inline_html(Some("raw-chart")));

    sections.push(format!(
        "<h2>Forecasted Data for {years} Year(s)</h2>\n{}",
        forecast_table(forecast)
    ));

    let overview = match summary {
        Some(summary) => format!(
            "<p><strong>Expected Average Price:</strong> {}</p>\n\
             <p><strong>Predicted High:</strong> {}</p>\n\
             <p><strong>Predicted Low:</strong> {}</p>",
            format_usd(summary.expected_mean),
            format_usd(summary.predicted_high),
            format_usd(summary.predicted_low)
        ),
        None => warning_block("All predicted dates fall on or before today."),
    };
    sections.push(format!("<h2>Future Predictions Overview</h2>\n{overview}"));

    sections.push(format!(
        "<p>{ticker} Stock Price Forecast for {years} Year(s)</p>\n{}",
        charts::forecast_chart(series, forecast).to_inline_html(Some("forecast-chart"))
    ));

    sections.push(format!(
        "<p>Forecast Components</p>\n{}",
        charts::components_chart(forecast).to_inline_html(Some("components-chart"))
    ));

    sections.join("\n")
}

/// The last five rows of the prediction table.
fn forecast_table(forecast: &Forecast) -> String {
    let mut rows = String::new();
    for point in forecast.tail(5) {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>\n",
            point.ds, point.yhat, point.yhat_lower, point.yhat_upper, point.trend
        ));
    }

    format!(
        "<table>\n<thead><tr><th>Date</th><th>Predicted</th><th>Lower Bound</th>\
         <th>Upper Bound</th><th>Trend</th></tr></thead>\n<tbody>\n{rows}</tbody>\n</table>"
    )
}

fn error_block(message: &str) -> String {
    format!("<div class=\"alert alert-error\">{message}</div>")
}

fn warning_block(message: &str) -> String {
    format!("<div class=\"alert alert-warning\">{message}</div>")
}

fn page_shell(ticker_value: &str, years: u8, main: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Stockcast</title>
<script src="{PLOTLY_CDN}"></script>
<style>
body {{ font-family: sans-serif; margin: 0; display: flex; }}
aside {{ width: 280px; min-height: 100vh; padding: 1.5rem; background: #f3f4f6; }}
main {{ flex: 1; padding: 1.5rem 2rem; max-width: 980px; }}
input[type=text] {{ width: 100%; padding: 0.4rem; margin: 0.4rem 0 1rem; }}
input[type=range] {{ width: 100%; }}
button {{ margin-top: 1rem; padding: 0.5rem 1rem; }}
table {{ border-collapse: collapse; }}
td, th {{ border: 1px solid #d1d5db; padding: 0.3rem 0.7rem; text-align: right; }}
.alert {{ padding: 0.8rem 1rem; border-radius: 4px; margin: 1rem 0; }}
.alert-error {{ background: #fee2e2; color: #991b1b; }}
.alert-warning {{ background: #fef3c7; color: #92400e; }}
</style>
</head>
<body>
<aside>
<h2>User Input Parameters</h2>
<form method="get" action="/">
<label for="ticker">Enter stock ticker (e.g. "RELIANCE.NS", "AAPL")</label>
<input type="text" id="ticker" name="ticker" value="{ticker}">
<label for="years">Prediction years: <span id="years-value">{years}</span></label>
<input type="range" id="years" name="years" min="1" max="4" value="{years}"
 oninput="document.getElementById('years-value').textContent = this.value">
<button type="submit">Run Forecast</button>
</form>
</aside>
<main>
<h1>Stock Prediction</h1>
<p>This app predicts future stock prices based on historical data. Select a
stock ticker (e.g. "RELIANCE.NS", "AAPL") and specify the forecast period.</p>
{main}
</main>
</body>
</html>
"#,
        ticker = escape_html(ticker_value),
    )
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Ticker;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>&"x"</b>"#),
            "&lt;b&gt;&amp;&quot;x&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_awaiting_input_renders_prompt_and_form() {
        let html = render(&DashboardQuery::default(), &PipelineOutcome::AwaitingInput);

        assert!(html.contains("Please enter a stock ticker"));
        assert!(html.contains("name=\"ticker\""));
        assert!(html.contains("min=\"1\" max=\"4\""));
    }

    #[test]
    fn test_no_data_message_escapes_ticker() {
        let query = DashboardQuery {
            ticker: Some("<script>".to_string()),
            years: Some(2),
        };
        let outcome = PipelineOutcome::NoData {
            ticker: Ticker::parse("<script>").unwrap(),
        };
        let html = render(&query, &outcome);

        assert!(html.contains("No data found for &lt;script&gt;"));
        assert!(!html.contains("No data found for <script>"));
    }
}
