//! Plotly figure builders. The figures are serialized into the page as
//! inline divs; plotly.js itself is loaded from the CDN by the page shell.

use common::{Forecast, PriceSeries};
use plotly::common::{Fill, Line, Marker, Mode, Title};
use plotly::layout::{Axis, GridPattern, Layout, LayoutGrid, RangeSlider};
use plotly::{Plot, Scatter};

fn series_dates(series: &PriceSeries) -> Vec<String> {
    series
        .points()
        .iter()
        .map(|p| p.date.to_string())
        .collect()
}

fn forecast_dates(forecast: &Forecast) -> Vec<String> {
    forecast.points().iter().map(|p| p.ds.to_string()).collect()
}

/// Open and close price over time, with a range slider on the time axis.
pub fn raw_chart(series: &PriceSeries) -> Plot {
    let dates = series_dates(series);
    let open: Vec<f64> = series.points().iter().map(|p| p.open).collect();
    let close: Vec<f64> = series.points().iter().map(|p| p.close).collect();

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(dates.clone(), open)
            .mode(Mode::Lines)
            .name("Open Price"),
    );
    plot.add_trace(
        Scatter::new(dates, close)
            .mode(Mode::Lines)
            .name("Close Price"),
    );
    plot.set_layout(
        Layout::new()
            .title(Title::with_text(format!(
                "{} Stock Price Over Time",
                series.ticker
            )))
            .x_axis(
                Axis::new()
                    .title(Title::with_text("Date"))
                    .range_slider(RangeSlider::new().visible(true)),
            )
            .y_axis(Axis::new().title(Title::with_text("Price")))
            .height(450),
    );
    plot
}

/// Historical closes overlaid with the prediction line and its shaded
/// uncertainty band.
pub fn forecast_chart(series: &PriceSeries, forecast: &Forecast) -> Plot {
    let ds = forecast_dates(forecast);
    let yhat: Vec<f64> = forecast.points().iter().map(|p| p.yhat).collect();
    let lower: Vec<f64> = forecast.points().iter().map(|p| p.yhat_lower).collect();
    let upper: Vec<f64> = forecast.points().iter().map(|p| p.yhat_upper).collect();

    let mut plot = Plot::new();
    // The band: upper first, then lower filled to it.
    plot.add_trace(
        Scatter::new(ds.clone(), upper)
            .mode(Mode::Lines)
            .line(Line::new().width(0.0))
            .show_legend(false)
            .name("Upper Bound"),
    );
    plot.add_trace(
        Scatter::new(ds.clone(), lower)
            .mode(Mode::Lines)
            .line(Line::new().width(0.0))
            .fill(Fill::ToNextY)
            .fill_color("rgba(59, 130, 246, 0.2)")
            .name("Uncertainty"),
    );
    plot.add_trace(
        Scatter::new(ds, yhat)
            .mode(Mode::Lines)
            .line(Line::new().color("rgb(59, 130, 246)").width(2.0))
            .name("Forecast"),
    );
    plot.add_trace(
        Scatter::new(
            series_dates(series),
            series.points().iter().map(|p| p.close).collect::<Vec<f64>>(),
        )
        .mode(Mode::Markers)
        .marker(Marker::new().size(3))
        .name("Historical Close"),
    );
    plot.set_layout(
        Layout::new()
            .title(Title::with_text(format!(
                "{} Stock Price Forecast",
                series.ticker
            )))
            .x_axis(Axis::new().title(Title::with_text("Date")))
            .y_axis(Axis::new().title(Title::with_text("Price")))
            .height(450),
    );
    plot
}

/// The fitted decomposition: trend, weekly and yearly components stacked
/// in independent panels.
pub fn components_chart(forecast: &Forecast) -> Plot {
    let ds = forecast_dates(forecast);
    let trend: Vec<f64> = forecast.points().iter().map(|p| p.trend).collect();
    let weekly: Vec<f64> = forecast.points().iter().map(|p| p.weekly).collect();
    let yearly: Vec<f64> = forecast.points().iter().map(|p| p.yearly).collect();

    let mut plot = Plot::new();
    plot.add_trace(Scatter::new(ds.clone(), trend).mode(Mode::Lines).name("Trend"));
    plot.add_trace(
        Scatter::new(ds.clone(), weekly)
            .mode(Mode::Lines)
            .name("Weekly")
            .x_axis("x2")
            .y_axis("y2"),
    );
    plot.add_trace(
        Scatter::new(ds, yearly)
            .mode(Mode::Lines)
            .name("Yearly")
            .x_axis("x3")
            .y_axis("y3"),
    );
    plot.set_layout(
        Layout::new()
            .title(Title::with_text("Forecast Components"))
            .grid(
                LayoutGrid::new()
                    .rows(3)
                    .columns(1)
                    .pattern(GridPattern::Independent),
            )
            .height(720),
    );
    plot
}
