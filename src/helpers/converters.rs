use common::{Forecast, ForecastPoint};
use compute::frame::{dates_column, float_column};
use compute::{DS, TREND, WEEKLY, YEARLY, YHAT, YHAT_LOWER, YHAT_UPPER};
use polars::prelude::DataFrame;

/// Helper function to convert a prediction DataFrame to a typed Forecast
pub fn forecast_from_frame(df: &DataFrame) -> compute::Result<Forecast> {
    let ds = dates_column(df, DS)?;
    let yhat = float_column(df, YHAT)?;
    let lower = float_column(df, YHAT_LOWER)?;
    let upper = float_column(df, YHAT_UPPER)?;
    let trend = float_column(df, TREND)?;
    let weekly = float_column(df, WEEKLY)?;
    let yearly = float_column(df, YEARLY)?;

    let points = (0..df.height())
        .map(|i| ForecastPoint {
            ds: ds[i],
            yhat: yhat[i],
            yhat_lower: lower[i],
            yhat_upper: upper[i],
            trend: trend[i],
            weekly: weekly[i],
            yearly: yearly[i],
        })
        .collect();

    Ok(Forecast::new(points))
}
