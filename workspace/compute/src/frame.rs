//! Column conventions and conversions between typed series and the
//! DataFrames the model consumes and produces.

use chrono::NaiveDate;
use common::PriceSeries;
use polars::prelude::*;

use crate::error::{ComputeError, Result};

/// Training/prediction timestamp column.
pub const DS: &str = "ds";
/// Training value column (close price).
pub const Y: &str = "y";
/// Point prediction column.
pub const YHAT: &str = "yhat";
/// Lower uncertainty bound column.
pub const YHAT_LOWER: &str = "yhat_lower";
/// Upper uncertainty bound column.
pub const YHAT_UPPER: &str = "yhat_upper";
/// Fitted trend component column.
pub const TREND: &str = "trend";
/// Fitted weekly component column.
pub const WEEKLY: &str = "weekly";
/// Fitted yearly component column.
pub const YEARLY: &str = "yearly";

/// Projects a price series into the model's two-column training frame:
/// `ds` (YYYY-MM-DD) and `y` (close price).
pub fn training_frame(series: &PriceSeries) -> Result<DataFrame> {
    let ds: Vec<String> = series
        .points()
        .iter()
        .map(|p| p.date.format("%Y-%m-%d").to_string())
        .collect();
    let y: Vec<f64> = series.points().iter().map(|p| p.close).collect();

    let df = DataFrame::new(vec![
        Series::new(DS.into(), ds).into(),
        Series::new(Y.into(), y).into(),
    ])?;

    Ok(df)
}

/// Reads a `ds`-style column back into dates.
pub fn dates_column(df: &DataFrame, name: &str) -> Result<Vec<NaiveDate>> {
    let col = df.column(name)?;
    let mut out = Vec::with_capacity(df.height());

    for i in 0..df.height() {
        let text = match col.get(i)? {
            AnyValue::String(s) => s.to_string(),
            AnyValue::StringOwned(s) => s.to_string(),
            other => {
                return Err(ComputeError::Series(format!(
                    "expected a date string in '{name}', got {other:?}"
                )));
            }
        };
        let date = NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .map_err(|e| ComputeError::Date(format!("invalid date '{text}': {e}")))?;
        out.push(date);
    }

    Ok(out)
}

/// Reads a float column back into a vector.
pub fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let col = df.column(name)?;
    let mut out = Vec::with_capacity(df.height());

    for i in 0..df.height() {
        let value = col.get(i)?.try_extract::<f64>().map_err(|e| {
            ComputeError::Series(format!("expected a float in '{name}': {e}"))
        })?;
        out.push(value);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{PricePoint, Ticker};

    fn sample_series() -> PriceSeries {
        let points = (1..=3)
            .map(|day| PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                open: 10.0,
                high: 11.0,
                low: 9.0,
                close: 10.0 + day as f64,
                volume: 100,
            })
            .collect();
        PriceSeries::new(Ticker::parse("AAPL").unwrap(), points)
    }

    #[test]
    fn test_training_frame_shape() {
        let df = training_frame(&sample_series()).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(df.get_column_names().len(), 2);
        assert!(df.column(DS).is_ok());
        assert!(df.column(Y).is_ok());
    }

    #[test]
    fn test_columns_round_trip() {
        let df = training_frame(&sample_series()).unwrap();

        let dates = dates_column(&df, DS).unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(dates[2], NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());

        let closes = float_column(&df, Y).unwrap();
        assert_eq!(closes, vec![11.0, 12.0, 13.0]);
    }

    #[test]
    fn test_missing_column_is_error() {
        let df = training_frame(&sample_series()).unwrap();
        assert!(float_column(&df, "nope").is_err());
    }
}
