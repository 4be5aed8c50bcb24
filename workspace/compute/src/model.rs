//! Additive trend+seasonality decomposition.
//!
//! The model fits an ordinary-least-squares linear trend over day offsets,
//! a weekly additive component (mean detrended residual per weekday), a
//! yearly additive component (mean per calendar month after weekly
//! removal), and a residual sigma that widens the prediction into a 95%
//! interval. Everything is deterministic: a date's prediction depends only
//! on the training data, never on the horizon it was requested for.

use chrono::{Datelike, Duration, NaiveDate};
use polars::prelude::*;
use tracing::debug;

use crate::error::{ComputeError, Result};
use crate::frame::{
    self, DS, TREND, WEEKLY, Y, YEARLY, YHAT, YHAT_LOWER, YHAT_UPPER,
};

/// Two-sided 95% interval.
const DEFAULT_INTERVAL_Z: f64 = 1.959964;

/// The untrained model. Hyperparameters are fixed; no tuning surface is
/// exposed upstream.
#[derive(Debug, Clone)]
pub struct SeasonalTrendModel {
    interval_z: f64,
}

impl Default for SeasonalTrendModel {
    fn default() -> Self {
        Self {
            interval_z: DEFAULT_INTERVAL_Z,
        }
    }
}

impl SeasonalTrendModel {
    /// Fits the model to a training frame with `ds`/`y` columns.
    ///
    /// Returns [`ComputeError::InsufficientData`] for fewer than 2 rows;
    /// fitting a trend requires at least two points.
    pub fn fit(&self, df: &DataFrame) -> Result<FittedModel> {
        let dates = frame::dates_column(df, DS)?;
        let values = frame::float_column(df, Y)?;

        if dates.len() < 2 {
            return Err(ComputeError::InsufficientData { rows: dates.len() });
        }

        let origin = dates[0];
        let xs: Vec<f64> = dates
            .iter()
            .map(|d| (*d - origin).num_days() as f64)
            .collect();

        let (slope, intercept) = fit_trend(&xs, &values)?;

        // Weekly component: mean detrended residual per weekday.
        let mut week_sum = [0.0_f64; 7];
        let mut week_count = [0_usize; 7];
        for ((date, x), y) in dates.iter().zip(&xs).zip(&values) {
            let residual = y - (slope * x + intercept);
            let idx = date.weekday().num_days_from_monday() as usize;
            week_sum[idx] += residual;
            week_count[idx] += 1;
        }
        let mut weekly = [0.0_f64; 7];
        for idx in 0..7 {
            if week_count[idx] > 0 {
                weekly[idx] = week_sum[idx] / week_count[idx] as f64;
            }
        }

        // Yearly component: mean per calendar month of what the trend and
        // the weekly component leave over.
        let mut month_sum = [0.0_f64; 12];
        let mut month_count = [0_usize; 12];
        for ((date, x), y) in dates.iter().zip(&xs).zip(&values) {
            let widx = date.weekday().num_days_from_monday() as usize;
            let leftover = y - (slope * x + intercept) - weekly[widx];
            let midx = date.month0() as usize;
            month_sum[midx] += leftover;
            month_count[midx] += 1;
        }
        let mut yearly = [0.0_f64; 12];
        for idx in 0..12 {
            if month_count[idx] > 0 {
                yearly[idx] = month_sum[idx] / month_count[idx] as f64;
            }
        }

        // Residual sigma over what no component explains.
        let mut squared = 0.0_f64;
        for ((date, x), y) in dates.iter().zip(&xs).zip(&values) {
            let widx = date.weekday().num_days_from_monday() as usize;
            let midx = date.month0() as usize;
            let fitted = slope * x + intercept + weekly[widx] + yearly[midx];
            squared += (y - fitted).powi(2);
        }
        let sigma = (squared / (dates.len() - 1) as f64).sqrt();

        debug!(
            rows = dates.len(),
            slope, intercept, sigma, "model fitted"
        );

        Ok(FittedModel {
            interval_z: self.interval_z,
            origin,
            slope,
            intercept,
            weekly,
            yearly,
            sigma,
            history: dates,
        })
    }
}

/// Ordinary least squares over (x, y) pairs.
fn fit_trend(xs: &[f64], ys: &[f64]) -> Result<(f64, f64)> {
    let n = xs.len() as f64;
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = ys.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        numerator += (x - x_mean) * (y - y_mean);
        denominator += (x - x_mean) * (x - x_mean);
    }

    if denominator.abs() < 1e-10 {
        return Err(ComputeError::Fit(
            "time axis is degenerate, all observations share one date".to_string(),
        ));
    }

    let slope = numerator / denominator;
    Ok((slope, y_mean - slope * x_mean))
}

/// The trained model: components plus the training dates it was fitted on.
#[derive(Debug, Clone)]
pub struct FittedModel {
    interval_z: f64,
    origin: NaiveDate,
    slope: f64,
    intercept: f64,
    weekly: [f64; 7],
    yearly: [f64; 12],
    sigma: f64,
    history: Vec<NaiveDate>,
}

impl FittedModel {
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn weekly(&self) -> &[f64; 7] {
        &self.weekly
    }

    /// The training dates followed by `horizon_days` successive calendar
    /// days beyond the last one.
    pub fn future_dates(&self, horizon_days: i64) -> Vec<NaiveDate> {
        let mut dates = self.history.clone();
        if let Some(&last) = self.history.last() {
            dates.extend((1..=horizon_days).map(|offset| last + Duration::days(offset)));
        }
        dates
    }

    /// Evaluates the model on `dates`, producing the prediction frame with
    /// `ds`, `yhat`, bounds and per-component columns.
    pub fn predict(&self, dates: &[NaiveDate]) -> Result<DataFrame> {
        let mut ds = Vec::with_capacity(dates.len());
        let mut yhat = Vec::with_capacity(dates.len());
        let mut lower = Vec::with_capacity(dates.len());
        let mut upper = Vec::with_capacity(dates.len());
        let mut trend = Vec::with_capacity(dates.len());
        let mut weekly = Vec::with_capacity(dates.len());
        let mut yearly = Vec::with_capacity(dates.len());

        let spread = self.interval_z * self.sigma;
        for date in dates {
            let x = (*date - self.origin).num_days() as f64;
            let t = self.slope * x + self.intercept;
            let w = self.weekly[date.weekday().num_days_from_monday() as usize];
            let y = self.yearly[date.month0() as usize];
            let point = t + w + y;

            ds.push(date.format("%Y-%m-%d").to_string());
            trend.push(t);
            weekly.push(w);
            yearly.push(y);
            yhat.push(point);
            lower.push(point - spread);
            upper.push(point + spread);
        }

        let df = DataFrame::new(vec![
            Series::new(DS.into(), ds).into(),
            Series::new(YHAT.into(), yhat).into(),
            Series::new(YHAT_LOWER.into(), lower).into(),
            Series::new(YHAT_UPPER.into(), upper).into(),
            Series::new(TREND.into(), trend).into(),
            Series::new(WEEKLY.into(), weekly).into(),
            Series::new(YEARLY.into(), yearly).into(),
        ])?;

        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::training_frame;
    use common::{PricePoint, PriceSeries, Ticker};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series_from_closes(start: NaiveDate, closes: &[f64]) -> PriceSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, close)| PricePoint {
                date: start + Duration::days(i as i64),
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                volume: 1,
            })
            .collect();
        PriceSeries::new(Ticker::parse("TEST").unwrap(), points)
    }

    fn fit(closes: &[f64]) -> FittedModel {
        let series = series_from_closes(date(2024, 1, 1), closes);
        let df = training_frame(&series).unwrap();
        SeasonalTrendModel::default().fit(&df).unwrap()
    }

    #[test]
    fn test_fit_rejects_degenerate_input() {
        for rows in [0_usize, 1] {
            let closes: Vec<f64> = vec![100.0; rows];
            let series = series_from_closes(date(2024, 1, 1), &closes);
            let df = training_frame(&series).unwrap();
            let err = SeasonalTrendModel::default().fit(&df).unwrap_err();
            assert!(matches!(err, ComputeError::InsufficientData { rows: r } if r == rows));
        }
    }

    #[test]
    fn test_recovers_noiseless_linear_trend() {
        let closes: Vec<f64> = (0..14).map(|i| 100.0 + 2.0 * i as f64).collect();
        let fitted = fit(&closes);

        assert!((fitted.slope() - 2.0).abs() < 1e-9);
        assert!((fitted.intercept() - 100.0).abs() < 1e-9);
        assert!(fitted.sigma().abs() < 1e-9);

        // Extrapolate well past the training window.
        let target = date(2024, 1, 1) + Duration::days(20);
        let df = fitted.predict(&[target]).unwrap();
        let yhat = crate::frame::float_column(&df, YHAT).unwrap();
        assert!((yhat[0] - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_recovers_weekly_pattern() {
        // Symmetric weekday offsets over four exact weeks starting on a
        // Monday, so the trend stays flat and the buckets isolate the
        // pattern exactly.
        let pattern = [2.0, -1.0, 1.0, 0.0, 1.0, -1.0, 2.0];
        let closes: Vec<f64> = (0..28).map(|i| 100.0 + pattern[i % 7]).collect();
        let fitted = fit(&closes);

        assert!(fitted.slope().abs() < 1e-9);
        let weekly = fitted.weekly();
        assert!((weekly[0] - weekly[1] - 3.0).abs() < 1e-9);
        assert!((weekly[2] - weekly[3] - 1.0).abs() < 1e-9);

        // On training dates the components reproduce the input exactly.
        let df = fitted.predict(&fitted.future_dates(0)).unwrap();
        let yhat = crate::frame::float_column(&df, YHAT).unwrap();
        for (predicted, actual) in yhat.iter().zip(&closes) {
            assert!((predicted - actual).abs() < 1e-9);
        }
        assert!(fitted.sigma().abs() < 1e-9);
    }

    #[test]
    fn test_prediction_frame_row_count() {
        let closes: Vec<f64> = (0..10).map(|i| 50.0 + i as f64).collect();
        let fitted = fit(&closes);

        let dates = fitted.future_dates(365);
        assert_eq!(dates.len(), 10 + 365);

        let df = fitted.predict(&dates).unwrap();
        assert_eq!(df.height(), 375);
    }

    #[test]
    fn test_future_dates_are_consecutive() {
        let closes: Vec<f64> = (0..5).map(|i| 50.0 + i as f64).collect();
        let fitted = fit(&closes);

        let dates = fitted.future_dates(3);
        let last_training = date(2024, 1, 5);
        assert_eq!(dates[4], last_training);
        assert_eq!(dates[5], last_training + Duration::days(1));
        assert_eq!(dates[7], last_training + Duration::days(3));
    }

    #[test]
    fn test_bounds_bracket_the_point_estimate() {
        // A sawtooth no component explains, so sigma must be positive.
        let closes: Vec<f64> = (0..20)
            .map(|i| if i % 2 == 0 { 100.0 } else { 104.0 })
            .collect();
        let fitted = fit(&closes);
        assert!(fitted.sigma() > 0.0);

        let df = fitted.predict(&fitted.future_dates(10)).unwrap();
        let yhat = crate::frame::float_column(&df, YHAT).unwrap();
        let lower = crate::frame::float_column(&df, YHAT_LOWER).unwrap();
        let upper = crate::frame::float_column(&df, YHAT_UPPER).unwrap();

        for i in 0..df.height() {
            assert!(lower[i] < yhat[i]);
            assert!(yhat[i] < upper[i]);
        }
    }

    #[test]
    fn test_horizons_agree_on_shared_dates() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + 0.5 * i as f64).collect();
        let fitted = fit(&closes);

        let short = fitted.predict(&fitted.future_dates(30)).unwrap();
        let long = fitted.predict(&fitted.future_dates(90)).unwrap();
        assert!(long.height() > short.height());

        let short_yhat = crate::frame::float_column(&short, YHAT).unwrap();
        let long_yhat = crate::frame::float_column(&long, YHAT).unwrap();
        for i in 0..short.height() {
            assert!((short_yhat[i] - long_yhat[i]).abs() < 1e-12);
        }
    }
}
