use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Forecast horizon in whole years, bounded to 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Horizon(u8);

impl Horizon {
    pub const MIN_YEARS: u8 = 1;
    pub const MAX_YEARS: u8 = 4;

    /// Builds a horizon, rejecting values outside 1..=4.
    pub fn years(years: u8) -> Option<Self> {
        if (Self::MIN_YEARS..=Self::MAX_YEARS).contains(&years) {
            Some(Self(years))
        } else {
            None
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// The horizon as a day count. Uses a flat 365-day year; leap days are
    /// not added, so a 4-year horizon is exactly 1460 days.
    pub fn days(&self) -> i64 {
        i64::from(self.0) * 365
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self(Self::MIN_YEARS)
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One predicted day: the point estimate with its uncertainty bounds and
/// the fitted components it decomposes into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    pub trend: f64,
    pub weekly: f64,
    pub yearly: f64,
}

/// The full prediction: one point per day from the start of history through
/// the end of the horizon, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    points: Vec<ForecastPoint>,
}

impl Forecast {
    pub fn new(mut points: Vec<ForecastPoint>) -> Self {
        points.sort_by_key(|p| p.ds);
        Self { points }
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The last `n` points (fewer if the forecast is shorter).
    pub fn tail(&self, n: usize) -> &[ForecastPoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }

    /// Points strictly after `today` — the actionable prediction window.
    pub fn future_window(&self, today: NaiveDate) -> impl Iterator<Item = &ForecastPoint> {
        self.points.iter().filter(move |p| p.ds > today)
    }

    /// Summary statistics over the window strictly after `today`, or `None`
    /// when no predicted day lies beyond it.
    pub fn summary(&self, today: NaiveDate) -> Option<ForecastSummary> {
        let window: Vec<&ForecastPoint> = self.future_window(today).collect();
        if window.is_empty() {
            return None;
        }

        let expected_mean =
            window.iter().map(|p| p.yhat).sum::<f64>() / window.len() as f64;
        let predicted_high = window
            .iter()
            .map(|p| p.yhat_upper)
            .fold(f64::NEG_INFINITY, f64::max);
        let predicted_low = window
            .iter()
            .map(|p| p.yhat_lower)
            .fold(f64::INFINITY, f64::min);

        Some(ForecastSummary {
            expected_mean,
            predicted_high,
            predicted_low,
            window_start: window.first().map(|p| p.ds)?,
            window_end: window.last().map(|p| p.ds)?,
            days: window.len(),
        })
    }
}

/// Aggregates over the prediction window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    /// Mean of the point prediction.
    pub expected_mean: f64,
    /// Maximum of the upper uncertainty bound.
    pub predicted_high: f64,
    /// Minimum of the lower uncertainty bound.
    pub predicted_low: f64,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub days: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_point(ds: NaiveDate, yhat: f64) -> ForecastPoint {
        ForecastPoint {
            ds,
            yhat,
            yhat_lower: yhat - 1.0,
            yhat_upper: yhat + 1.0,
            trend: yhat,
            weekly: 0.0,
            yearly: 0.0,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_horizon_bounds() {
        assert!(Horizon::years(0).is_none());
        assert!(Horizon::years(5).is_none());
        assert_eq!(Horizon::years(1).unwrap().get(), 1);
        assert_eq!(Horizon::years(4).unwrap().get(), 4);
        assert_eq!(Horizon::default().get(), 1);
    }

    #[test]
    fn test_horizon_days_uses_flat_years() {
        assert_eq!(Horizon::years(1).unwrap().days(), 365);
        assert_eq!(Horizon::years(4).unwrap().days(), 1460);
    }

    #[test]
    fn test_tail_shorter_than_request() {
        let forecast = Forecast::new(vec![flat_point(date(2024, 6, 1), 10.0)]);
        assert_eq!(forecast.tail(5).len(), 1);
    }

    #[test]
    fn test_summary_only_counts_days_after_today() {
        let points = vec![
            flat_point(date(2024, 5, 30), 10.0),
            flat_point(date(2024, 5, 31), 20.0),
            flat_point(date(2024, 6, 1), 30.0),
            flat_point(date(2024, 6, 2), 40.0),
        ];
        let forecast = Forecast::new(points);

        let summary = forecast.summary(date(2024, 5, 31)).unwrap();
        assert_eq!(summary.days, 2);
        assert!((summary.expected_mean - 35.0).abs() < 1e-9);
        assert!((summary.predicted_high - 41.0).abs() < 1e-9);
        assert!((summary.predicted_low - 29.0).abs() < 1e-9);
        assert_eq!(summary.window_start, date(2024, 6, 1));
        assert_eq!(summary.window_end, date(2024, 6, 2));
    }

    #[test]
    fn test_summary_none_when_window_empty() {
        let forecast = Forecast::new(vec![flat_point(date(2024, 5, 30), 10.0)]);
        assert!(forecast.summary(date(2024, 6, 1)).is_none());
    }

    #[test]
    fn test_points_sorted_on_construction() {
        let forecast = Forecast::new(vec![
            flat_point(date(2024, 6, 2), 2.0),
            flat_point(date(2024, 6, 1), 1.0),
        ]);
        assert_eq!(forecast.points()[0].ds, date(2024, 6, 1));
    }
}
