//! Time-series forecasting: projection of a price series into the model's
//! two-column training frame, an additive trend+seasonality model, and
//! prediction into a columnar output frame.

pub mod error;
pub mod frame;
pub mod model;

pub use error::{ComputeError, Result};
pub use frame::{training_frame, DS, TREND, WEEKLY, Y, YEARLY, YHAT, YHAT_LOWER, YHAT_UPPER};
pub use model::{FittedModel, SeasonalTrendModel};

/// Returns the pre-configured model used everywhere outside of tests.
///
/// No tuning surface is exposed to the user; callers get the default
/// hyperparameters.
pub fn default_model() -> SeasonalTrendModel {
    SeasonalTrendModel::default()
}
