//! Domain types shared between the web application, the market-data crate
//! and the forecasting crate. These structs carry data across crate
//! boundaries so no crate depends on another's internals.

mod forecast;
mod money;
mod series;

pub use forecast::{Forecast, ForecastPoint, ForecastSummary, Horizon};
pub use money::format_usd;
pub use series::{DateRange, PricePoint, PriceSeries, Ticker};
