use rust_decimal::Decimal;
use rusty_money::{Money, iso};

/// Formats a price as US dollars with two decimal places, e.g. `$1,234.56`.
///
/// Non-finite inputs fall back to `$0.00` rather than panicking; prices
/// arrive from provider data and model output, both of which are finite in
/// practice.
pub fn format_usd(value: f64) -> String {
    let amount = Decimal::from_f64_retain(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp(2);
    Money::from_decimal(amount, iso::USD).to_string()
}
