//! Money calculation utilities using rust_decimal for precision
//!
//! Prices are stored as `f64`; sums and products are done in `Decimal`
//! and rounded back to cents.

use rust_decimal::prelude::*;
use shared::models::OrderLine;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// price x count
pub fn line_total(price: f64, count: i64) -> f64 {
    to_f64(to_decimal(price) * Decimal::from(count))
}

/// Sum of all line subtotals
pub fn order_total(lines: &[OrderLine]) -> f64 {
    let total = lines
        .iter()
        .map(|l| to_decimal(l.price) * Decimal::from(l.count))
        .fold(Decimal::ZERO, |acc, x| acc + x);
    to_f64(total)
}
