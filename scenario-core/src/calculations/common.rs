//! Shared rounding helpers for tax calculations.

use rust_decimal::Decimal;

/// Rounds to the nearest whole currency unit, half away from zero.
///
/// Per-bracket tax amounts and income aggregates are carried in whole
/// dollars; midpoints round up so aggregate totals reproduce exactly.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use scenario_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(9113.5)), dec!(9114));
/// assert_eq!(round_whole(dec!(9113.4)), dec!(9113));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to two decimal places, half away from zero.
///
/// Used for the effective-rate percentage.
pub fn round_two(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}
