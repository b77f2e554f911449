//! Amounts are persisted as integer minor units (two fractional digits) so SQL `SUM` stays exact.

use rust_decimal::{Decimal, RoundingStrategy};

/// Largest storable amount: 99 999 999.99.
pub const MAX_AMOUNT_MINOR: i64 = 9_999_999_999;

/// Rounds to two places (half away from zero) and returns the amount in minor units.
/// Returns `None` when the value does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    i64::try_from(rounded.mantissa()).ok()
}

/// Converts minor units back to a decimal with scale 2.
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_to_minor_units_rounds_half_away_from_zero() {
        assert_eq!(to_minor_units(Decimal::from_str("12.50").unwrap()), Some(1250));
        assert_eq!(to_minor_units(Decimal::from_str("0.005").unwrap()), Some(1));
        assert_eq!(to_minor_units(Decimal::from_str("0.004").unwrap()), Some(0));
        assert_eq!(to_minor_units(Decimal::from_str("250").unwrap()), Some(25000));
        assert_eq!(to_minor_units(Decimal::from_str("-5").unwrap()), Some(-500));
    }

    #[test]
    fn test_from_minor_units_keeps_scale() {
        let amount = from_minor_units(1250);
        assert_eq!(amount, Decimal::from_str("12.5").unwrap());
        assert_eq!(amount.to_string(), "12.50");
    }
}
