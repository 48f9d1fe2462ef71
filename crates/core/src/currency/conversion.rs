//! PKR to AED conversion with a per-invoice rate.
//!
//! Pakistan-side invoices store a conversion rate captured at invoice time;
//! the AED mirror fields are always derived through it, never stored
//! independently.

use rust_decimal::{Decimal, RoundingStrategy};

/// Converts a PKR amount to AED using the invoice's conversion rate.
///
/// The rate expresses PKR per AED (`amount_aed = amount_pkr / rate`). A
/// non-positive rate yields zero rather than an error so that historical
/// invoices with missing rates keep rendering.
///
/// Rounds to 2 decimal places with banker's rounding to minimize cumulative
/// errors across the mirrored fields.
#[must_use]
pub fn pkr_to_aed(amount_pkr: Decimal, rate: Decimal) -> Decimal {
    if rate <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (amount_pkr / rate).round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_basic_conversion() {
        // 10,000 PKR at 80 PKR/AED = 125.00 AED
        assert_eq!(pkr_to_aed(dec!(10000), dec!(80)), dec!(125.00));
    }

    #[test]
    fn test_non_positive_rate_yields_zero() {
        assert_eq!(pkr_to_aed(dec!(10000), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(pkr_to_aed(dec!(10000), dec!(-80)), Decimal::ZERO);
    }

    #[test]
    fn test_rounding_to_two_places() {
        // 1000 / 3 = 333.333... -> 333.33
        assert_eq!(pkr_to_aed(dec!(1000), dec!(3)), dec!(333.33));
        // Banker's rounding at the midpoint: 0.125 -> 0.12
        assert_eq!(pkr_to_aed(dec!(1), dec!(8)), dec!(0.12));
    }

    #[test]
    fn test_zero_amount() {
        assert_eq!(pkr_to_aed(Decimal::ZERO, dec!(80)), dec!(0.00));
    }
}
