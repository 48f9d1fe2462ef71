//! Payment ledger guards and recomputation.

use rust_decimal::Decimal;

use super::types::{PaymentRecord, PaymentTotals};
use crate::invoice::error::InvoiceError;

/// Payment ledger service.
///
/// Pure functions: the repositories run the guard against the invoice row
/// they hold locked, then re-sum the payment set they just mutated.
pub struct PaymentService;

impl PaymentService {
    /// Validates a payment before it is persisted.
    ///
    /// Guards, in order:
    /// 1. The invoice must still have something outstanding (`AlreadyPaid`
    ///    is a distinct error, not a generic validation failure)
    /// 2. Amount and discount must be non-negative and not both zero
    /// 3. Per-payment discounts only where the variant supports them
    /// 4. Amount plus discount must not exceed the outstanding amount
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError` naming the offending values on rejection.
    pub fn validate_add_payment(
        invoice_number: &str,
        outstanding: Decimal,
        amount: Decimal,
        discount: Decimal,
        allows_discount: bool,
    ) -> Result<(), InvoiceError> {
        if outstanding <= Decimal::ZERO {
            return Err(InvoiceError::AlreadyPaid {
                invoice_number: invoice_number.to_string(),
            });
        }

        if amount < Decimal::ZERO || discount < Decimal::ZERO {
            return Err(InvoiceError::EmptyPayment);
        }

        if amount <= Decimal::ZERO && discount <= Decimal::ZERO {
            return Err(InvoiceError::EmptyPayment);
        }

        if discount > Decimal::ZERO && !allows_discount {
            return Err(InvoiceError::DiscountNotSupported);
        }

        let attempted = amount + discount;
        if attempted > outstanding {
            return Err(InvoiceError::Overpayment {
                attempted,
                limit: outstanding,
            });
        }

        Ok(())
    }

    /// Re-sums cumulative figures over the authoritative payment set.
    ///
    /// Always called with the full remaining set after insert or delete;
    /// never fed a delta. This is what makes payment deletion safe against
    /// drift from independently edited discounts or historical data.
    #[must_use]
    pub fn summarize_payments(payments: &[PaymentRecord]) -> PaymentTotals {
        let received_amount: Decimal = payments.iter().map(|p| p.amount).sum();
        let discount_total: Decimal = payments.iter().map(|p| p.discount).sum();
        let last_payment_date = payments.iter().map(|p| p.paid_at).max();

        PaymentTotals {
            received_amount,
            discount_total,
            last_payment_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn payment(amount: Decimal, discount: Decimal, day: u32) -> PaymentRecord {
        PaymentRecord {
            id: Uuid::new_v4(),
            amount,
            discount,
            paid_at: Utc.with_ymd_and_hms(2026, 8, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_valid_payment_accepted() {
        assert!(
            PaymentService::validate_add_payment("INV-000001", dec!(550), dec!(500), dec!(0), true)
                .is_ok()
        );
    }

    #[test]
    fn test_fully_paid_invoice_rejects_payment() {
        let err = PaymentService::validate_add_payment(
            "INV-000001",
            Decimal::ZERO,
            dec!(100),
            Decimal::ZERO,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, InvoiceError::AlreadyPaid { .. }));

        // Negative outstanding (historical edit) is also fully paid.
        assert!(matches!(
            PaymentService::validate_add_payment("INV-000001", dec!(-10), dec!(100), dec!(0), true),
            Err(InvoiceError::AlreadyPaid { .. })
        ));
    }

    #[test]
    fn test_zero_amount_and_discount_rejected() {
        assert!(matches!(
            PaymentService::validate_add_payment("INV-1", dec!(100), dec!(0), dec!(0), true),
            Err(InvoiceError::EmptyPayment)
        ));
        // Discount alone is a valid payment.
        assert!(
            PaymentService::validate_add_payment("INV-1", dec!(100), dec!(0), dec!(30), true)
                .is_ok()
        );
    }

    #[test]
    fn test_negative_values_rejected() {
        assert!(matches!(
            PaymentService::validate_add_payment("INV-1", dec!(100), dec!(-5), dec!(0), true),
            Err(InvoiceError::EmptyPayment)
        ));
        assert!(matches!(
            PaymentService::validate_add_payment("INV-1", dec!(100), dec!(50), dec!(-5), true),
            Err(InvoiceError::EmptyPayment)
        ));
    }

    #[test]
    fn test_overpayment_rejected_with_values() {
        let err =
            PaymentService::validate_add_payment("INV-1", dec!(550), dec!(500), dec!(100), true)
                .unwrap_err();
        match err {
            InvoiceError::Overpayment { attempted, limit } => {
                assert_eq!(attempted, dec!(600));
                assert_eq!(limit, dec!(550));
            }
            other => panic!("expected Overpayment, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_settlement_accepted() {
        assert!(
            PaymentService::validate_add_payment("INV-1", dec!(550), dec!(550), dec!(0), true)
                .is_ok()
        );
    }

    #[test]
    fn test_discount_rejected_for_flat_variants() {
        assert!(matches!(
            PaymentService::validate_add_payment("FRT-1", dec!(1000), dec!(100), dec!(50), false),
            Err(InvoiceError::DiscountNotSupported)
        ));
    }

    #[test]
    fn test_summarize_empty_set() {
        assert_eq!(PaymentService::summarize_payments(&[]), PaymentTotals::empty());
    }

    #[test]
    fn test_summarize_sums_and_max_date() {
        let payments = vec![
            payment(dec!(200), dec!(10), 1),
            payment(dec!(300), dec!(0), 5),
            payment(dec!(100), dec!(20), 3),
        ];
        let totals = PaymentService::summarize_payments(&payments);
        assert_eq!(totals.received_amount, dec!(600));
        assert_eq!(totals.discount_total, dec!(30));
        assert_eq!(
            totals.last_payment_date.unwrap(),
            Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).unwrap()
        );
        assert_eq!(totals.applied_total(), dec!(630));
    }

    #[test]
    fn test_delete_middle_payment_resums_exactly() {
        // Regression: deleting out of order must re-sum the remaining set,
        // not subtract the deleted amount from a cached figure.
        let mut payments = vec![
            payment(dec!(200), dec!(0), 1),
            payment(dec!(300), dec!(0), 2),
            payment(dec!(100), dec!(0), 3),
        ];
        let before = PaymentService::summarize_payments(&payments);
        assert_eq!(before.received_amount, dec!(600));

        // Remove the middle payment.
        payments.remove(1);
        let after = PaymentService::summarize_payments(&payments);
        assert_eq!(after.received_amount, dec!(300));
        assert_eq!(
            after.last_payment_date.unwrap(),
            Utc.with_ymd_and_hms(2026, 8, 3, 12, 0, 0).unwrap()
        );

        // Removing the rest leaves the empty totals.
        payments.clear();
        assert_eq!(
            PaymentService::summarize_payments(&payments),
            PaymentTotals::empty()
        );
    }
}
