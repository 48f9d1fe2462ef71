//! The invoice computation rule.
//!
//! Deterministically derives all cached invoice fields from authoritative
//! inputs. Re-run in full on invoice creation, invoice edit, payment addition
//! and payment deletion; derived fields are never trusted from client input
//! and never patched incrementally.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::InvoiceError;
use super::types::{
    ComputeInput, DualCurrencyMirror, InvoiceAggregates, InvoiceKind, InvoiceStatus,
};
use crate::currency::pkr_to_aed;

/// Derives the lifecycle status from the recomputed money fields.
///
/// Priority order matters: a fully received invoice is `Paid` even when past
/// due, and any received amount beats `Overdue`.
#[must_use]
pub fn derive_status(
    outstanding: Decimal,
    received: Decimal,
    due_date: NaiveDate,
    today: NaiveDate,
) -> InvoiceStatus {
    if outstanding <= Decimal::ZERO {
        InvoiceStatus::Paid
    } else if received > Decimal::ZERO {
        InvoiceStatus::PartiallyPaid
    } else if today > due_date {
        InvoiceStatus::Overdue
    } else {
        InvoiceStatus::Unpaid
    }
}

/// Recomputes all derived invoice fields from scratch.
///
/// The variant descriptor governs which inputs participate: VAT and discount
/// are forced to zero for variants without those concepts, and the AED mirror
/// is produced only for dual-currency (PKR) variants.
///
/// # Errors
///
/// Returns `InvoiceError::AmountOutOfRange` when any intermediate figure
/// overflows the `Decimal` range. The inputs originate from client requests,
/// so every multiply/add here is checked instead of being allowed to panic.
pub fn compute_invoice_aggregates(
    kind: InvoiceKind,
    input: &ComputeInput,
    today: NaiveDate,
) -> Result<InvoiceAggregates, InvoiceError> {
    let variant = kind.variant();

    let subtotal = input
        .principal
        .subtotal()
        .ok_or(InvoiceError::AmountOutOfRange)?;

    let vat_amount = if variant.has_vat {
        subtotal
            .checked_mul(input.vat_percentage)
            .ok_or(InvoiceError::AmountOutOfRange)?
            / Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    let discount = if variant.has_discount {
        input.discount
    } else {
        Decimal::ZERO
    };

    let gross_amount = subtotal
        .checked_add(vat_amount)
        .and_then(|v| v.checked_sub(discount))
        .ok_or(InvoiceError::AmountOutOfRange)?
        .max(Decimal::ZERO);

    // Stored raw: the subtraction may go negative on historical data edits.
    // Payment-time guards clamp at zero.
    let outstanding_amount = gross_amount
        .checked_sub(input.received_amount)
        .ok_or(InvoiceError::AmountOutOfRange)?;

    let status = derive_status(
        outstanding_amount,
        input.received_amount,
        input.due_date,
        today,
    );

    let aed_mirror = if variant.dual_currency {
        let rate = input.conversion_rate.unwrap_or(Decimal::ZERO);
        Some(DualCurrencyMirror {
            gross_aed: pkr_to_aed(gross_amount, rate),
            received_aed: pkr_to_aed(input.received_amount, rate),
            outstanding_aed: pkr_to_aed(outstanding_amount, rate),
        })
    } else {
        None
    };

    Ok(InvoiceAggregates {
        subtotal,
        vat_amount,
        gross_amount,
        outstanding_amount,
        status,
        aed_mirror,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::types::Principal;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }

    fn due_in_future() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    fn sales_input(received: Decimal) -> ComputeInput {
        ComputeInput {
            principal: Principal::LineItem {
                quantity: dec!(10),
                rate: dec!(100),
            },
            vat_percentage: dec!(5),
            discount: Decimal::ZERO,
            received_amount: received,
            due_date: due_in_future(),
            conversion_rate: None,
        }
    }

    #[test]
    fn test_overflowing_line_item_is_rejected_not_panicking() {
        let mut input = sales_input(Decimal::ZERO);
        input.principal = Principal::LineItem {
            quantity: Decimal::MAX,
            rate: dec!(2),
        };
        assert!(matches!(
            compute_invoice_aggregates(InvoiceKind::Sales, &input, today()),
            Err(InvoiceError::AmountOutOfRange)
        ));
    }

    #[test]
    fn test_overflowing_vat_multiply_is_rejected() {
        let mut input = sales_input(Decimal::ZERO);
        input.principal = Principal::Flat(Decimal::MAX);
        input.vat_percentage = dec!(5);
        assert!(matches!(
            compute_invoice_aggregates(InvoiceKind::Sales, &input, today()),
            Err(InvoiceError::AmountOutOfRange)
        ));
    }

    #[test]
    fn test_sales_invoice_creation() {
        // quantity=10, rate=100, vat=5% -> subtotal 1000, vat 50, gross 1050
        let agg = compute_invoice_aggregates(InvoiceKind::Sales, &sales_input(Decimal::ZERO), today()).unwrap();

        assert_eq!(agg.subtotal, dec!(1000));
        assert_eq!(agg.vat_amount, dec!(50));
        assert_eq!(agg.gross_amount, dec!(1050));
        assert_eq!(agg.outstanding_amount, dec!(1050));
        assert_eq!(agg.status, InvoiceStatus::Unpaid);
        assert!(agg.aed_mirror.is_none());
    }

    #[test]
    fn test_partial_then_full_payment_lifecycle() {
        let agg = compute_invoice_aggregates(InvoiceKind::Sales, &sales_input(dec!(500)), today()).unwrap();
        assert_eq!(agg.outstanding_amount, dec!(550));
        assert_eq!(agg.status, InvoiceStatus::PartiallyPaid);

        let agg = compute_invoice_aggregates(InvoiceKind::Sales, &sales_input(dec!(1050)), today()).unwrap();
        assert_eq!(agg.outstanding_amount, Decimal::ZERO);
        assert_eq!(agg.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_discount_reduces_gross() {
        let mut input = sales_input(Decimal::ZERO);
        input.discount = dec!(150);
        let agg = compute_invoice_aggregates(InvoiceKind::Sales, &input, today()).unwrap();
        assert_eq!(agg.gross_amount, dec!(900));
    }

    #[test]
    fn test_gross_clamped_at_zero() {
        let mut input = sales_input(Decimal::ZERO);
        input.discount = dec!(5000);
        let agg = compute_invoice_aggregates(InvoiceKind::Sales, &input, today()).unwrap();
        assert_eq!(agg.gross_amount, Decimal::ZERO);
        // Fully discounted invoice counts as paid.
        assert_eq!(agg.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_vat_and_discount_ignored_for_flat_variants() {
        let input = ComputeInput {
            principal: Principal::Flat(dec!(2000)),
            vat_percentage: dec!(5),
            discount: dec!(100),
            received_amount: Decimal::ZERO,
            due_date: due_in_future(),
            conversion_rate: None,
        };
        let agg = compute_invoice_aggregates(InvoiceKind::DubaiClearance, &input, today()).unwrap();
        assert_eq!(agg.vat_amount, Decimal::ZERO);
        assert_eq!(agg.gross_amount, dec!(2000));
    }

    #[test]
    fn test_pkr_invoice_aed_mirror() {
        // amount_pkr=10000, rate=80 -> amount_aed=125.00
        let input = ComputeInput {
            principal: Principal::Flat(dec!(10000)),
            vat_percentage: Decimal::ZERO,
            discount: Decimal::ZERO,
            received_amount: dec!(4000),
            due_date: due_in_future(),
            conversion_rate: Some(dec!(80)),
        };
        let agg = compute_invoice_aggregates(InvoiceKind::Freight, &input, today()).unwrap();

        let mirror = agg.aed_mirror.unwrap();
        assert_eq!(mirror.gross_aed, dec!(125.00));
        assert_eq!(mirror.received_aed, dec!(50.00));
        assert_eq!(mirror.outstanding_aed, dec!(75.00));
    }

    #[test]
    fn test_missing_conversion_rate_mirrors_zero() {
        let input = ComputeInput {
            principal: Principal::Flat(dec!(10000)),
            vat_percentage: Decimal::ZERO,
            discount: Decimal::ZERO,
            received_amount: Decimal::ZERO,
            due_date: due_in_future(),
            conversion_rate: None,
        };
        let agg = compute_invoice_aggregates(InvoiceKind::Transport, &input, today()).unwrap();
        let mirror = agg.aed_mirror.unwrap();
        assert_eq!(mirror.gross_aed, Decimal::ZERO);
        assert_eq!(mirror.outstanding_aed, Decimal::ZERO);
    }

    #[test]
    fn test_status_priority_order() {
        let due = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let past_due_today = NaiveDate::from_ymd_opt(2026, 7, 2).unwrap();

        // Paid beats overdue.
        assert_eq!(
            derive_status(Decimal::ZERO, dec!(100), due, past_due_today),
            InvoiceStatus::Paid
        );
        // Partially paid beats overdue.
        assert_eq!(
            derive_status(dec!(50), dec!(50), due, past_due_today),
            InvoiceStatus::PartiallyPaid
        );
        // Overdue only when nothing received and past due.
        assert_eq!(
            derive_status(dec!(100), Decimal::ZERO, due, past_due_today),
            InvoiceStatus::Overdue
        );
        // Due today is not overdue.
        assert_eq!(
            derive_status(dec!(100), Decimal::ZERO, due, due),
            InvoiceStatus::Unpaid
        );
    }

    #[test]
    fn test_negative_outstanding_is_stored_raw() {
        // Historical edit shrank the invoice below what was already received.
        let mut input = sales_input(dec!(2000));
        input.discount = dec!(500);
        let agg = compute_invoice_aggregates(InvoiceKind::Sales, &input, today()).unwrap();
        assert_eq!(agg.gross_amount, dec!(550));
        assert_eq!(agg.outstanding_amount, dec!(-1450));
        assert_eq!(agg.status, InvoiceStatus::Paid);
    }
}
