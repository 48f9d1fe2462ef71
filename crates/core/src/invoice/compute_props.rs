//! Property-based tests for the invoice computation rule.
//!
//! - Gross amount integrity
//! - Outstanding amount integrity
//! - Status as a pure function of the money fields
//! - AED mirror consistency for dual-currency variants
//! - Payment guard never admits an overpayment

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::compute::{compute_invoice_aggregates, derive_status};
use super::types::{ComputeInput, InvoiceKind, InvoiceStatus, Principal};
use crate::currency::pkr_to_aed;
use crate::payment::PaymentService;
use crate::rounding::ceil_2dp;

/// Strategy to generate money amounts (0.00 to 100,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive amounts (0.01 to 100,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate VAT percentages (0 to 100).
fn vat_percentage() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|bp| Decimal::new(bp, 2))
}

/// Strategy to generate conversion rates (0.01 to 1,000.00).
fn conversion_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|v| Decimal::new(v, 2))
}

fn any_kind() -> impl Strategy<Value = InvoiceKind> {
    prop_oneof![
        Just(InvoiceKind::Sales),
        Just(InvoiceKind::Freight),
        Just(InvoiceKind::Transport),
        Just(InvoiceKind::DubaiTransport),
        Just(InvoiceKind::DubaiClearance),
    ]
}

fn fixed_dates() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
    )
}

fn make_input(
    principal: Decimal,
    vat: Decimal,
    discount: Decimal,
    received: Decimal,
    rate: Option<Decimal>,
) -> ComputeInput {
    let (due_date, _) = fixed_dates();
    ComputeInput {
        principal: Principal::Flat(principal),
        vat_percentage: vat,
        discount,
        received_amount: received,
        due_date,
        conversion_rate: rate,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Gross amount equals max(0, subtotal + vat - discount) for every
    /// variant and every input.
    #[test]
    fn prop_gross_amount_integrity(
        kind in any_kind(),
        principal in positive_amount(),
        vat in vat_percentage(),
        discount in amount(),
        received in amount(),
        rate in conversion_rate(),
    ) {
        let (_, today) = fixed_dates();
        let input = make_input(principal, vat, discount, received, Some(rate));
        let agg = compute_invoice_aggregates(kind, &input, today).unwrap();

        let variant = kind.variant();
        let effective_vat = if variant.has_vat {
            principal * vat / Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
        let effective_discount = if variant.has_discount { discount } else { Decimal::ZERO };
        let expected = (principal + effective_vat - effective_discount).max(Decimal::ZERO);

        prop_assert_eq!(agg.gross_amount, expected);
        prop_assert!(agg.gross_amount >= Decimal::ZERO);
    }

    /// Outstanding equals gross minus received, exactly, after every
    /// recomputation.
    #[test]
    fn prop_outstanding_integrity(
        kind in any_kind(),
        principal in positive_amount(),
        received in amount(),
        rate in conversion_rate(),
    ) {
        let (_, today) = fixed_dates();
        let input = make_input(principal, Decimal::ZERO, Decimal::ZERO, received, Some(rate));
        let agg = compute_invoice_aggregates(kind, &input, today).unwrap();

        prop_assert_eq!(agg.outstanding_amount, agg.gross_amount - received);
    }

    /// Status is the documented pure function of the money fields and dates.
    #[test]
    fn prop_status_pure_function(
        outstanding in -5_000_000i64..5_000_000i64,
        received in 0i64..5_000_000i64,
        days_past_due in -30i64..30i64,
    ) {
        let outstanding = Decimal::new(outstanding, 2);
        let received = Decimal::new(received, 2);
        let due = NaiveDate::from_ymd_opt(2026, 8, 15).unwrap();
        let today = due + chrono::Duration::days(days_past_due);

        let status = derive_status(outstanding, received, due, today);
        let expected = if outstanding <= Decimal::ZERO {
            InvoiceStatus::Paid
        } else if received > Decimal::ZERO {
            InvoiceStatus::PartiallyPaid
        } else if today > due {
            InvoiceStatus::Overdue
        } else {
            InvoiceStatus::Unpaid
        };
        prop_assert_eq!(status, expected);
    }

    /// The AED mirror always equals the PKR fields pushed through the same
    /// conversion, and only dual-currency variants produce one.
    #[test]
    fn prop_aed_mirror_consistency(
        kind in any_kind(),
        principal in positive_amount(),
        received in amount(),
        rate in conversion_rate(),
    ) {
        let (_, today) = fixed_dates();
        let input = make_input(principal, Decimal::ZERO, Decimal::ZERO, received, Some(rate));
        let agg = compute_invoice_aggregates(kind, &input, today).unwrap();

        if kind.variant().dual_currency {
            let mirror = agg.aed_mirror.expect("dual-currency variant must mirror");
            prop_assert_eq!(mirror.gross_aed, pkr_to_aed(agg.gross_amount, rate));
            prop_assert_eq!(mirror.received_aed, pkr_to_aed(received, rate));
            prop_assert_eq!(mirror.outstanding_aed, pkr_to_aed(agg.outstanding_amount, rate));
        } else {
            prop_assert!(agg.aed_mirror.is_none());
        }
    }

    /// Recomputation is deterministic: same inputs, same aggregates.
    #[test]
    fn prop_recompute_deterministic(
        kind in any_kind(),
        principal in positive_amount(),
        vat in vat_percentage(),
        discount in amount(),
        received in amount(),
        rate in conversion_rate(),
    ) {
        let (_, today) = fixed_dates();
        let input = make_input(principal, vat, discount, received, Some(rate));
        let a = compute_invoice_aggregates(kind, &input, today).unwrap();
        let b = compute_invoice_aggregates(kind, &input, today).unwrap();
        prop_assert_eq!(a, b);
    }

    /// The payment guard never admits amount + discount beyond outstanding.
    #[test]
    fn prop_payment_guard_never_overpays(
        outstanding in positive_amount(),
        amount in amount(),
        discount in amount(),
    ) {
        let result = PaymentService::validate_add_payment(
            "INV-000001",
            outstanding,
            amount,
            discount,
            true,
        );
        if result.is_ok() {
            prop_assert!(amount + discount <= outstanding);
            prop_assert!(amount + discount > Decimal::ZERO);
        }
    }

    /// Ceiling rounding never decreases a value and moves it by less than a
    /// cent, and is idempotent.
    #[test]
    fn prop_ceil_2dp_bounds(value in -10_000_000i64..10_000_000i64, scale in 0u32..6) {
        let value = Decimal::new(value, scale);
        let rounded = ceil_2dp(value);
        prop_assert!(rounded >= value);
        prop_assert!(rounded - value < Decimal::new(1, 2));
        prop_assert_eq!(ceil_2dp(rounded), rounded);
    }
}
