//! Payment domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller-asserted payment label.
///
/// Does not drive status; status is derived from the outstanding amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// A partial payment.
    Partial,
    /// Asserted as settling the invoice in full.
    Full,
}

/// How the money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash payment.
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// Check.
    Check,
    /// Card payment.
    Card,
    /// Anything else.
    Other,
}

/// Which side of the daily cash/bank ledger a payment lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerSide {
    /// Physical cash.
    Cash,
    /// Anything routed through a bank account.
    Bank,
}

impl PaymentMethod {
    /// Maps a payment method onto the daily ledger side.
    #[must_use]
    pub const fn ledger_side(self) -> LedgerSide {
        match self {
            Self::Cash => LedgerSide::Cash,
            Self::BankTransfer | Self::Check | Self::Card | Self::Other => LedgerSide::Bank,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::BankTransfer => write!(f, "bank_transfer"),
            Self::Check => write!(f, "check"),
            Self::Card => write!(f, "card"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// One payment record as seen by the recomputation rule.
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    /// The payment ID.
    pub id: Uuid,
    /// Amount received.
    pub amount: Decimal,
    /// Per-payment discount granted at payment time (sales only).
    pub discount: Decimal,
    /// When the payment was made.
    pub paid_at: DateTime<Utc>,
}

/// Cumulative figures re-summed over an invoice's payment set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentTotals {
    /// Sum of payment amounts.
    pub received_amount: Decimal,
    /// Sum of per-payment discounts.
    pub discount_total: Decimal,
    /// Latest payment date, `None` when no payments remain.
    pub last_payment_date: Option<DateTime<Utc>>,
}

impl PaymentTotals {
    /// The zero totals for an invoice with no payments.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            received_amount: Decimal::ZERO,
            discount_total: Decimal::ZERO,
            last_payment_date: None,
        }
    }

    /// Received amount plus discounts; the figure guarded against gross.
    #[must_use]
    pub fn applied_total(&self) -> Decimal {
        self.received_amount + self.discount_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_side_mapping() {
        assert_eq!(PaymentMethod::Cash.ledger_side(), LedgerSide::Cash);
        assert_eq!(PaymentMethod::BankTransfer.ledger_side(), LedgerSide::Bank);
        assert_eq!(PaymentMethod::Check.ledger_side(), LedgerSide::Bank);
        assert_eq!(PaymentMethod::Card.ledger_side(), LedgerSide::Bank);
        assert_eq!(PaymentMethod::Other.ledger_side(), LedgerSide::Bank);
    }

    #[test]
    fn test_empty_totals() {
        let totals = PaymentTotals::empty();
        assert_eq!(totals.received_amount, Decimal::ZERO);
        assert!(totals.last_payment_date.is_none());
        assert_eq!(totals.applied_total(), Decimal::ZERO);
    }
}
