//! Invoice domain types shared by all variants.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use taajir_shared::types::Currency;

/// The five invoice variants run by the trading company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceKind {
    /// Sales invoice: line items (quantity x rate), VAT, flat discount, AED.
    Sales,
    /// Sea/air freight invoice, PKR with AED mirror.
    Freight,
    /// Pakistan-side transport invoice, PKR with AED mirror.
    Transport,
    /// Dubai-side transport invoice, AED.
    DubaiTransport,
    /// Dubai customs clearance invoice, AED.
    DubaiClearance,
}

impl InvoiceKind {
    /// All invoice kinds, in display order.
    pub const ALL: [Self; 5] = [
        Self::Sales,
        Self::Freight,
        Self::Transport,
        Self::DubaiTransport,
        Self::DubaiClearance,
    ];

    /// Returns the variant descriptor driving the computation rule.
    #[must_use]
    pub const fn variant(self) -> VariantSpec {
        match self {
            Self::Sales => VariantSpec {
                has_vat: true,
                has_discount: true,
                dual_currency: false,
                currency: Currency::Aed,
                number_prefix: "INV",
                counter_key: "sales_invoice",
            },
            Self::Freight => VariantSpec {
                has_vat: false,
                has_discount: false,
                dual_currency: true,
                currency: Currency::Pkr,
                number_prefix: "FRT",
                counter_key: "freight_invoice",
            },
            Self::Transport => VariantSpec {
                has_vat: false,
                has_discount: false,
                dual_currency: true,
                currency: Currency::Pkr,
                number_prefix: "TRP",
                counter_key: "transport_invoice",
            },
            Self::DubaiTransport => VariantSpec {
                has_vat: false,
                has_discount: false,
                dual_currency: false,
                currency: Currency::Aed,
                number_prefix: "DTR",
                counter_key: "dubai_transport_invoice",
            },
            Self::DubaiClearance => VariantSpec {
                has_vat: false,
                has_discount: false,
                dual_currency: false,
                currency: Currency::Aed,
                number_prefix: "DCL",
                counter_key: "dubai_clearance_invoice",
            },
        }
    }
}

impl std::fmt::Display for InvoiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sales => write!(f, "sales"),
            Self::Freight => write!(f, "freight"),
            Self::Transport => write!(f, "transport"),
            Self::DubaiTransport => write!(f, "dubai_transport"),
            Self::DubaiClearance => write!(f, "dubai_clearance"),
        }
    }
}

impl std::str::FromStr for InvoiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales" => Ok(Self::Sales),
            "freight" => Ok(Self::Freight),
            "transport" => Ok(Self::Transport),
            "dubai_transport" => Ok(Self::DubaiTransport),
            "dubai_clearance" => Ok(Self::DubaiClearance),
            _ => Err(format!("Unknown invoice kind: {s}")),
        }
    }
}

/// Static descriptor of one invoice variant.
///
/// The computation rule is written once against this descriptor instead of
/// once per variant.
#[derive(Debug, Clone, Copy)]
pub struct VariantSpec {
    /// Whether the variant carries VAT (sales only).
    pub has_vat: bool,
    /// Whether the variant carries a flat invoice discount (sales only).
    pub has_discount: bool,
    /// Whether PKR amounts are mirrored into AED via a conversion rate.
    pub dual_currency: bool,
    /// The currency the invoice is denominated in.
    pub currency: Currency,
    /// Prefix used when formatting invoice numbers.
    pub number_prefix: &'static str,
    /// Key into the shared sequence counter collection.
    pub counter_key: &'static str,
}

/// Invoice lifecycle status.
///
/// Status is a pure function of (outstanding, received, due date, today) and
/// is never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// No payment received and not past due.
    Unpaid,
    /// Some payment received, outstanding remains.
    PartiallyPaid,
    /// Outstanding amount is zero or below.
    Paid,
    /// No payment received and past the due date.
    Overdue,
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unpaid => write!(f, "unpaid"),
            Self::PartiallyPaid => write!(f, "partially_paid"),
            Self::Paid => write!(f, "paid"),
            Self::Overdue => write!(f, "overdue"),
        }
    }
}

/// The principal side of an invoice: line items or a flat amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    /// Quantity x rate (sales invoices).
    LineItem {
        /// Number of units.
        quantity: Decimal,
        /// Unit price.
        rate: Decimal,
    },
    /// A flat principal amount (freight/transport/clearance invoices).
    Flat(Decimal),
}

impl Principal {
    /// Returns the subtotal this principal resolves to.
    ///
    /// `None` when quantity times rate does not fit in a `Decimal`; the
    /// operands come straight from client input, so the multiply is checked
    /// rather than left to panic.
    #[must_use]
    pub fn subtotal(self) -> Option<Decimal> {
        match self {
            Self::LineItem { quantity, rate } => quantity.checked_mul(rate),
            Self::Flat(amount) => Some(amount),
        }
    }
}

/// Authoritative inputs to the computation rule.
#[derive(Debug, Clone)]
pub struct ComputeInput {
    /// Principal amount or line items.
    pub principal: Principal,
    /// VAT percentage; ignored for variants without VAT.
    pub vat_percentage: Decimal,
    /// Flat discount in invoice currency; ignored for variants without one.
    pub discount: Decimal,
    /// Cumulative received/paid amount, re-summed from the payment set.
    pub received_amount: Decimal,
    /// Due date driving overdue detection.
    pub due_date: NaiveDate,
    /// PKR to AED conversion rate, required for dual-currency variants.
    pub conversion_rate: Option<Decimal>,
}

/// AED mirror of a PKR-denominated invoice's money fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualCurrencyMirror {
    /// Gross amount in AED.
    pub gross_aed: Decimal,
    /// Received amount in AED.
    pub received_aed: Decimal,
    /// Outstanding amount in AED.
    pub outstanding_aed: Decimal,
}

/// All derived/cached invoice fields, recomputed at every mutation site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceAggregates {
    /// quantity x rate, or the flat principal.
    pub subtotal: Decimal,
    /// subtotal x vat% / 100 (zero for variants without VAT).
    pub vat_amount: Decimal,
    /// max(0, subtotal + vat - discount).
    pub gross_amount: Decimal,
    /// gross - received; stored raw, clamping happens in payment guards.
    pub outstanding_amount: Decimal,
    /// Derived lifecycle status.
    pub status: InvoiceStatus,
    /// AED mirror for dual-currency variants, `None` otherwise.
    pub aed_mirror: Option<DualCurrencyMirror>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_kind_display_roundtrip() {
        for kind in InvoiceKind::ALL {
            assert_eq!(InvoiceKind::from_str(&kind.to_string()).unwrap(), kind);
        }
        assert!(InvoiceKind::from_str("purchase").is_err());
    }

    #[test]
    fn test_variant_descriptors() {
        let sales = InvoiceKind::Sales.variant();
        assert!(sales.has_vat);
        assert!(sales.has_discount);
        assert!(!sales.dual_currency);
        assert_eq!(sales.number_prefix, "INV");

        let freight = InvoiceKind::Freight.variant();
        assert!(!freight.has_vat);
        assert!(freight.dual_currency);
        assert_eq!(freight.currency, Currency::Pkr);
    }

    #[test]
    fn test_counter_keys_are_distinct() {
        let mut keys: Vec<_> = InvoiceKind::ALL
            .iter()
            .map(|k| k.variant().counter_key)
            .collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), InvoiceKind::ALL.len());
    }

    #[test]
    fn test_principal_subtotal() {
        let line = Principal::LineItem {
            quantity: dec!(10),
            rate: dec!(100),
        };
        assert_eq!(line.subtotal(), Some(dec!(1000)));
        assert_eq!(Principal::Flat(dec!(2500)).subtotal(), Some(dec!(2500)));
    }

    #[test]
    fn test_principal_subtotal_overflow_is_none() {
        let line = Principal::LineItem {
            quantity: Decimal::MAX,
            rate: dec!(2),
        };
        assert_eq!(line.subtotal(), None);
    }
}
