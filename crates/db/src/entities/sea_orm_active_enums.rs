//! Postgres enum mappings.
//!
//! Conversions to and from the core domain enums live here so repositories
//! never match on raw database strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use taajir_core::invoice::{InvoiceKind as CoreKind, InvoiceStatus as CoreStatus};
use taajir_core::payment::{
    LedgerSide as CoreLedgerSide, PaymentMethod as CorePaymentMethod,
    PaymentType as CorePaymentType,
};

/// Invoice variant discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_kind")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceKind {
    /// Sales invoice.
    #[sea_orm(string_value = "sales")]
    Sales,
    /// Freight invoice (PKR).
    #[sea_orm(string_value = "freight")]
    Freight,
    /// Pakistan transport invoice (PKR).
    #[sea_orm(string_value = "transport")]
    Transport,
    /// Dubai transport invoice (AED).
    #[sea_orm(string_value = "dubai_transport")]
    DubaiTransport,
    /// Dubai clearance invoice (AED).
    #[sea_orm(string_value = "dubai_clearance")]
    DubaiClearance,
}

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// No payment received, not past due.
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    /// Some payment received.
    #[sea_orm(string_value = "partially_paid")]
    PartiallyPaid,
    /// Fully settled.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Nothing received, past due.
    #[sea_orm(string_value = "overdue")]
    Overdue,
}

/// Caller-asserted payment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_type")]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Partial payment.
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Asserted full settlement.
    #[sea_orm(string_value = "full")]
    Full,
}

/// How the money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash payment.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Bank transfer.
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    /// Check.
    #[sea_orm(string_value = "check")]
    Check,
    /// Card payment.
    #[sea_orm(string_value = "card")]
    Card,
    /// Anything else.
    #[sea_orm(string_value = "other")]
    Other,
}

/// Daily ledger side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ledger_side")]
#[serde(rename_all = "snake_case")]
pub enum LedgerSide {
    /// Physical cash.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Through a bank account.
    #[sea_orm(string_value = "bank")]
    Bank,
}

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// May delete invoices and payments after re-authentication.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// May create and edit invoices and add payments.
    #[sea_orm(string_value = "operator")]
    Operator,
}

impl From<CoreKind> for InvoiceKind {
    fn from(kind: CoreKind) -> Self {
        match kind {
            CoreKind::Sales => Self::Sales,
            CoreKind::Freight => Self::Freight,
            CoreKind::Transport => Self::Transport,
            CoreKind::DubaiTransport => Self::DubaiTransport,
            CoreKind::DubaiClearance => Self::DubaiClearance,
        }
    }
}

impl From<InvoiceKind> for CoreKind {
    fn from(kind: InvoiceKind) -> Self {
        match kind {
            InvoiceKind::Sales => Self::Sales,
            InvoiceKind::Freight => Self::Freight,
            InvoiceKind::Transport => Self::Transport,
            InvoiceKind::DubaiTransport => Self::DubaiTransport,
            InvoiceKind::DubaiClearance => Self::DubaiClearance,
        }
    }
}

impl From<CoreStatus> for InvoiceStatus {
    fn from(status: CoreStatus) -> Self {
        match status {
            CoreStatus::Unpaid => Self::Unpaid,
            CoreStatus::PartiallyPaid => Self::PartiallyPaid,
            CoreStatus::Paid => Self::Paid,
            CoreStatus::Overdue => Self::Overdue,
        }
    }
}

impl From<InvoiceStatus> for CoreStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Unpaid => Self::Unpaid,
            InvoiceStatus::PartiallyPaid => Self::PartiallyPaid,
            InvoiceStatus::Paid => Self::Paid,
            InvoiceStatus::Overdue => Self::Overdue,
        }
    }
}

impl From<CorePaymentType> for PaymentType {
    fn from(pt: CorePaymentType) -> Self {
        match pt {
            CorePaymentType::Partial => Self::Partial,
            CorePaymentType::Full => Self::Full,
        }
    }
}

impl From<CorePaymentMethod> for PaymentMethod {
    fn from(pm: CorePaymentMethod) -> Self {
        match pm {
            CorePaymentMethod::Cash => Self::Cash,
            CorePaymentMethod::BankTransfer => Self::BankTransfer,
            CorePaymentMethod::Check => Self::Check,
            CorePaymentMethod::Card => Self::Card,
            CorePaymentMethod::Other => Self::Other,
        }
    }
}

impl From<PaymentMethod> for CorePaymentMethod {
    fn from(pm: PaymentMethod) -> Self {
        match pm {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::BankTransfer => Self::BankTransfer,
            PaymentMethod::Check => Self::Check,
            PaymentMethod::Card => Self::Card,
            PaymentMethod::Other => Self::Other,
        }
    }
}

impl From<CoreLedgerSide> for LedgerSide {
    fn from(side: CoreLedgerSide) -> Self {
        match side {
            CoreLedgerSide::Cash => Self::Cash,
            CoreLedgerSide::Bank => Self::Bank,
        }
    }
}
