//! `SeaORM` Entity for invoices table.
//!
//! All invoice variants share one table with a `kind` discriminator.
//! The money columns (`subtotal`, `vat_amount`, `gross_amount`,
//! `received_amount`, `outstanding_amount`, `status`) are derived and
//! rewritten in full on every mutation, never edited in place.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{InvoiceKind, InvoiceStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: InvoiceKind,
    #[sea_orm(unique)]
    pub invoice_number: String,
    pub customer_id: Option<Uuid>,
    pub invoice_date: Date,
    pub due_date: Date,
    /// Line-item quantity (sales invoices only).
    pub quantity: Option<Decimal>,
    /// Line-item unit rate (sales invoices only).
    pub unit_rate: Option<Decimal>,
    /// Flat principal amount (non-sales variants).
    pub principal_amount: Option<Decimal>,
    pub subtotal: Decimal,
    pub vat_percentage: Decimal,
    pub vat_amount: Decimal,
    /// Flat discount entered on the invoice itself.
    pub discount: Decimal,
    /// Running sum of per-payment discounts.
    pub discount_total: Decimal,
    pub gross_amount: Decimal,
    pub received_amount: Decimal,
    /// Stored raw (`gross - received`), may be negative on legacy rows.
    pub outstanding_amount: Decimal,
    /// PKR per AED, dual-currency variants only.
    pub conversion_rate: Option<Decimal>,
    pub gross_aed: Option<Decimal>,
    pub received_aed: Option<Decimal>,
    pub outstanding_aed: Option<Decimal>,
    pub status: InvoiceStatus,
    pub last_payment_date: Option<DateTimeWithTimeZone>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
