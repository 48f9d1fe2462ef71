//! Payment repository for database operations.
//!
//! Every payment mutation runs inside a transaction holding an exclusive row
//! lock on the parent invoice. The guard check and the recompute both happen
//! under that lock, so two concurrent payments serialize instead of racing
//! past the overpayment limit.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use taajir_core::invoice::{InvoiceError, InvoiceKind};
use taajir_core::payment::{PaymentMethod, PaymentService, PaymentType};

use super::db_err;
use super::invoice::{lock_invoice, recompute_into, sum_payments};
use crate::entities::{daily_ledger_entries, invoices, payments};

/// Input for recording a payment against an invoice.
#[derive(Debug, Clone)]
pub struct AddPaymentInput {
    /// Amount received.
    pub amount: Decimal,
    /// Per-payment discount (sales invoices only).
    pub discount: Decimal,
    /// Caller-asserted partial/full label; does not drive status.
    pub payment_type: PaymentType,
    /// How the money moved.
    pub payment_method: PaymentMethod,
    /// External reference, e.g. a bank transaction ID.
    pub reference: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the payment was made; defaults to now.
    pub paid_at: Option<DateTime<Utc>>,
}

/// Payment repository for ledger operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a payment and recomputes the invoice under one row lock.
    ///
    /// Sales invoice payments additionally feed the daily cash/bank ledger,
    /// landing on the side implied by the payment method.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is missing, the payment fails a guard
    /// (already paid, empty, overpayment, unsupported discount), or the
    /// database rejects a write.
    pub async fn add_payment(
        &self,
        invoice_id: Uuid,
        input: AddPaymentInput,
        created_by: Uuid,
    ) -> Result<(payments::Model, invoices::Model), InvoiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let invoice = lock_invoice(&txn, invoice_id).await?;
        let kind: InvoiceKind = invoice.kind.into();

        PaymentService::validate_add_payment(
            &invoice.invoice_number,
            invoice.outstanding_amount,
            input.amount,
            input.discount,
            kind.variant().has_discount,
        )?;

        let paid_at = input.paid_at.unwrap_or_else(Utc::now);
        let now = Utc::now().into();
        let payment = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice_id),
            amount: Set(input.amount),
            discount: Set(input.discount),
            payment_type: Set(input.payment_type.into()),
            payment_method: Set(input.payment_method.into()),
            reference: Set(input.reference.clone()),
            notes: Set(input.notes.clone()),
            paid_at: Set(paid_at.into()),
            created_by: Set(created_by),
            created_at: Set(now),
        };
        let payment = payment.insert(&txn).await.map_err(db_err)?;

        let totals = sum_payments(&txn, invoice_id).await?;
        let today = Utc::now().date_naive();
        let active = recompute_into(&invoice, &totals, today)?;
        let updated_invoice = active.update(&txn).await.map_err(db_err)?;

        if kind == InvoiceKind::Sales && input.amount > Decimal::ZERO {
            Self::record_ledger_entry(&txn, &payment, &updated_invoice.invoice_number).await?;
        }

        txn.commit().await.map_err(db_err)?;

        Ok((payment, updated_invoice))
    }

    /// Deletes a payment and recomputes the invoice from the remaining set.
    ///
    /// The remaining payments are re-summed in full, never subtracted as a
    /// delta, so independently edited discounts or historical rows cannot
    /// leave the cached figures drifting. Daily ledger rows produced by the
    /// payment cascade away with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice or payment is missing, the payment
    /// belongs to a different invoice, or the database rejects a write.
    pub async fn delete_payment(
        &self,
        invoice_id: Uuid,
        payment_id: Uuid,
    ) -> Result<invoices::Model, InvoiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let invoice = lock_invoice(&txn, invoice_id).await?;

        let payment = payments::Entity::find_by_id(payment_id)
            .filter(payments::Column::InvoiceId.eq(invoice_id))
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(InvoiceError::PaymentNotFound(payment_id))?;

        payments::Entity::delete_by_id(payment.id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let totals = sum_payments(&txn, invoice_id).await?;
        let today = Utc::now().date_naive();
        let active = recompute_into(&invoice, &totals, today)?;
        let updated_invoice = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(updated_invoice)
    }

    /// Lists an invoice's payments, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_invoice(&self, invoice_id: Uuid) -> Result<Vec<payments::Model>, DbErr> {
        payments::Entity::find()
            .filter(payments::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(payments::Column::PaidAt)
            .all(&self.db)
            .await
    }

    /// Lists the daily cash/bank ledger entries for one date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn daily_ledger(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<daily_ledger_entries::Model>, DbErr> {
        daily_ledger_entries::Entity::find()
            .filter(daily_ledger_entries::Column::EntryDate.eq(date))
            .order_by_asc(daily_ledger_entries::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    async fn record_ledger_entry(
        txn: &DatabaseTransaction,
        payment: &payments::Model,
        invoice_number: &str,
    ) -> Result<(), InvoiceError> {
        let method: PaymentMethod = payment.payment_method.into();
        let entry = daily_ledger_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            entry_date: Set(payment.paid_at.date_naive()),
            side: Set(method.ledger_side().into()),
            amount: Set(payment.amount),
            description: Set(format!("Payment received for invoice {invoice_number}")),
            payment_id: Set(Some(payment.id)),
            payment_method: Set(payment.payment_method),
            created_at: Set(Utc::now().into()),
        };
        entry.insert(txn).await.map_err(db_err)?;

        Ok(())
    }
}
