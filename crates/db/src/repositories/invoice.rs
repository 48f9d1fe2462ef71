//! Invoice repository for database operations.
//!
//! All mutations follow the same discipline: validate against business rules
//! first, then recompute every derived field from authoritative inputs inside
//! a transaction. Derived columns are rewritten in full, never patched.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use taajir_core::invoice::{
    ComputeInput, CreateInvoiceInput, CustomerInfo, InvoiceError, InvoiceKind, InvoiceService,
    InvoiceStatus, Principal, compute_invoice_aggregates, format_invoice_number,
};
use taajir_core::payment::{PaymentRecord, PaymentService, PaymentTotals};

use super::{SequenceRepository, db_err};
use crate::entities::{customers, invoices, payments, sea_orm_active_enums as db_enums};

/// Filter options for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Filter by derived status.
    pub status: Option<InvoiceStatus>,
    /// Filter by customer.
    pub customer_id: Option<Uuid>,
    /// Invoice date range start.
    pub date_from: Option<NaiveDate>,
    /// Invoice date range end.
    pub date_to: Option<NaiveDate>,
    /// Substring match on the invoice number.
    pub search: Option<String>,
}

/// Input for replacing an invoice's authoritative fields.
///
/// The variant and invoice number are fixed at creation; everything the
/// computation rule reads can be edited and triggers a full recompute.
#[derive(Debug, Clone)]
pub struct UpdateInvoiceInput {
    /// New principal amount or line items.
    pub principal: Principal,
    /// New VAT percentage (sales only).
    pub vat_percentage: Decimal,
    /// New flat discount (sales only).
    pub discount: Decimal,
    /// New invoice date.
    pub invoice_date: NaiveDate,
    /// New due date.
    pub due_date: NaiveDate,
    /// New customer reference.
    pub customer_id: Option<Uuid>,
    /// New conversion rate for dual-currency variants.
    pub conversion_rate: Option<Decimal>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Reconstructs the principal from the stored columns.
pub(crate) fn principal_of(model: &invoices::Model) -> Principal {
    match (model.quantity, model.unit_rate) {
        (Some(quantity), Some(rate)) => Principal::LineItem { quantity, rate },
        _ => Principal::Flat(model.principal_amount.unwrap_or(Decimal::ZERO)),
    }
}

/// Maps payment rows into the records the recomputation rule consumes.
pub(crate) fn payment_records(models: &[payments::Model]) -> Vec<PaymentRecord> {
    models
        .iter()
        .map(|p| PaymentRecord {
            id: p.id,
            amount: p.amount,
            discount: p.discount,
            paid_at: p.paid_at.with_timezone(&Utc),
        })
        .collect()
}

/// Recomputes every derived column from the model's authoritative fields and
/// the re-summed payment totals, returning the active model to persist.
///
/// The effective discount fed to the computation rule is the flat invoice
/// discount plus the accumulated per-payment discounts, which keeps
/// `gross == max(0, subtotal + vat - discount)` and
/// `outstanding == gross - received` exact at all times.
pub(crate) fn recompute_into(
    model: &invoices::Model,
    totals: &PaymentTotals,
    today: NaiveDate,
) -> Result<invoices::ActiveModel, InvoiceError> {
    let kind: InvoiceKind = model.kind.into();
    let input = ComputeInput {
        principal: principal_of(model),
        vat_percentage: model.vat_percentage,
        discount: model.discount + totals.discount_total,
        received_amount: totals.received_amount,
        due_date: model.due_date,
        conversion_rate: model.conversion_rate,
    };
    let agg = compute_invoice_aggregates(kind, &input, today)?;

    let mut active: invoices::ActiveModel = model.clone().into();
    active.subtotal = Set(agg.subtotal);
    active.vat_amount = Set(agg.vat_amount);
    active.gross_amount = Set(agg.gross_amount);
    active.discount_total = Set(totals.discount_total);
    active.received_amount = Set(totals.received_amount);
    active.outstanding_amount = Set(agg.outstanding_amount);
    active.status = Set(agg.status.into());
    active.last_payment_date = Set(totals.last_payment_date.map(Into::into));

    if let Some(mirror) = agg.aed_mirror {
        active.gross_aed = Set(Some(mirror.gross_aed));
        active.received_aed = Set(Some(mirror.received_aed));
        active.outstanding_aed = Set(Some(mirror.outstanding_aed));
    } else {
        active.gross_aed = Set(None);
        active.received_aed = Set(None);
        active.outstanding_aed = Set(None);
    }

    active.updated_at = Set(Utc::now().into());
    Ok(active)
}

/// Maps an insert failure onto the duplicate-number error when the unique
/// constraint on the invoice number fired.
///
/// The pre-insert collision check is advisory only; under concurrency the
/// constraint is the authoritative arbiter and its violation must surface as
/// the same conflict the check reports.
pub(crate) fn map_insert_err(err: DbErr, invoice_number: &str) -> InvoiceError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        InvoiceError::DuplicateInvoiceNumber(invoice_number.to_string())
    } else {
        db_err(err)
    }
}

/// Fetches an invoice row under an exclusive lock within a transaction.
pub(crate) async fn lock_invoice(
    txn: &DatabaseTransaction,
    id: Uuid,
) -> Result<invoices::Model, InvoiceError> {
    invoices::Entity::find_by_id(id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(InvoiceError::InvoiceNotFound(id))
}

/// Re-sums the full payment set of an invoice within a transaction.
pub(crate) async fn sum_payments(
    txn: &DatabaseTransaction,
    invoice_id: Uuid,
) -> Result<PaymentTotals, InvoiceError> {
    let rows = payments::Entity::find()
        .filter(payments::Column::InvoiceId.eq(invoice_id))
        .all(txn)
        .await
        .map_err(db_err)?;

    Ok(PaymentService::summarize_payments(&payment_records(&rows)))
}

/// Invoice repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new invoice.
    ///
    /// Validation happens up front against prefetched state; the sequence
    /// increment and the insert then share one transaction so an aborted
    /// insert cannot leave a numbered-but-missing invoice visible.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the number collides, or the
    /// database rejects the insert.
    pub async fn create(
        &self,
        input: CreateInvoiceInput,
        created_by: Uuid,
    ) -> Result<invoices::Model, InvoiceError> {
        let number_taken = match input.invoice_number.as_deref() {
            Some(number) => self.number_exists(number).await?,
            None => false,
        };
        let customer = self.fetch_customer_info(input.customer_id).await?;

        InvoiceService::validate_invoice(
            &input,
            |_| Ok(number_taken),
            |id| customer.clone().ok_or(InvoiceError::CustomerNotFound(id)),
        )?;

        let variant = input.kind.variant();
        let txn = self.db.begin().await.map_err(db_err)?;

        let invoice_number = match input.invoice_number.clone() {
            Some(number) => number,
            None => {
                let sequence = SequenceRepository::next_value(&txn, variant.counter_key)
                    .await
                    .map_err(db_err)?;
                format_invoice_number(variant.number_prefix, sequence)
            }
        };

        let today = Utc::now().date_naive();
        let compute = ComputeInput {
            principal: input.principal,
            vat_percentage: input.vat_percentage,
            discount: input.discount,
            received_amount: Decimal::ZERO,
            due_date: input.due_date,
            conversion_rate: input.conversion_rate,
        };
        let agg = compute_invoice_aggregates(input.kind, &compute, today)?;

        let (quantity, unit_rate, principal_amount) = match input.principal {
            Principal::LineItem { quantity, rate } => (Some(quantity), Some(rate), None),
            Principal::Flat(amount) => (None, None, Some(amount)),
        };

        let (gross_aed, received_aed, outstanding_aed) = match agg.aed_mirror {
            Some(m) => (
                Some(m.gross_aed),
                Some(m.received_aed),
                Some(m.outstanding_aed),
            ),
            None => (None, None, None),
        };

        let now = Utc::now().into();
        let invoice = invoices::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(input.kind.into()),
            invoice_number: Set(invoice_number.clone()),
            customer_id: Set(input.customer_id),
            invoice_date: Set(input.invoice_date),
            due_date: Set(input.due_date),
            quantity: Set(quantity),
            unit_rate: Set(unit_rate),
            principal_amount: Set(principal_amount),
            subtotal: Set(agg.subtotal),
            vat_percentage: Set(input.vat_percentage),
            vat_amount: Set(agg.vat_amount),
            discount: Set(input.discount),
            discount_total: Set(Decimal::ZERO),
            gross_amount: Set(agg.gross_amount),
            received_amount: Set(Decimal::ZERO),
            outstanding_amount: Set(agg.outstanding_amount),
            conversion_rate: Set(input.conversion_rate),
            gross_aed: Set(gross_aed),
            received_aed: Set(received_aed),
            outstanding_aed: Set(outstanding_aed),
            status: Set(agg.status.into()),
            last_payment_date: Set(None),
            notes: Set(None),
            created_by: Set(created_by),
            updated_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = invoice
            .insert(&txn)
            .await
            .map_err(|e| map_insert_err(e, &invoice_number))?;
        txn.commit().await.map_err(db_err)?;

        Ok(created)
    }

    /// Finds an invoice by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<invoices::Model>, DbErr> {
        invoices::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds an invoice together with its payments, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_payments(
        &self,
        id: Uuid,
    ) -> Result<Option<(invoices::Model, Vec<payments::Model>)>, DbErr> {
        let Some(invoice) = invoices::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let payment_rows = payments::Entity::find()
            .filter(payments::Column::InvoiceId.eq(id))
            .order_by_asc(payments::Column::PaidAt)
            .all(&self.db)
            .await?;

        Ok(Some((invoice, payment_rows)))
    }

    /// Lists invoices of one variant, newest first, with optional filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        kind: InvoiceKind,
        filter: &InvoiceFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<invoices::Model>, u64), DbErr> {
        let query = Self::filtered(Some(kind), filter);
        let paginator = query.paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total))
    }

    /// Lists every invoice matching the filter across all variants.
    ///
    /// Used by the report endpoints, which export the full result set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(
        &self,
        kind: Option<InvoiceKind>,
        filter: &InvoiceFilter,
    ) -> Result<Vec<invoices::Model>, DbErr> {
        Self::filtered(kind, filter).all(&self.db).await
    }

    fn filtered(
        kind: Option<InvoiceKind>,
        filter: &InvoiceFilter,
    ) -> sea_orm::Select<invoices::Entity> {
        let mut query = invoices::Entity::find();

        if let Some(kind) = kind {
            let db_kind: db_enums::InvoiceKind = kind.into();
            query = query.filter(invoices::Column::Kind.eq(db_kind));
        }
        if let Some(status) = filter.status {
            let db_status: db_enums::InvoiceStatus = status.into();
            query = query.filter(invoices::Column::Status.eq(db_status));
        }
        if let Some(customer_id) = filter.customer_id {
            query = query.filter(invoices::Column::CustomerId.eq(customer_id));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(invoices::Column::InvoiceDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(invoices::Column::InvoiceDate.lte(to));
        }
        if let Some(needle) = filter.search.as_deref() {
            query = query.filter(invoices::Column::InvoiceNumber.contains(needle));
        }

        query
            .order_by_desc(invoices::Column::InvoiceDate)
            .order_by_desc(invoices::Column::CreatedAt)
    }

    /// Replaces an invoice's authoritative fields and recomputes everything.
    ///
    /// The invoice row stays locked while the payment set is re-summed, so a
    /// concurrent payment cannot interleave with the recompute.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice is missing, validation fails, or the
    /// database rejects the update.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateInvoiceInput,
        updated_by: Uuid,
    ) -> Result<invoices::Model, InvoiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let existing = lock_invoice(&txn, id).await?;
        let kind: InvoiceKind = existing.kind.into();

        let customer = self.fetch_customer_info(input.customer_id).await?;
        let validation_input = CreateInvoiceInput {
            kind,
            invoice_number: None,
            principal: input.principal,
            vat_percentage: input.vat_percentage,
            discount: input.discount,
            invoice_date: input.invoice_date,
            due_date: input.due_date,
            customer_id: input.customer_id,
            conversion_rate: input.conversion_rate,
        };
        InvoiceService::validate_invoice(
            &validation_input,
            |_| Ok(false),
            |cid| customer.clone().ok_or(InvoiceError::CustomerNotFound(cid)),
        )?;

        let (quantity, unit_rate, principal_amount) = match input.principal {
            Principal::LineItem { quantity, rate } => (Some(quantity), Some(rate), None),
            Principal::Flat(amount) => (None, None, Some(amount)),
        };

        // Apply the new authoritative fields before recomputing, so the
        // recompute reads the edited values rather than the stored ones.
        let updated = invoices::Model {
            quantity,
            unit_rate,
            principal_amount,
            vat_percentage: input.vat_percentage,
            discount: input.discount,
            invoice_date: input.invoice_date,
            due_date: input.due_date,
            customer_id: input.customer_id,
            conversion_rate: input.conversion_rate,
            notes: input.notes.clone(),
            ..existing
        };

        let totals = sum_payments(&txn, id).await?;
        let today = Utc::now().date_naive();
        let mut active = recompute_into(&updated, &totals, today)?;
        active.updated_by = Set(Some(updated_by));

        let saved = active.update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        Ok(saved)
    }

    /// Deletes an invoice; its payments and ledger rows cascade away with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice does not exist or the delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<(), InvoiceError> {
        let result = invoices::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(InvoiceError::InvoiceNotFound(id));
        }

        Ok(())
    }

    async fn number_exists(&self, number: &str) -> Result<bool, InvoiceError> {
        let count = invoices::Entity::find()
            .filter(invoices::Column::InvoiceNumber.eq(number))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn fetch_customer_info(
        &self,
        customer_id: Option<Uuid>,
    ) -> Result<Option<CustomerInfo>, InvoiceError> {
        let Some(id) = customer_id else {
            return Ok(None);
        };

        let customer = customers::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(InvoiceError::CustomerNotFound(id))?;

        Ok(Some(CustomerInfo {
            id: customer.id,
            name: customer.name,
            trn: customer.trn,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn freight_model() -> invoices::Model {
        let now = Utc::now().into();
        invoices::Model {
            id: Uuid::new_v4(),
            kind: db_enums::InvoiceKind::Freight,
            invoice_number: "FRT-000007".to_string(),
            customer_id: None,
            invoice_date: date(2026, 8, 1),
            due_date: date(2026, 9, 1),
            quantity: None,
            unit_rate: None,
            principal_amount: Some(dec!(10000)),
            subtotal: Decimal::ZERO,
            vat_percentage: Decimal::ZERO,
            vat_amount: Decimal::ZERO,
            discount: Decimal::ZERO,
            discount_total: Decimal::ZERO,
            gross_amount: Decimal::ZERO,
            received_amount: Decimal::ZERO,
            outstanding_amount: Decimal::ZERO,
            conversion_rate: Some(dec!(80)),
            gross_aed: None,
            received_aed: None,
            outstanding_aed: None,
            status: db_enums::InvoiceStatus::Unpaid,
            last_payment_date: None,
            notes: None,
            created_by: Uuid::new_v4(),
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sales_model() -> invoices::Model {
        invoices::Model {
            kind: db_enums::InvoiceKind::Sales,
            invoice_number: "INV-000001".to_string(),
            quantity: Some(dec!(10)),
            unit_rate: Some(dec!(100)),
            principal_amount: None,
            vat_percentage: dec!(5),
            discount: dec!(100),
            conversion_rate: None,
            ..freight_model()
        }
    }

    #[test]
    fn test_principal_reconstruction() {
        assert_eq!(
            principal_of(&sales_model()),
            Principal::LineItem {
                quantity: dec!(10),
                rate: dec!(100),
            }
        );
        assert_eq!(principal_of(&freight_model()), Principal::Flat(dec!(10000)));

        // A row with neither line item nor flat amount falls back to zero.
        let mut empty = freight_model();
        empty.principal_amount = None;
        assert_eq!(principal_of(&empty), Principal::Flat(Decimal::ZERO));
    }

    #[test]
    fn test_payment_record_mapping() {
        let paid_at = Utc.with_ymd_and_hms(2026, 8, 10, 9, 30, 0).unwrap();
        let row = payments::Model {
            id: Uuid::new_v4(),
            invoice_id: Uuid::new_v4(),
            amount: dec!(4000),
            discount: dec!(50),
            payment_type: db_enums::PaymentType::Partial,
            payment_method: db_enums::PaymentMethod::Cash,
            reference: None,
            notes: None,
            paid_at: paid_at.into(),
            created_by: Uuid::new_v4(),
            created_at: paid_at.into(),
        };

        let records = payment_records(&[row]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, dec!(4000));
        assert_eq!(records[0].discount, dec!(50));
        assert_eq!(records[0].paid_at, paid_at);
    }

    #[test]
    fn test_recompute_rewrites_derived_columns() {
        let model = freight_model();
        let paid_at = Utc.with_ymd_and_hms(2026, 8, 10, 9, 30, 0).unwrap();
        let totals = PaymentTotals {
            received_amount: dec!(4000),
            discount_total: Decimal::ZERO,
            last_payment_date: Some(paid_at),
        };

        let active = recompute_into(&model, &totals, date(2026, 8, 15)).unwrap();

        assert_eq!(active.subtotal.clone().unwrap(), dec!(10000));
        assert_eq!(active.gross_amount.clone().unwrap(), dec!(10000));
        assert_eq!(active.received_amount.clone().unwrap(), dec!(4000));
        assert_eq!(active.outstanding_amount.clone().unwrap(), dec!(6000));
        assert_eq!(
            active.status.clone().unwrap(),
            db_enums::InvoiceStatus::PartiallyPaid
        );
        assert_eq!(active.gross_aed.clone().unwrap(), Some(dec!(125.00)));
        assert_eq!(active.received_aed.clone().unwrap(), Some(dec!(50.00)));
        assert_eq!(active.outstanding_aed.clone().unwrap(), Some(dec!(75.00)));
        assert!(active.last_payment_date.clone().unwrap().is_some());
    }

    #[test]
    fn test_recompute_folds_payment_discounts_into_effective_discount() {
        let model = sales_model();
        let totals = PaymentTotals {
            received_amount: dec!(800),
            discount_total: dec!(150),
            last_payment_date: Some(Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap()),
        };

        // subtotal 1000, vat 50, discount 100 flat + 150 from payments
        // -> gross 800, received 800 -> outstanding 0, paid.
        let active = recompute_into(&model, &totals, date(2026, 8, 21)).unwrap();

        assert_eq!(active.gross_amount.clone().unwrap(), dec!(800));
        assert_eq!(active.discount_total.clone().unwrap(), dec!(150));
        assert_eq!(active.outstanding_amount.clone().unwrap(), Decimal::ZERO);
        assert_eq!(active.status.clone().unwrap(), db_enums::InvoiceStatus::Paid);
        assert_eq!(active.gross_aed.clone().unwrap(), None);
    }

    #[test]
    fn test_non_unique_insert_errors_stay_database_errors() {
        let err = map_insert_err(
            DbErr::Custom("connection reset".to_string()),
            "FRT-000042",
        );
        assert!(matches!(err, InvoiceError::Database(_)));
    }

    #[test]
    fn test_recompute_with_no_payments_clears_payment_fields() {
        let model = {
            let mut m = freight_model();
            m.received_amount = dec!(4000);
            m.last_payment_date = Some(Utc::now().into());
            m
        };

        let active = recompute_into(&model, &PaymentTotals::empty(), date(2026, 8, 15)).unwrap();

        assert_eq!(active.received_amount.clone().unwrap(), Decimal::ZERO);
        assert_eq!(active.outstanding_amount.clone().unwrap(), dec!(10000));
        assert!(active.last_payment_date.clone().unwrap().is_none());
        assert_eq!(
            active.status.clone().unwrap(),
            db_enums::InvoiceStatus::Unpaid
        );
    }
}
