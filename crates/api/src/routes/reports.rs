//! Reporting endpoints: invoice export (JSON or CSV) and the daily ledger.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::response::{internal_error_response, money_json};
use crate::routes::invoices::parse_status;
use crate::AppState;
use taajir_core::invoice::{InvoiceKind, InvoiceStatus};
use taajir_core::rounding::ceil_2dp;
use taajir_db::entities::{daily_ledger_entries, invoices, sea_orm_active_enums as db_enums};
use taajir_db::repositories::invoice::{InvoiceFilter, InvoiceRepository};
use taajir_db::repositories::payment::PaymentRepository;

/// Creates the report routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/invoices", get(invoice_report))
        .route("/reports/daily-ledger", get(daily_ledger_report))
}

/// Query parameters for the invoice report.
#[derive(Debug, Deserialize)]
pub struct InvoiceReportQuery {
    /// Restrict to one variant; all variants when omitted.
    pub kind: Option<String>,
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by customer.
    pub customer_id: Option<Uuid>,
    /// Invoice date range start.
    pub date_from: Option<NaiveDate>,
    /// Invoice date range end.
    pub date_to: Option<NaiveDate>,
    /// Output format: `json` (default) or `csv`.
    pub format: Option<String>,
}

/// Query parameters for the daily ledger report.
#[derive(Debug, Deserialize)]
pub struct DailyLedgerQuery {
    /// The ledger day (YYYY-MM-DD).
    pub date: NaiveDate,
}

/// GET /reports/invoices - Export invoices across variants.
async fn invoice_report(
    State(state): State<AppState>,
    Query(query): Query<InvoiceReportQuery>,
) -> impl IntoResponse {
    let kind = match query.kind.as_deref() {
        Some(raw) => match raw.parse::<InvoiceKind>() {
            Ok(k) => Some(k),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_invoice_kind",
                        "message": format!("Unknown invoice kind '{raw}'")
                    })),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let status = match query.status.as_deref() {
        Some(raw) => match parse_status(raw) {
            Some(s) => Some(s),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_status",
                        "message": "Status must be one of: unpaid, partially_paid, paid, overdue"
                    })),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let filter = InvoiceFilter {
        status,
        customer_id: query.customer_id,
        date_from: query.date_from,
        date_to: query.date_to,
        search: None,
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    let rows = match repo.list_all(kind, &filter).await {
        Ok(rows) => rows,
        Err(e) => return internal_error_response(&e),
    };

    if query.format.as_deref() == Some("csv") {
        return csv_response(&rows);
    }

    money_json(&json!({
        "invoices": rows,
        "total": rows.len()
    }))
    .into_response()
}

/// GET /reports/daily-ledger - The cash/bank day book for one date.
async fn daily_ledger_report(
    State(state): State<AppState>,
    Query(query): Query<DailyLedgerQuery>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());
    let entries = match repo.daily_ledger(query.date).await {
        Ok(entries) => entries,
        Err(e) => return internal_error_response(&e),
    };

    let (cash_total, bank_total) = ledger_totals(&entries);

    money_json(&json!({
        "date": query.date,
        "entries": entries,
        "cash_total": cash_total,
        "bank_total": bank_total
    }))
    .into_response()
}

fn ledger_totals(entries: &[daily_ledger_entries::Model]) -> (Decimal, Decimal) {
    let mut cash = Decimal::ZERO;
    let mut bank = Decimal::ZERO;
    for entry in entries {
        match entry.side {
            db_enums::LedgerSide::Cash => cash += entry.amount,
            db_enums::LedgerSide::Bank => bank += entry.amount,
        }
    }
    (cash, bank)
}

/// Serializes the invoice rows as CSV with presentation-rounded money fields.
fn csv_response(rows: &[invoices::Model]) -> axum::response::Response {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = [
        "invoice_number",
        "kind",
        "status",
        "invoice_date",
        "due_date",
        "subtotal",
        "vat_amount",
        "discount",
        "gross_amount",
        "received_amount",
        "outstanding_amount",
        "conversion_rate",
        "gross_aed",
        "outstanding_aed",
    ];
    if let Err(e) = writer.write_record(header) {
        return internal_error_response(&e);
    }

    for row in rows {
        let kind: InvoiceKind = row.kind.into();
        let status: InvoiceStatus = row.status.into();
        let record = [
            row.invoice_number.clone(),
            kind.to_string(),
            status.to_string(),
            row.invoice_date.to_string(),
            row.due_date.to_string(),
            money(row.subtotal),
            money(row.vat_amount),
            money(row.discount + row.discount_total),
            money(row.gross_amount),
            money(row.received_amount),
            money(row.outstanding_amount),
            row.conversion_rate.map(money).unwrap_or_default(),
            row.gross_aed.map(money).unwrap_or_default(),
            row.outstanding_aed.map(money).unwrap_or_default(),
        ];
        if let Err(e) = writer.write_record(&record) {
            return internal_error_response(&e);
        }
    }

    let bytes = match writer.into_inner() {
        Ok(bytes) => bytes,
        Err(e) => return internal_error_response(&e),
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"invoices.csv\"",
            ),
        ],
        bytes,
    )
        .into_response()
}

fn money(value: Decimal) -> String {
    ceil_2dp(value).to_string()
}
