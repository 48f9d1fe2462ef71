//! Payment routes, nested under an invoice.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::response::{internal_error_response, invoice_error_response, money_json};
use crate::routes::invoices::{parse_kind, reauthenticate};
use crate::AppState;
use taajir_core::invoice::{InvoiceError, InvoiceKind};
use taajir_core::payment::{PaymentMethod, PaymentType};
use taajir_db::repositories::invoice::InvoiceRepository;
use taajir_db::repositories::payment::{AddPaymentInput, PaymentRepository};

/// Creates the payment routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices/{kind}/{id}/payments", post(add_payment))
        .route("/invoices/{kind}/{id}/payments", get(list_payments))
        .route(
            "/invoices/{kind}/{id}/payments/{payment_id}",
            delete(delete_payment),
        )
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct AddPaymentRequest {
    /// Amount received.
    pub amount: Decimal,
    /// Per-payment discount (sales invoices only).
    #[serde(default)]
    pub discount: Decimal,
    /// Caller-asserted partial/full label.
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

/// Request body for privileged payment deletion.
#[derive(Debug, Deserialize)]
pub struct DeletePaymentRequest {
    /// The admin's current password.
    pub password: String,
}

/// Resolves the invoice and checks it belongs to the path variant.
async fn resolve_invoice(
    state: &AppState,
    kind: InvoiceKind,
    id: Uuid,
) -> Result<(), axum::response::Response> {
    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(invoice)) if InvoiceKind::from(invoice.kind) == kind => Ok(()),
        Ok(_) => Err(invoice_error_response(&InvoiceError::InvoiceNotFound(id))),
        Err(e) => Err(internal_error_response(&e)),
    }
}

/// POST /invoices/{kind}/{id}/payments - Record a payment.
///
/// The guard chain runs under a row lock on the invoice: already-paid,
/// empty-payment, unsupported discount, and overpayment checks, then a full
/// recompute of the invoice from its payment set.
async fn add_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((kind, id)): Path<(String, Uuid)>,
    Json(payload): Json<AddPaymentRequest>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp,
    };
    if let Err(resp) = resolve_invoice(&state, kind, id).await {
        return resp;
    }

    let repo = PaymentRepository::new((*state.db).clone());
    let input = AddPaymentInput {
        amount: payload.amount,
        discount: payload.discount,
        payment_type: payload.payment_type,
        payment_method: payload.payment_method,
        reference: payload.reference,
        notes: payload.notes,
        paid_at: payload.paid_at,
    };

    match repo.add_payment(id, input, auth.user_id()).await {
        Ok((payment, invoice)) => {
            info!(
                invoice_id = %invoice.id,
                payment_id = %payment.id,
                amount = %payment.amount,
                "Payment recorded"
            );
            (
                StatusCode::CREATED,
                money_json(&json!({
                    "payment": payment,
                    "invoice": invoice
                })),
            )
                .into_response()
        }
        Err(e) => invoice_error_response(&e),
    }
}

/// GET /invoices/{kind}/{id}/payments - List an invoice's payments.
async fn list_payments(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, Uuid)>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp,
    };
    if let Err(resp) = resolve_invoice(&state, kind, id).await {
        return resp;
    }

    let repo = PaymentRepository::new((*state.db).clone());
    match repo.list_for_invoice(id).await {
        Ok(payments) => money_json(&json!({ "payments": payments })).into_response(),
        Err(e) => internal_error_response(&e),
    }
}

/// DELETE /invoices/{kind}/{id}/payments/{payment_id} - Remove a payment.
///
/// Requires the admin role and a re-entered password. The invoice is
/// recomputed from the remaining payment set; ledger rows produced by the
/// payment disappear with it.
async fn delete_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((kind, id, payment_id)): Path<(String, Uuid, Uuid)>,
    Json(payload): Json<DeletePaymentRequest>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    if let Err(resp) = reauthenticate(&state, &auth, &payload.password).await {
        return resp;
    }
    if let Err(resp) = resolve_invoice(&state, kind, id).await {
        return resp;
    }

    let repo = PaymentRepository::new((*state.db).clone());
    match repo.delete_payment(id, payment_id).await {
        Ok(invoice) => {
            info!(
                invoice_id = %invoice.id,
                payment_id = %payment_id,
                deleted_by = %auth.user_id(),
                "Payment deleted"
            );
            money_json(&invoice).into_response()
        }
        Err(e) => invoice_error_response(&e),
    }
}
