//! Invoice routes, shared by all five variants.
//!
//! The variant is a path segment (`/invoices/sales`, `/invoices/freight`,
//! ...) so every variant gets the same handlers; the variant descriptor in
//! the core crate decides which fields participate in the computation.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::response::{internal_error_response, invoice_error_response, money_json};
use crate::AppState;
use taajir_core::auth::verify_password;
use taajir_core::invoice::{
    CreateInvoiceInput, InvoiceError, InvoiceKind, InvoiceStatus, Principal,
};
use taajir_db::repositories::invoice::{InvoiceFilter, InvoiceRepository, UpdateInvoiceInput};
use taajir_db::UserRepository;
use taajir_shared::types::{PageRequest, PageResponse};

/// Creates the invoice routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices/{kind}", post(create_invoice))
        .route("/invoices/{kind}", get(list_invoices))
        .route("/invoices/{kind}/{id}", get(get_invoice))
        .route("/invoices/{kind}/{id}", put(update_invoice))
        .route("/invoices/{kind}/{id}", delete(delete_invoice))
}

/// Request body for creating an invoice.
///
/// Sales invoices carry `quantity` and `unit_rate`; the other variants carry
/// a flat `amount`. The server rejects a body that doesn't match the variant.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    /// Explicit invoice number; auto-generated when omitted.
    pub invoice_number: Option<String>,
    /// Line-item quantity (sales).
    pub quantity: Option<Decimal>,
    /// Line-item unit rate (sales).
    pub unit_rate: Option<Decimal>,
    /// Flat principal amount (non-sales variants).
    pub amount: Option<Decimal>,
    /// VAT percentage (sales).
    #[serde(default)]
    pub vat_percentage: Decimal,
    /// Flat discount (sales).
    #[serde(default)]
    pub discount: Decimal,
    /// Invoice date (YYYY-MM-DD).
    pub invoice_date: NaiveDate,
    /// Due date (YYYY-MM-DD).
    pub due_date: NaiveDate,
    /// Customer reference.
    pub customer_id: Option<Uuid>,
    /// PKR per AED rate for dual-currency variants.
    pub conversion_rate: Option<Decimal>,
}

/// Request body for replacing an invoice's editable fields.
#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceRequest {
    /// Line-item quantity (sales).
    pub quantity: Option<Decimal>,
    /// Line-item unit rate (sales).
    pub unit_rate: Option<Decimal>,
    /// Flat principal amount (non-sales variants).
    pub amount: Option<Decimal>,
    /// VAT percentage (sales).
    #[serde(default)]
    pub vat_percentage: Decimal,
    /// Flat discount (sales).
    #[serde(default)]
    pub discount: Decimal,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Customer reference.
    pub customer_id: Option<Uuid>,
    /// Conversion rate for dual-currency variants.
    pub conversion_rate: Option<Decimal>,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Request body for privileged deletion: the admin re-enters their password.
#[derive(Debug, Deserialize)]
pub struct ReauthRequest {
    /// The admin's current password.
    pub password: String,
}

/// Query parameters for listing invoices.
#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    /// Filter by status (`unpaid`, `partially_paid`, `paid`, `overdue`).
    pub status: Option<String>,
    /// Filter by customer.
    pub customer_id: Option<Uuid>,
    /// Invoice date range start.
    pub date_from: Option<NaiveDate>,
    /// Invoice date range end.
    pub date_to: Option<NaiveDate>,
    /// Substring match on the invoice number.
    pub search: Option<String>,
    /// Pagination.
    #[serde(flatten)]
    pub page: PageRequest,
}

/// Parses the variant path segment, or produces the 400 response.
pub(crate) fn parse_kind(kind: &str) -> Result<InvoiceKind, Response> {
    kind.parse::<InvoiceKind>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_invoice_kind",
                "message": format!("Unknown invoice kind '{kind}'")
            })),
        )
            .into_response()
    })
}

/// Parses a status filter string.
pub(crate) fn parse_status(status: &str) -> Option<InvoiceStatus> {
    match status {
        "unpaid" => Some(InvoiceStatus::Unpaid),
        "partially_paid" => Some(InvoiceStatus::PartiallyPaid),
        "paid" => Some(InvoiceStatus::Paid),
        "overdue" => Some(InvoiceStatus::Overdue),
        _ => None,
    }
}

/// Verifies the caller is an admin and re-entered the right password.
///
/// Role alone is not enough for destructive operations; failure is opaque
/// and does not reveal which part of the check passed.
pub(crate) async fn reauthenticate(
    state: &AppState,
    auth: &AuthUser,
    password: &str,
) -> Result<(), Response> {
    if !auth.is_admin() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "Admin role is required for this action"
            })),
        )
            .into_response());
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let user = match user_repo.find_by_id(auth.user_id()).await {
        Ok(Some(u)) => u,
        Ok(None) => return Err(invoice_error_response(&InvoiceError::InvalidCredentials)),
        Err(e) => return Err(internal_error_response(&e)),
    };

    match verify_password(password, &user.password_hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(invoice_error_response(&InvoiceError::InvalidCredentials)),
        Err(e) => Err(internal_error_response(&e)),
    }
}

/// Resolves the request's principal fields against the variant.
fn resolve_principal(
    kind: InvoiceKind,
    quantity: Option<Decimal>,
    unit_rate: Option<Decimal>,
    amount: Option<Decimal>,
) -> Result<Principal, Response> {
    if kind == InvoiceKind::Sales {
        match (quantity, unit_rate) {
            (Some(quantity), Some(rate)) => Ok(Principal::LineItem { quantity, rate }),
            _ => Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "missing_line_item",
                    "message": "Sales invoices require quantity and unit_rate"
                })),
            )
                .into_response()),
        }
    } else {
        match amount {
            Some(amount) => Ok(Principal::Flat(amount)),
            None => Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "missing_amount",
                    "message": "This invoice type requires a flat amount"
                })),
            )
                .into_response()),
        }
    }
}

/// POST /invoices/{kind} - Create an invoice of one variant.
async fn create_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(kind): Path<String>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    let principal = match resolve_principal(
        kind,
        payload.quantity,
        payload.unit_rate,
        payload.amount,
    ) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    let input = CreateInvoiceInput {
        kind,
        invoice_number: payload.invoice_number,
        principal,
        vat_percentage: payload.vat_percentage,
        discount: payload.discount,
        invoice_date: payload.invoice_date,
        due_date: payload.due_date,
        customer_id: payload.customer_id,
        conversion_rate: payload.conversion_rate,
    };

    match repo.create(input, auth.user_id()).await {
        Ok(invoice) => {
            info!(
                invoice_id = %invoice.id,
                invoice_number = %invoice.invoice_number,
                kind = %kind,
                "Invoice created"
            );
            (StatusCode::CREATED, money_json(&invoice)).into_response()
        }
        Err(e) => invoice_error_response(&e),
    }
}

/// GET /invoices/{kind} - List invoices of one variant.
async fn list_invoices(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ListInvoicesQuery>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp,
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
        search: query.search,
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    let page = query.page.page.max(1);
    let per_page = query.page.clamped_per_page();

    match repo
        .list(kind, &filter, u64::from(page), u64::from(per_page))
        .await
    {
        Ok((invoices, total)) => {
            money_json(&PageResponse::new(invoices, page, per_page, total)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list invoices");
            internal_error_response(&e)
        }
    }
}

/// GET /invoices/{kind}/{id} - Fetch one invoice with its payments.
async fn get_invoice(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, Uuid)>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.find_with_payments(id).await {
        Ok(Some((invoice, payments))) if InvoiceKind::from(invoice.kind) == kind => {
            money_json(&json!({
                "invoice": invoice,
                "payments": payments
            }))
            .into_response()
        }
        Ok(_) => invoice_error_response(&InvoiceError::InvoiceNotFound(id)),
        Err(e) => internal_error_response(&e),
    }
}

/// PUT /invoices/{kind}/{id} - Replace an invoice's editable fields.
///
/// Every derived field is recomputed from scratch; the stored aggregates are
/// never patched in place.
async fn update_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((kind, id)): Path<(String, Uuid)>,
    Json(payload): Json<UpdateInvoiceRequest>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    let principal = match resolve_principal(
        kind,
        payload.quantity,
        payload.unit_rate,
        payload.amount,
    ) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let repo = InvoiceRepository::new((*state.db).clone());

    // The path variant must match the stored one before any mutation.
    match repo.find_by_id(id).await {
        Ok(Some(existing)) if InvoiceKind::from(existing.kind) == kind => {}
        Ok(_) => return invoice_error_response(&InvoiceError::InvoiceNotFound(id)),
        Err(e) => return internal_error_response(&e),
    }

    let input = UpdateInvoiceInput {
        principal,
        vat_percentage: payload.vat_percentage,
        discount: payload.discount,
        invoice_date: payload.invoice_date,
        due_date: payload.due_date,
        customer_id: payload.customer_id,
        conversion_rate: payload.conversion_rate,
        notes: payload.notes,
    };

    match repo.update(id, input, auth.user_id()).await {
        Ok(invoice) => {
            info!(invoice_id = %invoice.id, "Invoice updated");
            money_json(&invoice).into_response()
        }
        Err(e) => invoice_error_response(&e),
    }
}

/// DELETE /invoices/{kind}/{id} - Delete an invoice and its payments.
///
/// Requires the admin role and a re-entered password in the request body.
async fn delete_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((kind, id)): Path<(String, Uuid)>,
    Json(payload): Json<ReauthRequest>,
) -> impl IntoResponse {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    if let Err(resp) = reauthenticate(&state, &auth, &payload.password).await {
        return resp;
    }

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(existing)) if InvoiceKind::from(existing.kind) == kind => {}
        Ok(_) => return invoice_error_response(&InvoiceError::InvoiceNotFound(id)),
        Err(e) => return internal_error_response(&e),
    }

    match repo.delete(id).await {
        Ok(()) => {
            info!(invoice_id = %id, deleted_by = %auth.user_id(), "Invoice deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => invoice_error_response(&e),
    }
}
