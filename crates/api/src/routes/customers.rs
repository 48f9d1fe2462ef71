//! Customer management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use taajir_db::repositories::customer::{
    CreateCustomerInput, CustomerRepository, UpdateCustomerInput,
};
use taajir_shared::types::{PageRequest, PageResponse};

/// Creates the customer routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", post(create_customer))
        .route("/customers", get(list_customers))
        .route("/customers/{id}", get(get_customer))
        .route("/customers/{id}", put(update_customer))
}

/// Request body for creating a customer.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    /// Display name.
    pub name: String,
    /// UAE Tax Registration Number.
    pub trn: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// Request body for updating a customer.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateCustomerRequest {
    /// New display name.
    pub name: Option<String>,
    /// New TRN.
    pub trn: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New address.
    pub address: Option<String>,
}

/// Query parameters for listing customers.
#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    /// Substring match on the customer name.
    pub search: Option<String>,
    /// Pagination.
    #[serde(flatten)]
    pub page: PageRequest,
}

/// POST /customers - Register a customer.
async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_name",
                "message": "Customer name cannot be empty"
            })),
        )
            .into_response();
    }

    let repo = CustomerRepository::new((*state.db).clone());
    let input = CreateCustomerInput {
        name: payload.name,
        trn: payload.trn,
        phone: payload.phone,
        address: payload.address,
    };

    match repo.create(input).await {
        Ok(customer) => {
            info!(customer_id = %customer.id, "Customer created");
            (StatusCode::CREATED, Json(json!(customer))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create customer");
            internal_error()
        }
    }
}

/// GET /customers - List customers with optional name search.
async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListCustomersQuery>,
) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());
    let page = query.page.page.max(1);
    let per_page = query.page.clamped_per_page();

    match repo
        .list(query.search.as_deref(), u64::from(page), u64::from(per_page))
        .await
    {
        Ok((customers, total)) => (
            StatusCode::OK,
            Json(json!(PageResponse::new(customers, page, per_page, total))),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list customers");
            internal_error()
        }
    }
}

/// GET /customers/{id} - Fetch one customer.
async fn get_customer(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(Some(customer)) => (StatusCode::OK, Json(json!(customer))).into_response(),
        Ok(None) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch customer");
            internal_error()
        }
    }
}

/// PUT /customers/{id} - Update a customer.
async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> impl IntoResponse {
    let repo = CustomerRepository::new((*state.db).clone());
    let input = UpdateCustomerInput {
        name: payload.name,
        trn: payload.trn,
        phone: payload.phone,
        address: payload.address,
    };

    match repo.update(id, input).await {
        Ok(Some(customer)) => {
            info!(customer_id = %customer.id, "Customer updated");
            (StatusCode::OK, Json(json!(customer))).into_response()
        }
        Ok(None) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update customer");
            internal_error()
        }
    }
}

fn not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": "Customer not found"
        })),
    )
        .into_response()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
