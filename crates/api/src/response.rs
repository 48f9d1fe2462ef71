//! Response shaping for money payloads and domain errors.
//!
//! Every endpoint that returns money fields funnels its payload through
//! [`money_json`], which applies the ceiling-to-2-decimals presentation
//! policy. Internal storage keeps full precision; only the serialized
//! response is rounded.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;

use taajir_core::invoice::InvoiceError;
use taajir_core::rounding::round_money_payload;

/// Serializes a payload and rounds every money leaf up to 2 decimals.
///
/// Falls back to an empty object if serialization fails, which cannot happen
/// for the DTO types this crate feeds it.
pub fn money_json<T: Serialize>(payload: &T) -> Json<Value> {
    let mut value = serde_json::to_value(payload).unwrap_or_else(|_| json!({}));
    round_money_payload(&mut value);
    Json(value)
}

/// Maps a domain error onto its HTTP response.
///
/// The status code and machine-readable error code come from the error
/// itself; database errors are logged and returned opaque.
pub fn invoice_error_response(err: &InvoiceError) -> Response {
    if let InvoiceError::Database(detail) = err {
        error!(error = %detail, "Database error");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response();
    }

    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string()
        })),
    )
        .into_response()
}

/// The generic 500 response for infrastructure errors outside the domain
/// error space.
pub fn internal_error_response<E: std::fmt::Display>(err: &E) -> Response {
    error!(error = %err, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
