//! Authentication routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use taajir_core::auth::verify_password;
use taajir_db::UserRepository;
use taajir_shared::auth::{LoginRequest, TokenResponse};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// POST /auth/login - Authenticate a user and return an access token.
///
/// The failure responses are deliberately identical for unknown emails and
/// wrong passwords.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    let role = match user.role {
        taajir_db::entities::sea_orm_active_enums::UserRole::Admin => {
            taajir_shared::auth::ROLE_ADMIN
        }
        taajir_db::entities::sea_orm_active_enums::UserRole::Operator => {
            taajir_shared::auth::ROLE_OPERATOR
        }
    };

    let access_token = match state.jwt_service.generate_access_token(user.id, role) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error();
        }
    };

    info!(user_id = %user.id, "User logged in");

    (
        StatusCode::OK,
        Json(json!(TokenResponse {
            access_token,
            expires_in: state.jwt_service.access_token_expires_in(),
        })),
    )
        .into_response()
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid email or password"
        })),
    )
        .into_response()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred during login"
        })),
    )
        .into_response()
}
