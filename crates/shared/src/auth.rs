//! Authentication claim types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User roles recognized by the backend.
///
/// Admins may delete invoices and payments (after re-entering their
/// password); operators may create and edit.
pub const ROLE_ADMIN: &str = "admin";
/// Regular operator role: create/edit invoices and add payments.
pub const ROLE_OPERATOR: &str = "operator";

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// User's role (`admin` or `operator`).
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns true if the claims carry the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Token returned after successful authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Access token (short-lived).
    pub access_token: String,
    /// Access token expiration in seconds.
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_roundtrip_fields() {
        let user_id = Uuid::new_v4();
        let expires = Utc::now() + chrono::Duration::minutes(30);
        let claims = Claims::new(user_id, ROLE_ADMIN, expires);

        assert_eq!(claims.user_id(), user_id);
        assert!(claims.is_admin());
        assert_eq!(claims.exp, expires.timestamp());
    }

    #[test]
    fn test_operator_is_not_admin() {
        let claims = Claims::new(Uuid::new_v4(), ROLE_OPERATOR, Utc::now());
        assert!(!claims.is_admin());
    }
}
