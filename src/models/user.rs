//! User claims and borrower types.
//!
//! Account management lives in the identity provider; this server only
//! verifies the tokens it issues and reads the borrower records loans
//! reference.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

/// Permission required to renew loans and to manage author/book records.
/// A single capability gates both, a shortcut the catalog has always had.
pub const PERM_CAN_MARK_RETURNED: &str = "catalog.can_mark_returned";

/// Short borrower representation for loan listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrower {
    pub id: i32,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Require the librarian capability gating renewals and record admin
    pub fn require_mark_returned(&self) -> Result<(), AppError> {
        if self.has_permission(PERM_CAN_MARK_RETURNED) {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Insufficient rights to manage loans and records".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(permissions: Vec<String>) -> UserClaims {
        UserClaims {
            sub: "librarian".to_string(),
            user_id: 1,
            permissions,
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        }
    }

    #[test]
    fn token_round_trip() {
        let claims = claims(vec![PERM_CAN_MARK_RETURNED.to_string()]);
        let token = claims.create_token("test-secret").unwrap();
        let parsed = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(parsed.user_id, 1);
        assert!(parsed.has_permission(PERM_CAN_MARK_RETURNED));
    }

    #[test]
    fn token_with_wrong_secret_fails() {
        let claims = claims(vec![]);
        let token = claims.create_token("test-secret").unwrap();
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn missing_permission_is_authorization_error() {
        let claims = claims(vec!["catalog.view".to_string()]);
        assert!(matches!(
            claims.require_mark_returned(),
            Err(AppError::Authorization(_))
        ));
    }
}
