//! Token claims and issued-token metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Identity fields supplied by a login flow
#[derive(Debug, Clone)]
pub struct ClaimsElement {
    pub user_id: String,
    pub user_name: String,
    pub is_admin: bool,
}

/// Payload embedded in a signed token. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub user_name: String,
    pub is_admin: bool,
    /// Registered subject, duplicate of `user_id`
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    /// Build claims issued at `now`, valid immediately, expiring after `ttl_seconds`
    pub fn new(element: &ClaimsElement, now: DateTime<Utc>, ttl_seconds: u64) -> Self {
        let issued_at = now.timestamp();
        Self {
            user_id: element.user_id.clone(),
            user_name: element.user_name.clone(),
            is_admin: element.is_admin,
            sub: element.user_id.clone(),
            iat: issued_at,
            nbf: issued_at,
            exp: issued_at + ttl_seconds as i64,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            ))
        }
    }
}

/// Issued-token descriptor returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenInfo {
    pub access_token: String,
    pub token_type: String,
    /// Unix timestamp at which the token expires
    pub expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element() -> ClaimsElement {
        ClaimsElement {
            user_id: "42".to_string(),
            user_name: "13800000000".to_string(),
            is_admin: true,
        }
    }

    #[test]
    fn new_claims_duplicate_subject_and_window() {
        let now = Utc::now();
        let claims = Claims::new(&element(), now, 7200);

        assert_eq!(claims.sub, claims.user_id);
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(claims.exp, claims.iat + 7200);
    }

    #[test]
    fn require_admin_rejects_readers() {
        let now = Utc::now();
        let mut reader = element();
        reader.is_admin = false;

        assert!(Claims::new(&element(), now, 60).require_admin().is_ok());
        assert!(Claims::new(&reader, now, 60).require_admin().is_err());
    }
}
