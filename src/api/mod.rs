//! API handlers for Libris REST endpoints

pub mod auth;
pub mod books;
pub mod borrows;
pub mod comments;
pub mod health;
pub mod openapi;
pub mod readers;
pub mod reports;
pub mod reserves;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{error::AppError, AppState};

/// Extractor gating every protected endpoint on a verified, still-active
/// session token.
///
/// The full `Authorization` header value is the token; clients send the
/// compact token string without a scheme prefix. After signature and expiry
/// verification the session store is consulted, so a logout or a newer login
/// rejects the token even before its expiry.
pub struct AuthenticatedUser(pub crate::auth::Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");
        if token.is_empty() {
            return Err(AppError::Authorization("authorization failed".to_string()));
        }

        let claims = state.services.sessions.parse(token)?;
        state.services.sessions.check_active(&claims, token).await?;

        if claims.user_id.is_empty() || claims.user_name.is_empty() {
            return Err(AppError::Authorization("authorization failed".to_string()));
        }

        Ok(AuthenticatedUser(claims))
    }
}
