//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    auth::TokenInfo,
    error::{AppError, AppResult},
    models::reader::{Reader, RegisterReader},
};

use super::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Reader phone number, or the admin login name
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Log in against the administrator table instead of the reader table
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: TokenInfo,
    /// Present for reader logins only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reader: Option<Reader>,
}

#[derive(Serialize, ToSchema)]
pub struct LogoutResponse {
    /// Whether a session record existed and was removed
    pub revoked: bool,
}

#[derive(Serialize, ToSchema)]
pub struct UserInfo {
    pub user_id: String,
    pub user_name: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reader: Option<Reader>,
}

/// Log in as reader or administrator
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = if request.is_admin {
        let token = state
            .services
            .users
            .login_admin(&request.phone, &request.password)
            .await?;
        LoginResponse { token, reader: None }
    } else {
        let (token, reader) = state
            .services
            .users
            .login_reader(&request.phone, &request.password)
            .await?;
        LoginResponse {
            token,
            reader: Some(reader),
        }
    };

    Ok(Json(response))
}

/// Register a new reader account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterReader,
    responses(
        (status = 201, description = "Reader registered", body = Reader),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Phone already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterReader>,
) -> AppResult<(StatusCode, Json<Reader>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let reader = state.services.users.register(request).await?;
    Ok((StatusCode::CREATED, Json(reader)))
}

/// Log out, revoking the caller's session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session revoked", body = LogoutResponse),
        (status = 403, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn logout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<LogoutResponse>> {
    let revoked = state.services.users.logout(&claims.user_id).await?;
    Ok(Json(LogoutResponse { revoked }))
}

/// Current caller's identity
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller identity", body = UserInfo),
        (status = 403, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserInfo>> {
    let reader = if claims.is_admin() {
        None
    } else {
        Some(state.services.users.get_reader(&claims.user_id).await?)
    };

    Ok(Json(UserInfo {
        user_id: claims.user_id,
        user_name: claims.user_name,
        is_admin: claims.is_admin,
        reader,
    }))
}
