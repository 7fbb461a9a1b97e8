//! Reader management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::reader::{Reader, ReaderQuery},
};

use super::{books::PaginatedResponse, AuthenticatedUser};

/// List readers with search and pagination
#[utoipa::path(
    get,
    path = "/readers",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(ReaderQuery),
    responses(
        (status = 200, description = "List of readers", body = PaginatedResponse<Reader>),
        (status = 403, description = "Admin only", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_readers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ReaderQuery>,
) -> AppResult<Json<PaginatedResponse<Reader>>> {
    claims.require_admin()?;

    let (items, total) = state.services.users.list_readers(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// The reader with the most lifetime borrows
#[utoipa::path(
    get,
    path = "/readers/top",
    tag = "readers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Top borrower, null when no readers exist", body = Reader),
        (status = 403, description = "Admin only", body = crate::error::ErrorResponse)
    )
)]
pub async fn top_borrower(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Option<Reader>>> {
    claims.require_admin()?;

    let reader = state.services.users.top_borrower().await?;
    Ok(Json(reader))
}

/// Get reader details by ID. Readers may only look up themselves.
#[utoipa::path(
    get,
    path = "/readers/{id}",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reader ID")),
    responses(
        (status = 200, description = "Reader details", body = Reader),
        (status = 404, description = "Reader not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_reader(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Reader>> {
    if !claims.is_admin() && claims.user_id != id {
        return Err(AppError::Authorization(
            "Cannot access another reader's account".to_string(),
        ));
    }

    let reader = state.services.users.get_reader(&id).await?;
    Ok(Json(reader))
}

/// Delete a reader account
#[utoipa::path(
    delete,
    path = "/readers/{id}",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reader ID")),
    responses(
        (status = 204, description = "Reader deleted"),
        (status = 404, description = "Reader not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Reader still has open loans", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_reader(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.users.delete_reader(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
