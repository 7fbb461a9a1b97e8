//! Loan endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{Borrow, BorrowDetails, BorrowQuery, CreateBorrow},
};

use super::{books::PaginatedResponse, AuthenticatedUser};

#[derive(Serialize, ToSchema)]
pub struct RemindResponse {
    /// Number of reminder emails sent
    pub sent: usize,
}

/// List loans with search and pagination
#[utoipa::path(
    get,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(BorrowQuery),
    responses(
        (status = 200, description = "List of loans", body = PaginatedResponse<BorrowDetails>),
        (status = 403, description = "Admin only", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<BorrowQuery>,
) -> AppResult<Json<PaginatedResponse<BorrowDetails>>> {
    claims.require_admin()?;

    let (items, total) = state.services.borrows.list(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// The caller's open loans
#[utoipa::path(
    get,
    path = "/borrows/mine",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Open loans", body = [BorrowDetails]),
        (status = 403, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn my_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    let borrows = state
        .services
        .borrows
        .list_open_for_reader(&claims.user_id)
        .await?;
    Ok(Json(borrows))
}

/// Open loans for one reader. Readers may only look up their own.
#[utoipa::path(
    get,
    path = "/readers/{id}/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reader ID")),
    responses(
        (status = 200, description = "Open loans", body = [BorrowDetails]),
        (status = 403, description = "Not authorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn reader_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    if !claims.is_admin() && claims.user_id != id {
        return Err(AppError::Authorization(
            "Cannot access another reader's loans".to_string(),
        ));
    }

    let borrows = state.services.borrows.list_open_for_reader(&id).await?;
    Ok(Json(borrows))
}

/// Check a copy out to a reader
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = CreateBorrow,
    responses(
        (status = 201, description = "Loan created", body = Borrow),
        (status = 404, description = "Reader or book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Book not available", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBorrow>,
) -> AppResult<(StatusCode, Json<Borrow>)> {
    claims.require_admin()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let borrow = state.services.borrows.create(request).await?;
    Ok((StatusCode::CREATED, Json(borrow)))
}

/// Return a borrowed copy
#[utoipa::path(
    post,
    path = "/borrows/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Borrow ID")),
    responses(
        (status = 200, description = "Loan closed", body = Borrow),
        (status = 404, description = "Loan not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Already returned", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Borrow>> {
    claims.require_admin()?;

    let borrow = state.services.borrows.return_book(&id).await?;
    Ok(Json(borrow))
}

/// Renew an open loan
#[utoipa::path(
    post,
    path = "/borrows/{id}/renew",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Borrow ID")),
    responses(
        (status = 200, description = "Loan renewed", body = Borrow),
        (status = 404, description = "Loan not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Renewal not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn renew_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Borrow>> {
    let borrow = state.services.borrows.renew(&id).await?;
    Ok(Json(borrow))
}

/// Delete a closed loan record
#[utoipa::path(
    delete,
    path = "/borrows/{id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Borrow ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Loan not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Loan still open", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.borrows.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Email overdue-loan reminders to affected readers
#[utoipa::path(
    post,
    path = "/borrows/remind",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reminders sent", body = RemindResponse),
        (status = 403, description = "Admin only", body = crate::error::ErrorResponse)
    )
)]
pub async fn remind_overdue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<RemindResponse>> {
    claims.require_admin()?;

    let sent = state.services.borrows.remind_overdue().await?;
    Ok(Json(RemindResponse { sent }))
}
