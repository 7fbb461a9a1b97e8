//! Reservation endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::reserve::{CreateReserve, Reserve, ReserveDetails},
};

use super::AuthenticatedUser;

/// All reservations
#[utoipa::path(
    get,
    path = "/reserves",
    tag = "reserves",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of reservations", body = [ReserveDetails]),
        (status = 403, description = "Admin only", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_reserves(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ReserveDetails>>> {
    claims.require_admin()?;

    let reserves = state.services.reserves.list_all().await?;
    Ok(Json(reserves))
}

/// The caller's reservations
#[utoipa::path(
    get,
    path = "/reserves/mine",
    tag = "reserves",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reservations", body = [ReserveDetails]),
        (status = 403, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn my_reserves(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ReserveDetails>>> {
    let reserves = state
        .services
        .reserves
        .list_for_reader(&claims.user_id)
        .await?;
    Ok(Json(reserves))
}

/// Reserve a book
#[utoipa::path(
    post,
    path = "/reserves",
    tag = "reserves",
    security(("bearer_auth" = [])),
    request_body = CreateReserve,
    responses(
        (status = 201, description = "Reservation created", body = Reserve),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Already reserved", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_reserve(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateReserve>,
) -> AppResult<(StatusCode, Json<Reserve>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let reserve = state
        .services
        .reserves
        .create(&claims.user_id, &request.book_id)
        .await?;
    Ok((StatusCode::CREATED, Json(reserve)))
}

/// Cancel the caller's reservation for a book
#[utoipa::path(
    delete,
    path = "/reserves/{book_id}",
    tag = "reserves",
    security(("bearer_auth" = [])),
    params(("book_id" = String, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Reservation cancelled"),
        (status = 404, description = "No reservation for this book", body = crate::error::ErrorResponse)
    )
)]
pub async fn cancel_reserve(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<String>,
) -> AppResult<StatusCode> {
    state
        .services
        .reserves
        .cancel(&claims.user_id, &book_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
