//! Book comment endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::comment::{Comment, CommentDetails, CreateComment},
};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct CommentList {
    pub items: Vec<CommentDetails>,
    /// Number of visible comments; for admins `items` may contain more
    /// because hidden comments are included
    pub total: i64,
}

/// List comments. Admins also see hidden ones.
#[utoipa::path(
    get,
    path = "/comments",
    tag = "comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of comments", body = CommentList),
        (status = 403, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_comments(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<CommentList>> {
    let items = state.services.comments.list(claims.is_admin()).await?;
    let total = state.services.comments.count().await?;
    Ok(Json(CommentList { items, total }))
}

/// Post a comment on a book
#[utoipa::path(
    post,
    path = "/comments",
    tag = "comments",
    security(("bearer_auth" = [])),
    request_body = CreateComment,
    responses(
        (status = 201, description = "Comment posted", body = Comment),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_comment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let comment = state
        .services
        .comments
        .create(&claims.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Praise (like) a comment
#[utoipa::path(
    post,
    path = "/comments/{id}/praise",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Praise recorded"),
        (status = 404, description = "Comment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn praise_comment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.comments.praise(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
