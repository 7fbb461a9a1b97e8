//! Comment model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Comment visibility: 1 visible, 0 hidden by moderation
pub const COMMENT_STATUS_VISIBLE: i16 = 1;
pub const COMMENT_STATUS_HIDDEN: i16 = 0;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Comment {
    pub comment_id: String,
    pub reader_id: String,
    pub book_id: String,
    pub date: DateTime<Utc>,
    pub content: String,
    pub praise: i32,
    pub status: i16,
}

/// Comment row joined with reader and book display fields
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CommentDetails {
    pub comment_id: String,
    pub reader_id: String,
    pub book_id: String,
    pub reader_name: String,
    pub email: Option<String>,
    pub book_name: String,
    pub date: DateTime<Utc>,
    pub content: String,
    pub praise: i32,
    pub status: i16,
}

/// Create comment request; the author is taken from the verified claims
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateComment {
    #[validate(length(min = 1, message = "Book id is required"))]
    pub book_id: String,
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
}
