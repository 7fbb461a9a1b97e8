//! Reservation model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reserve {
    pub reserve_id: String,
    pub reader_id: String,
    pub book_id: String,
    pub date: DateTime<Utc>,
}

/// Reservation row joined with book and reader display fields
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReserveDetails {
    pub reserve_id: String,
    pub reader_id: String,
    pub book_id: String,
    pub reader_name: String,
    pub book_name: String,
    pub author: String,
    pub date: DateTime<Utc>,
}

/// Create reservation request; the reader is taken from the verified claims
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReserve {
    #[validate(length(min = 1, message = "Book id is required"))]
    pub book_id: String,
}
