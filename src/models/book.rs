//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book availability status
pub const BOOK_STATUS_BORROWABLE: i16 = 1;
pub const BOOK_STATUS_UNAVAILABLE: i16 = 0;

/// Maximum number of copies accepted for one title
pub const MAX_COPIES: i32 = 2000;

/// Catalog entry. `amount` is the number of copies currently on the shelf,
/// `total_amount` the number the library owns; the difference is out on loan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub book_id: String,
    pub book_name: String,
    pub press: Option<String>,
    pub author: String,
    pub isbn: Option<String>,
    pub amount: i32,
    /// Shelf position, unique across the catalog
    pub position: String,
    pub total_amount: i32,
    pub borrowed_times: i32,
    pub status: i16,
}

/// Book list/search query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Substring match on the book name
    pub name: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Book name is required"))]
    pub book_name: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    pub press: Option<String>,
    pub isbn: Option<String>,
    #[validate(range(min = 1, message = "Amount must be at least 1"))]
    pub amount: i32,
    #[validate(length(min = 1, message = "Position is required"))]
    pub position: String,
}

/// Update book request. Each provided field is applied; `stock_delta`
/// adjusts current and total stock together in one transaction.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Book name must not be empty"))]
    pub book_name: Option<String>,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: Option<String>,
    #[validate(length(min = 1, message = "Position must not be empty"))]
    pub position: Option<String>,
    pub press: Option<String>,
    pub isbn: Option<String>,
    /// 1 = borrowable, 0 = not borrowable
    pub status: Option<i16>,
    pub stock_delta: Option<i32>,
}

impl UpdateBook {
    pub fn is_empty(&self) -> bool {
        self.book_name.is_none()
            && self.author.is_none()
            && self.position.is_none()
            && self.press.is_none()
            && self.isbn.is_none()
            && self.status.is_none()
            && self.stock_delta.is_none()
    }
}
