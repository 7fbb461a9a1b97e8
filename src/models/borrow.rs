//! Borrow record model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Borrow lifecycle: 0 open, 1 returned
pub const BORROW_STATUS_OPEN: i16 = 0;
pub const BORROW_STATUS_RETURNED: i16 = 1;

/// Default loan period in days; a renewal extends by the same span
pub const LOAN_PERIOD_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrow {
    pub borrow_id: String,
    pub reader_id: String,
    pub book_id: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    /// Number of renewals taken; at most one is allowed
    pub renew_times: i16,
    pub status: i16,
}

/// Borrow row joined with book and reader display fields
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowDetails {
    pub borrow_id: String,
    pub reader_id: String,
    pub book_id: String,
    pub reader_name: String,
    pub reader_phone: String,
    pub book_name: String,
    pub author: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub renew_times: i16,
    pub status: i16,
}

impl BorrowDetails {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == BORROW_STATUS_OPEN && self.due_date < now
    }
}

/// Create borrow request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBorrow {
    #[validate(length(min = 1, message = "Reader id is required"))]
    pub reader_id: String,
    #[validate(length(min = 1, message = "Book id is required"))]
    pub book_id: String,
}

/// Borrow search parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BorrowQuery {
    /// Substring match on the reader name
    pub reader_name: Option<String>,
    /// Substring match on the book name
    pub book_name: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
