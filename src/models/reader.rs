//! Reader and admin models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Library member
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reader {
    pub reader_id: String,
    pub reader_name: String,
    pub email: Option<String>,
    pub phone: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    /// Lifetime number of borrows
    pub borrow_times: i32,
    /// Lifetime number of overdue returns
    pub ovd_times: i32,
}

/// Administrator account. The `phone` column doubles as the login name;
/// admin logins are not validated against the mobile-number pattern.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub id: i32,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Reader registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterReader {
    #[validate(length(min = 1, message = "Name is required"))]
    pub reader_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(equal = 11, message = "Phone must be 11 digits"))]
    pub phone: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Reader list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ReaderQuery {
    /// Substring match on the reader name
    pub name: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
