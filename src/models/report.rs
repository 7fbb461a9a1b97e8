//! Comment report (moderation) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Report lifecycle: 0 pending, 1 upheld (comment hidden), 2 dismissed
pub const REPORT_STATUS_PENDING: i16 = 0;
pub const REPORT_STATUS_UPHELD: i16 = 1;
pub const REPORT_STATUS_DISMISSED: i16 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Report {
    pub report_id: String,
    pub comment_id: String,
    /// Reader who filed the report
    pub reader_id: String,
    pub date: DateTime<Utc>,
    pub reason: String,
    pub status: i16,
}

/// Report row joined with the reported comment and display names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReportDetails {
    pub report_id: String,
    pub comment_id: String,
    pub reader_id: String,
    pub reader_name: String,
    pub comment_content: String,
    pub comment_author: String,
    pub date: DateTime<Utc>,
    pub reason: String,
    pub status: i16,
}

/// Create report request; the reporter is taken from the verified claims
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReport {
    #[validate(length(min = 1, message = "Comment id is required"))]
    pub comment_id: String,
    #[validate(length(min = 1, message = "Reason must not be empty"))]
    pub reason: String,
}

/// Moderation decision for a pending report
#[derive(Debug, Deserialize, ToSchema)]
pub struct ManageReport {
    pub report_id: String,
    /// true hides the reported comment, false keeps it
    pub uphold: bool,
}
