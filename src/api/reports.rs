//! Comment moderation endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::report::{CreateReport, ManageReport, Report, ReportDetails},
};

use super::AuthenticatedUser;

/// File a report against a comment
#[utoipa::path(
    post,
    path = "/reports",
    tag = "reports",
    security(("bearer_auth" = [])),
    request_body = CreateReport,
    responses(
        (status = 201, description = "Report filed", body = Report),
        (status = 404, description = "Comment not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Already reported", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateReport>,
) -> AppResult<(StatusCode, Json<Report>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state
        .services
        .reports
        .create(&claims.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// All reports, pending ones first
#[utoipa::path(
    get,
    path = "/reports",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All reports", body = [ReportDetails]),
        (status = 403, description = "Admin only", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_reports(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ReportDetails>>> {
    claims.require_admin()?;

    let reports = state.services.reports.list_all().await?;
    Ok(Json(reports))
}

/// Reports filed by the caller
#[utoipa::path(
    get,
    path = "/reports/mine",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's reports", body = [ReportDetails]),
        (status = 403, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn my_reports(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ReportDetails>>> {
    let reports = state
        .services
        .reports
        .list_for_reader(&claims.user_id)
        .await?;
    Ok(Json(reports))
}

/// Resolve a pending report
#[utoipa::path(
    post,
    path = "/reports/manage",
    tag = "reports",
    security(("bearer_auth" = [])),
    request_body = ManageReport,
    responses(
        (status = 200, description = "Report resolved", body = Report),
        (status = 404, description = "Report not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Already handled", body = crate::error::ErrorResponse)
    )
)]
pub async fn manage_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<ManageReport>,
) -> AppResult<Json<Report>> {
    claims.require_admin()?;

    let report = state.services.reports.manage(request).await?;
    Ok(Json(report))
}
