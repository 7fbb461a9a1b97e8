//! Comment moderation service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::{
        comment::COMMENT_STATUS_HIDDEN,
        report::{
            CreateReport, ManageReport, Report, ReportDetails, REPORT_STATUS_DISMISSED,
            REPORT_STATUS_PENDING, REPORT_STATUS_UPHELD,
        },
    },
    repository::Repository,
    utils,
};

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// File a report against a comment. One report per reader and comment.
    pub async fn create(&self, reader_id: &str, request: CreateReport) -> AppResult<Report> {
        self.repository.comments.get_by_id(&request.comment_id).await?;

        if self.repository.reports.exists(reader_id, &request.comment_id).await? {
            return Err(AppError::Conflict(
                "You have already reported this comment".to_string(),
            ));
        }

        let report = Report {
            report_id: utils::next_id(),
            comment_id: request.comment_id,
            reader_id: reader_id.to_string(),
            date: Utc::now(),
            reason: request.reason,
            status: REPORT_STATUS_PENDING,
        };
        self.repository.reports.create(&report).await?;

        Ok(report)
    }

    /// All reports, pending ones first
    pub async fn list_all(&self) -> AppResult<Vec<ReportDetails>> {
        self.repository.reports.list_details(None).await
    }

    /// Reports filed by one reader
    pub async fn list_for_reader(&self, reader_id: &str) -> AppResult<Vec<ReportDetails>> {
        self.repository.reports.list_details(Some(reader_id)).await
    }

    /// Resolve a pending report. Upholding it hides the reported comment,
    /// both changes landing in one transaction.
    pub async fn manage(&self, request: ManageReport) -> AppResult<Report> {
        let report = self.repository.reports.get_by_id(&request.report_id).await?;
        if report.status != REPORT_STATUS_PENDING {
            return Err(AppError::BusinessRule(
                ErrorCode::Failure,
                "This report has already been handled".to_string(),
            ));
        }

        let mut tx = self.repository.pool.begin().await?;
        if request.uphold {
            self.repository
                .comments
                .set_status(&mut tx, &report.comment_id, COMMENT_STATUS_HIDDEN)
                .await?;
            self.repository
                .reports
                .set_status(&mut tx, &report.report_id, REPORT_STATUS_UPHELD)
                .await?;
        } else {
            self.repository
                .reports
                .set_status(&mut tx, &report.report_id, REPORT_STATUS_DISMISSED)
                .await?;
        }
        tx.commit().await?;

        tracing::info!(report_id = %report.report_id, uphold = request.uphold, "report handled");
        self.repository.reports.get_by_id(&report.report_id).await
    }
}
