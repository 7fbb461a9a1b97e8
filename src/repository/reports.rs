//! Comment reports repository for database operations

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::report::{Report, ReportDetails},
};

#[derive(Clone)]
pub struct ReportsRepository {
    pool: Pool<Postgres>,
}

impl ReportsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get report by ID
    pub async fn get_by_id(&self, report_id: &str) -> AppResult<Report> {
        sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE report_id = $1")
            .bind(report_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report with id {} not found", report_id)))
    }

    /// Has this reader already reported this comment
    pub async fn exists(&self, reader_id: &str, comment_id: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reports WHERE reader_id = $1 AND comment_id = $2)",
        )
        .bind(reader_id)
        .bind(comment_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Insert a new report
    pub async fn create(&self, report: &Report) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reports (report_id, comment_id, reader_id, reason, date, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&report.report_id)
        .bind(&report.comment_id)
        .bind(&report.reader_id)
        .bind(&report.reason)
        .bind(report.date)
        .bind(report.status)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Reports joined with the offending comment and its author; pass a
    /// reader id to restrict to that reporter's filings
    pub async fn list_details(&self, reader_id: Option<&str>) -> AppResult<Vec<ReportDetails>> {
        let filter = if reader_id.is_some() {
            "WHERE rp.reader_id = $1"
        } else {
            ""
        };
        let query = format!(
            r#"
            SELECT rp.report_id, rp.comment_id, rp.reader_id, r.reader_name,
                   c.content AS comment_content, a.reader_name AS comment_author,
                   rp.date, rp.reason, rp.status
            FROM reports rp
            JOIN readers r ON rp.reader_id = r.reader_id
            JOIN comments c ON rp.comment_id = c.comment_id
            JOIN readers a ON c.reader_id = a.reader_id
            {}
            ORDER BY rp.status, rp.date
            "#,
            filter
        );

        let mut builder = sqlx::query_as::<_, ReportDetails>(&query);
        if let Some(reader_id) = reader_id {
            builder = builder.bind(reader_id);
        }
        let reports = builder.fetch_all(&self.pool).await?;
        Ok(reports)
    }

    /// Drop all reports filed by a reader
    pub async fn delete_by_reader(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reader_id: &str,
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM reports WHERE reader_id = $1")
            .bind(reader_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Record the moderation outcome
    pub async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        report_id: &str,
        status: i16,
    ) -> AppResult<()> {
        sqlx::query("UPDATE reports SET status = $2 WHERE report_id = $1")
            .bind(report_id)
            .bind(status)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
