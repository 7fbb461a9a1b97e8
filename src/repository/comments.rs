//! Comments repository for database operations

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::comment::{Comment, CommentDetails, COMMENT_STATUS_VISIBLE},
};

#[derive(Clone)]
pub struct CommentsRepository {
    pool: Pool<Postgres>,
}

impl CommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List comments joined with reader and book display fields,
    /// most recent first
    pub async fn list_details(&self, only_visible: bool) -> AppResult<Vec<CommentDetails>> {
        let visibility = if only_visible {
            format!("WHERE c.status = {}", COMMENT_STATUS_VISIBLE)
        } else {
            String::new()
        };

        let query = format!(
            r#"
            SELECT c.comment_id, c.reader_id, c.book_id, r.reader_name, r.email,
                   b.book_name, c.date, c.content, c.praise, c.status
            FROM comments c
            JOIN readers r ON c.reader_id = r.reader_id
            JOIN books b ON c.book_id = b.book_id
            {}
            ORDER BY c.date DESC
            "#,
            visibility
        );

        let comments = sqlx::query_as::<_, CommentDetails>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    /// Number of visible comments
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE status = $1")
            .bind(COMMENT_STATUS_VISIBLE)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Get comment by ID
    pub async fn get_by_id(&self, comment_id: &str) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE comment_id = $1")
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Comment with id {} not found", comment_id))
            })
    }

    /// Insert a new comment
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        comment: &Comment,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (comment_id, reader_id, book_id, date, content, praise, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&comment.comment_id)
        .bind(&comment.reader_id)
        .bind(&comment.book_id)
        .bind(comment.date)
        .bind(&comment.content)
        .bind(comment.praise)
        .bind(comment.status)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Bump the praise counter
    pub async fn increment_praise(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        comment_id: &str,
    ) -> AppResult<()> {
        sqlx::query("UPDATE comments SET praise = praise + 1 WHERE comment_id = $1")
            .bind(comment_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Drop all comments written by a reader. Reports filed against those
    /// comments go with them.
    pub async fn delete_by_reader(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reader_id: &str,
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM comments WHERE reader_id = $1")
            .bind(reader_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Set moderation status
    pub async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        comment_id: &str,
        status: i16,
    ) -> AppResult<()> {
        sqlx::query("UPDATE comments SET status = $2 WHERE comment_id = $1")
            .bind(comment_id)
            .bind(status)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
