//! Book comments service

use chrono::Utc;

use crate::{
    error::AppResult,
    models::comment::{Comment, CommentDetails, CreateComment, COMMENT_STATUS_VISIBLE},
    repository::Repository,
    utils,
};

#[derive(Clone)]
pub struct CommentsService {
    repository: Repository,
}

impl CommentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List comments. Admins also see comments hidden by moderation.
    pub async fn list(&self, is_admin: bool) -> AppResult<Vec<CommentDetails>> {
        self.repository.comments.list_details(!is_admin).await
    }

    /// Number of visible comments
    pub async fn count(&self) -> AppResult<i64> {
        self.repository.comments.count().await
    }

    /// Post a comment on a book. The author comes from the verified claims.
    pub async fn create(&self, reader_id: &str, request: CreateComment) -> AppResult<Comment> {
        // Reject dangling book ids up front
        self.repository.books.get_by_id(&request.book_id).await?;

        let comment = Comment {
            comment_id: utils::next_id(),
            reader_id: reader_id.to_string(),
            book_id: request.book_id,
            date: Utc::now(),
            content: request.content,
            praise: 0,
            status: COMMENT_STATUS_VISIBLE,
        };

        let mut tx = self.repository.pool.begin().await?;
        self.repository.comments.create(&mut tx, &comment).await?;
        tx.commit().await?;

        Ok(comment)
    }

    /// Praise (like) a comment
    pub async fn praise(&self, comment_id: &str) -> AppResult<()> {
        self.repository.comments.get_by_id(comment_id).await?;

        let mut tx = self.repository.pool.begin().await?;
        self.repository.comments.increment_praise(&mut tx, comment_id).await?;
        tx.commit().await?;
        Ok(())
    }
}
