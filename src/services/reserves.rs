//! Book reservation service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::reserve::{Reserve, ReserveDetails},
    repository::Repository,
    utils,
};

#[derive(Clone)]
pub struct ReservesService {
    repository: Repository,
}

impl ReservesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Reserve a book for a reader. One reservation per reader and book.
    pub async fn create(&self, reader_id: &str, book_id: &str) -> AppResult<Reserve> {
        self.repository.books.get_by_id(book_id).await?;

        if self.repository.reserves.find_id(reader_id, book_id).await?.is_some() {
            return Err(AppError::Conflict("Book is already reserved".to_string()));
        }

        let reserve = Reserve {
            reserve_id: utils::next_id(),
            reader_id: reader_id.to_string(),
            book_id: book_id.to_string(),
            date: Utc::now(),
        };

        let mut tx = self.repository.pool.begin().await?;
        self.repository.reserves.create(&mut tx, &reserve).await?;
        tx.commit().await?;

        Ok(reserve)
    }

    /// Cancel a reader's reservation for a book
    pub async fn cancel(&self, reader_id: &str, book_id: &str) -> AppResult<()> {
        let reserve_id = self
            .repository
            .reserves
            .find_id(reader_id, book_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No reservation for this book".to_string()))?;

        let mut tx = self.repository.pool.begin().await?;
        self.repository.reserves.delete_by_id(&mut tx, &reserve_id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_for_reader(&self, reader_id: &str) -> AppResult<Vec<ReserveDetails>> {
        self.repository.reserves.list_by_reader(reader_id).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<ReserveDetails>> {
        self.repository.reserves.list_all().await
    }
}
