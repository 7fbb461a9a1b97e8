//! Catalog management service

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::book::{Book, BookQuery, CreateBook, UpdateBook, BOOK_STATUS_BORROWABLE, MAX_COPIES},
    repository::Repository,
    utils,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List the catalog. Readers only see borrowable titles.
    pub async fn list(&self, query: &BookQuery, is_admin: bool) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.search(query, is_admin).await
    }

    pub async fn get(&self, book_id: &str) -> AppResult<Book> {
        self.repository.books.get_by_id(book_id).await
    }

    /// Add a title to the catalog. Names and shelf positions are unique.
    pub async fn create(&self, request: CreateBook) -> AppResult<Book> {
        if request.amount > MAX_COPIES {
            return Err(AppError::BusinessRule(
                ErrorCode::TooManyCopies,
                format!("At most {} copies per title", MAX_COPIES),
            ));
        }
        if self
            .repository
            .books
            .find_id_by_name(&request.book_name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("A book with this name already exists".to_string()));
        }
        if self
            .repository
            .books
            .find_by_position(&request.position)
            .await?
            .is_some()
        {
            return Err(AppError::BusinessRule(
                ErrorCode::PositionOccupied,
                format!("Position {} is already occupied", request.position),
            ));
        }

        let book = Book {
            book_id: utils::next_id(),
            book_name: request.book_name,
            press: request.press,
            author: request.author,
            isbn: request.isbn,
            amount: request.amount,
            position: request.position,
            total_amount: request.amount,
            borrowed_times: 0,
            status: BOOK_STATUS_BORROWABLE,
        };

        let mut tx = self.repository.pool.begin().await?;
        self.repository.books.create(&mut tx, &book).await?;
        tx.commit().await?;

        tracing::info!(book_id = %book.book_id, name = %book.book_name, "book created");
        Ok(book)
    }

    /// Apply the provided fields. Stock changes move `amount` and
    /// `total_amount` together so copies out on loan stay accounted for.
    pub async fn update(&self, book_id: &str, request: UpdateBook) -> AppResult<Book> {
        if request.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }
        let current = self.repository.books.get_by_id(book_id).await?;

        if let Some(ref position) = request.position {
            if let Some(occupant) = self.repository.books.find_by_position(position).await? {
                if occupant.book_id != book_id {
                    return Err(AppError::BusinessRule(
                        ErrorCode::PositionOccupied,
                        format!("Position {} is already occupied", position),
                    ));
                }
            }
        }
        if let Some(delta) = request.stock_delta {
            let on_loan = current.total_amount - current.amount;
            if current.amount + delta < 0 {
                return Err(AppError::BadRequest(
                    "Cannot remove more copies than are on the shelf".to_string(),
                ));
            }
            if on_loan + current.amount + delta > MAX_COPIES {
                return Err(AppError::BusinessRule(
                    ErrorCode::TooManyCopies,
                    format!("At most {} copies per title", MAX_COPIES),
                ));
            }
        }

        let mut tx = self.repository.pool.begin().await?;
        if let Some(ref name) = request.book_name {
            self.repository.books.update_name(&mut tx, book_id, name).await?;
        }
        if let Some(ref author) = request.author {
            self.repository.books.update_author(&mut tx, book_id, author).await?;
        }
        if let Some(ref position) = request.position {
            self.repository.books.update_position(&mut tx, book_id, position).await?;
        }
        if let Some(ref press) = request.press {
            self.repository.books.update_press(&mut tx, book_id, press).await?;
        }
        if let Some(ref isbn) = request.isbn {
            self.repository.books.update_isbn(&mut tx, book_id, isbn).await?;
        }
        if let Some(status) = request.status {
            self.repository.books.update_status(&mut tx, book_id, status).await?;
        }
        if let Some(delta) = request.stock_delta {
            self.repository.books.adjust_stock(&mut tx, book_id, delta).await?;
        }
        tx.commit().await?;

        self.repository.books.get_by_id(book_id).await
    }

    /// Remove a title. Refused while any copy is still out on loan; the
    /// returned-loan history goes in the same transaction as the book row.
    pub async fn delete(&self, book_id: &str) -> AppResult<()> {
        let (amount, total_amount) = self.repository.books.get_amounts(book_id).await?;
        if amount != total_amount {
            return Err(AppError::BusinessRule(
                ErrorCode::BookHasBorrows,
                "Copies of this book are still out on loan".to_string(),
            ));
        }

        let mut tx = self.repository.pool.begin().await?;
        self.repository.borrows.delete_by_book(&mut tx, book_id).await?;
        self.repository.books.delete(&mut tx, book_id).await?;
        tx.commit().await?;

        tracing::info!(book_id, "book deleted");
        Ok(())
    }
}
