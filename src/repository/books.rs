//! Books repository for database operations

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, BOOK_STATUS_BORROWABLE},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, book_id: &str) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE book_id = $1")
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))
    }

    /// List books with optional name search and pagination.
    /// Non-admin callers only see borrowable titles.
    pub async fn search(&self, query: &BookQuery, is_admin: bool) -> AppResult<(Vec<Book>, i64)> {
        let (per_page, offset) = super::page_window(query.page, query.per_page);

        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(ref name) = query.name {
            params.push(format!("%{}%", name.to_lowercase()));
            conditions.push(format!("LOWER(book_name) LIKE ${}", params.len()));
        }
        if !is_admin {
            conditions.push(format!("status = {}", BOOK_STATUS_BORROWABLE));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM books {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            "SELECT * FROM books {} ORDER BY book_name LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut list_builder = sqlx::query_as::<_, Book>(&list_query);
        for param in &params {
            list_builder = list_builder.bind(param);
        }
        let books = list_builder.fetch_all(&self.pool).await?;

        Ok((books, total))
    }

    /// Find the book occupying a shelf position
    pub async fn find_by_position(&self, position: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE position = $1")
            .bind(position)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    /// Find a book id by exact name
    pub async fn find_id_by_name(&self, book_name: &str) -> AppResult<Option<String>> {
        let id = sqlx::query_scalar::<_, String>("SELECT book_id FROM books WHERE book_name = $1")
            .bind(book_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    /// Current and total stock for a book
    pub async fn get_amounts(&self, book_id: &str) -> AppResult<(i32, i32)> {
        let row = sqlx::query_as::<_, (i32, i32)>(
            "SELECT amount, total_amount FROM books WHERE book_id = $1",
        )
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;
        Ok(row)
    }

    /// Insert a new book
    pub async fn create(&self, tx: &mut Transaction<'_, Postgres>, book: &Book) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO books (book_id, book_name, press, author, isbn, amount,
                               position, total_amount, borrowed_times, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&book.book_id)
        .bind(&book.book_name)
        .bind(&book.press)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.amount)
        .bind(&book.position)
        .bind(book.total_amount)
        .bind(book.borrowed_times)
        .bind(book.status)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn update_name(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: &str,
        book_name: &str,
    ) -> AppResult<()> {
        sqlx::query("UPDATE books SET book_name = $2 WHERE book_id = $1")
            .bind(book_id)
            .bind(book_name)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub async fn update_author(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: &str,
        author: &str,
    ) -> AppResult<()> {
        sqlx::query("UPDATE books SET author = $2 WHERE book_id = $1")
            .bind(book_id)
            .bind(author)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub async fn update_position(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: &str,
        position: &str,
    ) -> AppResult<()> {
        sqlx::query("UPDATE books SET position = $2 WHERE book_id = $1")
            .bind(book_id)
            .bind(position)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub async fn update_press(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: &str,
        press: &str,
    ) -> AppResult<()> {
        sqlx::query("UPDATE books SET press = $2 WHERE book_id = $1")
            .bind(book_id)
            .bind(press)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub async fn update_isbn(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: &str,
        isbn: &str,
    ) -> AppResult<()> {
        sqlx::query("UPDATE books SET isbn = $2 WHERE book_id = $1")
            .bind(book_id)
            .bind(isbn)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: &str,
        status: i16,
    ) -> AppResult<()> {
        sqlx::query("UPDATE books SET status = $2 WHERE book_id = $1")
            .bind(book_id)
            .bind(status)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Adjust current and total stock together. Callers run this inside a
    /// transaction so the two columns cannot drift apart.
    pub async fn adjust_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: &str,
        delta: i32,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE books SET amount = amount + $2, total_amount = total_amount + $2 WHERE book_id = $1",
        )
        .bind(book_id)
        .bind(delta)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Adjust only the on-shelf amount (borrow / return)
    pub async fn adjust_amount(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: &str,
        delta: i32,
    ) -> AppResult<()> {
        sqlx::query("UPDATE books SET amount = amount + $2 WHERE book_id = $1")
            .bind(book_id)
            .bind(delta)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub async fn increment_borrowed_times(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: &str,
    ) -> AppResult<()> {
        sqlx::query("UPDATE books SET borrowed_times = borrowed_times + 1 WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Remove a book from the catalog
    pub async fn delete(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: &str,
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
