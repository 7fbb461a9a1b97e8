//! Borrow records repository for database operations

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::borrow::{Borrow, BorrowDetails, BorrowQuery, BORROW_STATUS_OPEN},
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow record by ID
    pub async fn get_by_id(&self, borrow_id: &str) -> AppResult<Borrow> {
        sqlx::query_as::<_, Borrow>("SELECT * FROM borrows WHERE borrow_id = $1")
            .bind(borrow_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow with id {} not found", borrow_id)))
    }

    /// Insert a new borrow record
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        borrow: &Borrow,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO borrows (borrow_id, reader_id, book_id, borrow_date, due_date,
                                 return_date, renew_times, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&borrow.borrow_id)
        .bind(&borrow.reader_id)
        .bind(&borrow.book_id)
        .bind(borrow.borrow_date)
        .bind(borrow.due_date)
        .bind(borrow.return_date)
        .bind(borrow.renew_times)
        .bind(borrow.status)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// List borrow records joined with reader and book display fields,
    /// with optional filters and pagination
    pub async fn search(&self, query: &BorrowQuery) -> AppResult<(Vec<BorrowDetails>, i64)> {
        let (per_page, offset) = super::page_window(query.page, query.per_page);

        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(ref reader_name) = query.reader_name {
            params.push(format!("%{}%", reader_name.to_lowercase()));
            conditions.push(format!("LOWER(r.reader_name) LIKE ${}", params.len()));
        }
        if let Some(ref book_name) = query.book_name {
            params.push(format!("%{}%", book_name.to_lowercase()));
            conditions.push(format!("LOWER(b.book_name) LIKE ${}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!(
            r#"
            SELECT COUNT(*)
            FROM borrows bo
            JOIN readers r ON bo.reader_id = r.reader_id
            JOIN books b ON bo.book_id = b.book_id
            {}
            "#,
            where_clause
        );
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            r#"
            SELECT bo.borrow_id, bo.reader_id, bo.book_id, r.reader_name, r.phone AS reader_phone,
                   b.book_name, b.author, bo.borrow_date, bo.due_date, bo.return_date,
                   bo.renew_times, bo.status
            FROM borrows bo
            JOIN readers r ON bo.reader_id = r.reader_id
            JOIN books b ON bo.book_id = b.book_id
            {}
            ORDER BY bo.borrow_date DESC
            LIMIT {} OFFSET {}
            "#,
            where_clause, per_page, offset
        );
        let mut list_builder = sqlx::query_as::<_, BorrowDetails>(&list_query);
        for param in &params {
            list_builder = list_builder.bind(param);
        }
        let borrows = list_builder.fetch_all(&self.pool).await?;

        Ok((borrows, total))
    }

    /// Open borrows for one reader, joined with display fields
    pub async fn list_open_by_reader(&self, reader_id: &str) -> AppResult<Vec<BorrowDetails>> {
        let borrows = sqlx::query_as::<_, BorrowDetails>(
            r#"
            SELECT bo.borrow_id, bo.reader_id, bo.book_id, r.reader_name, r.phone AS reader_phone,
                   b.book_name, b.author, bo.borrow_date, bo.due_date, bo.return_date,
                   bo.renew_times, bo.status
            FROM borrows bo
            JOIN readers r ON bo.reader_id = r.reader_id
            JOIN books b ON bo.book_id = b.book_id
            WHERE bo.reader_id = $1 AND bo.status = $2
            ORDER BY bo.due_date
            "#,
        )
        .bind(reader_id)
        .bind(BORROW_STATUS_OPEN)
        .fetch_all(&self.pool)
        .await?;
        Ok(borrows)
    }

    /// Open borrows already past their due date, joined with display fields
    pub async fn list_overdue(&self) -> AppResult<Vec<BorrowDetails>> {
        let borrows = sqlx::query_as::<_, BorrowDetails>(
            r#"
            SELECT bo.borrow_id, bo.reader_id, bo.book_id, r.reader_name, r.phone AS reader_phone,
                   b.book_name, b.author, bo.borrow_date, bo.due_date, bo.return_date,
                   bo.renew_times, bo.status
            FROM borrows bo
            JOIN readers r ON bo.reader_id = r.reader_id
            JOIN books b ON bo.book_id = b.book_id
            WHERE bo.status = $1 AND bo.due_date < NOW()
            ORDER BY bo.due_date
            "#,
        )
        .bind(BORROW_STATUS_OPEN)
        .fetch_all(&self.pool)
        .await?;
        Ok(borrows)
    }

    /// Does the reader still have an open borrow for this book
    pub async fn find_open(&self, reader_id: &str, book_id: &str) -> AppResult<Option<Borrow>> {
        let borrow = sqlx::query_as::<_, Borrow>(
            "SELECT * FROM borrows WHERE reader_id = $1 AND book_id = $2 AND status = $3",
        )
        .bind(reader_id)
        .bind(book_id)
        .bind(BORROW_STATUS_OPEN)
        .fetch_optional(&self.pool)
        .await?;
        Ok(borrow)
    }

    /// Number of open borrows for a reader
    pub async fn count_open_by_reader(&self, reader_id: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrows WHERE reader_id = $1 AND status = $2",
        )
        .bind(reader_id)
        .bind(BORROW_STATUS_OPEN)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Drop the loan history of a book, done before the book row itself goes
    pub async fn delete_by_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: &str,
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM borrows WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Drop the loan history of a reader, done before the reader row itself goes
    pub async fn delete_by_reader(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reader_id: &str,
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM borrows WHERE reader_id = $1")
            .bind(reader_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Close a borrow record with its return date
    pub async fn mark_returned(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        borrow_id: &str,
        return_date: chrono::DateTime<chrono::Utc>,
        status: i16,
    ) -> AppResult<()> {
        sqlx::query("UPDATE borrows SET return_date = $2, status = $3 WHERE borrow_id = $1")
            .bind(borrow_id)
            .bind(return_date)
            .bind(status)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Push the due date out and count the renewal
    pub async fn renew(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        borrow_id: &str,
        new_due_date: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE borrows SET due_date = $2, renew_times = renew_times + 1 WHERE borrow_id = $1",
        )
        .bind(borrow_id)
        .bind(new_due_date)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Delete a borrow record
    pub async fn delete(&self, borrow_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM borrows WHERE borrow_id = $1")
            .bind(borrow_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
