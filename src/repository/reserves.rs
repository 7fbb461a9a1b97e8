//! Reservations repository for database operations

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::AppResult,
    models::reserve::{Reserve, ReserveDetails},
};

#[derive(Clone)]
pub struct ReservesRepository {
    pool: Pool<Postgres>,
}

impl ReservesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Find an existing reservation id for this reader and book
    pub async fn find_id(&self, reader_id: &str, book_id: &str) -> AppResult<Option<String>> {
        let id = sqlx::query_scalar::<_, String>(
            "SELECT reserve_id FROM reserves WHERE reader_id = $1 AND book_id = $2",
        )
        .bind(reader_id)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(id)
    }

    /// Insert a new reservation
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reserve: &Reserve,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO reserves (reserve_id, reader_id, book_id, date) VALUES ($1, $2, $3, $4)",
        )
        .bind(&reserve.reserve_id)
        .bind(&reserve.reader_id)
        .bind(&reserve.book_id)
        .bind(reserve.date)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Delete a reservation by id
    pub async fn delete_by_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reserve_id: &str,
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM reserves WHERE reserve_id = $1")
            .bind(reserve_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Drop all reservations held by a reader
    pub async fn delete_by_reader(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reader_id: &str,
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM reserves WHERE reader_id = $1")
            .bind(reader_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Reservations for one reader, joined with display fields
    pub async fn list_by_reader(&self, reader_id: &str) -> AppResult<Vec<ReserveDetails>> {
        let reserves = sqlx::query_as::<_, ReserveDetails>(
            r#"
            SELECT rs.reserve_id, rs.reader_id, rs.book_id, r.reader_name,
                   b.book_name, b.author, rs.date
            FROM reserves rs
            JOIN readers r ON rs.reader_id = r.reader_id
            JOIN books b ON rs.book_id = b.book_id
            WHERE rs.reader_id = $1
            ORDER BY rs.date DESC
            "#,
        )
        .bind(reader_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reserves)
    }

    /// All reservations, joined with display fields
    pub async fn list_all(&self) -> AppResult<Vec<ReserveDetails>> {
        let reserves = sqlx::query_as::<_, ReserveDetails>(
            r#"
            SELECT rs.reserve_id, rs.reader_id, rs.book_id, r.reader_name,
                   b.book_name, b.author, rs.date
            FROM reserves rs
            JOIN readers r ON rs.reader_id = r.reader_id
            JOIN books b ON rs.book_id = b.book_id
            ORDER BY rs.date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(reserves)
    }
}
