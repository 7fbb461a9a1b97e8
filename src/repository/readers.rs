//! Readers and admins repository for database operations

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::reader::{Admin, Reader, ReaderQuery},
};

#[derive(Clone)]
pub struct ReadersRepository {
    pool: Pool<Postgres>,
}

impl ReadersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get reader by ID
    pub async fn get_by_id(&self, reader_id: &str) -> AppResult<Reader> {
        sqlx::query_as::<_, Reader>("SELECT * FROM readers WHERE reader_id = $1")
            .bind(reader_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reader with id {} not found", reader_id)))
    }

    /// Find a reader by phone number, used by login
    pub async fn find_by_phone(&self, phone: &str) -> AppResult<Option<Reader>> {
        let reader = sqlx::query_as::<_, Reader>("SELECT * FROM readers WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reader)
    }

    /// Check if a phone number is already registered
    pub async fn phone_exists(&self, phone: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM readers WHERE phone = $1)")
                .bind(phone)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Insert a new reader
    pub async fn create(&self, reader: &Reader) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO readers (reader_id, reader_name, email, phone, password,
                                 borrow_times, ovd_times)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&reader.reader_id)
        .bind(&reader.reader_name)
        .bind(&reader.email)
        .bind(&reader.phone)
        .bind(&reader.password)
        .bind(reader.borrow_times)
        .bind(reader.ovd_times)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// List readers with optional name search and pagination
    pub async fn search(&self, query: &ReaderQuery) -> AppResult<(Vec<Reader>, i64)> {
        let (per_page, offset) = super::page_window(query.page, query.per_page);

        let (where_clause, pattern) = match query.name {
            Some(ref name) => (
                "WHERE LOWER(reader_name) LIKE $1".to_string(),
                Some(format!("%{}%", name.to_lowercase())),
            ),
            None => (String::new(), None),
        };

        let count_query = format!("SELECT COUNT(*) FROM readers {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(ref pattern) = pattern {
            count_builder = count_builder.bind(pattern);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let list_query = format!(
            "SELECT * FROM readers {} ORDER BY reader_name LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut list_builder = sqlx::query_as::<_, Reader>(&list_query);
        if let Some(ref pattern) = pattern {
            list_builder = list_builder.bind(pattern);
        }
        let readers = list_builder.fetch_all(&self.pool).await?;

        Ok((readers, total))
    }

    /// The reader with the most lifetime borrows
    pub async fn top_borrower(&self) -> AppResult<Option<Reader>> {
        let reader = sqlx::query_as::<_, Reader>(
            "SELECT * FROM readers ORDER BY borrow_times DESC, reader_id LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(reader)
    }

    /// Delete a reader account. Runs inside the transaction that also clears
    /// the reader's history rows.
    pub async fn delete(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reader_id: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM readers WHERE reader_id = $1")
            .bind(reader_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_borrow_times(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reader_id: &str,
    ) -> AppResult<()> {
        sqlx::query("UPDATE readers SET borrow_times = borrow_times + 1 WHERE reader_id = $1")
            .bind(reader_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub async fn increment_ovd_times(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reader_id: &str,
    ) -> AppResult<()> {
        sqlx::query("UPDATE readers SET ovd_times = ovd_times + 1 WHERE reader_id = $1")
            .bind(reader_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Find an admin account by its login name
    pub async fn find_admin_by_phone(&self, phone: &str) -> AppResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }
}
