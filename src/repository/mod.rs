//! Repository layer for database operations

pub mod books;
pub mod borrows;
pub mod comments;
pub mod readers;
pub mod reports;
pub mod reserves;

use sqlx::{Pool, Postgres};

/// Clamp pagination parameters and compute the row offset. The page bound
/// keeps the offset arithmetic well away from i64 overflow on hostile
/// query strings.
pub(crate) fn page_window(page: Option<i64>, per_page: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).clamp(1, 1_000_000);
    let per_page = per_page.unwrap_or(20).clamp(1, 1000);
    (per_page, (page - 1) * per_page)
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub readers: readers::ReadersRepository,
    pub comments: comments::CommentsRepository,
    pub borrows: borrows::BorrowsRepository,
    pub reserves: reserves::ReservesRepository,
    pub reports: reports::ReportsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            readers: readers::ReadersRepository::new(pool.clone()),
            comments: comments::CommentsRepository::new(pool.clone()),
            borrows: borrows::BorrowsRepository::new(pool.clone()),
            reserves: reserves::ReservesRepository::new(pool.clone()),
            reports: reports::ReportsRepository::new(pool.clone()),
            pool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_defaults() {
        assert_eq!(page_window(None, None), (20, 0));
        assert_eq!(page_window(Some(3), Some(50)), (50, 100));
    }

    #[test]
    fn page_window_clamps_out_of_range_values() {
        assert_eq!(page_window(Some(0), Some(0)), (1, 0));
        assert_eq!(page_window(Some(-5), Some(-1)), (1, 0));
        assert_eq!(page_window(None, Some(100_000)), (1000, 0));
    }

    #[test]
    fn page_window_survives_absurd_pages() {
        // Must not overflow, whatever the query string claims
        let (per_page, offset) = page_window(Some(i64::MAX), Some(i64::MAX));
        assert_eq!(per_page, 1000);
        assert_eq!(offset, (1_000_000 - 1) * 1000);

        let (_, offset) = page_window(Some(i64::MIN), None);
        assert_eq!(offset, 0);
    }
}
