//! Loan lifecycle service

use chrono::{Duration, Utc};

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::{
        book::BOOK_STATUS_BORROWABLE,
        borrow::{
            Borrow, BorrowDetails, BorrowQuery, CreateBorrow, BORROW_STATUS_OPEN,
            BORROW_STATUS_RETURNED, LOAN_PERIOD_DAYS,
        },
    },
    repository::Repository,
    services::email::EmailService,
    utils,
};

/// A loan may be renewed this many times
const MAX_RENEWALS: i16 = 1;

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
    email: EmailService,
}

impl BorrowsService {
    pub fn new(repository: Repository, email: EmailService) -> Self {
        Self { repository, email }
    }

    /// Check a copy out to a reader. Fulfils a matching reservation if the
    /// reader had one.
    pub async fn create(&self, request: CreateBorrow) -> AppResult<Borrow> {
        let reader = self.repository.readers.get_by_id(&request.reader_id).await?;
        let book = self.repository.books.get_by_id(&request.book_id).await?;

        if book.status != BOOK_STATUS_BORROWABLE || book.amount <= 0 {
            return Err(AppError::BusinessRule(
                ErrorCode::BookNotAvailable,
                "Book is not available for borrowing".to_string(),
            ));
        }
        if self
            .repository
            .borrows
            .find_open(&reader.reader_id, &book.book_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Reader already has an open loan for this book".to_string(),
            ));
        }

        let now = Utc::now();
        let borrow = Borrow {
            borrow_id: utils::next_id(),
            reader_id: reader.reader_id.clone(),
            book_id: book.book_id.clone(),
            borrow_date: now,
            due_date: now + Duration::days(LOAN_PERIOD_DAYS),
            return_date: None,
            renew_times: 0,
            status: BORROW_STATUS_OPEN,
        };

        let mut tx = self.repository.pool.begin().await?;
        self.repository.borrows.create(&mut tx, &borrow).await?;
        self.repository.books.adjust_amount(&mut tx, &book.book_id, -1).await?;
        self.repository
            .books
            .increment_borrowed_times(&mut tx, &book.book_id)
            .await?;
        self.repository
            .readers
            .increment_borrow_times(&mut tx, &reader.reader_id)
            .await?;
        if let Some(reserve_id) = self
            .repository
            .reserves
            .find_id(&reader.reader_id, &book.book_id)
            .await?
        {
            self.repository.reserves.delete_by_id(&mut tx, &reserve_id).await?;
        }
        tx.commit().await?;

        tracing::info!(borrow_id = %borrow.borrow_id, reader_id = %reader.reader_id,
            book_id = %book.book_id, "book borrowed");
        Ok(borrow)
    }

    /// Take a copy back. An overdue return counts against the reader.
    pub async fn return_book(&self, borrow_id: &str) -> AppResult<Borrow> {
        let borrow = self.repository.borrows.get_by_id(borrow_id).await?;
        if borrow.status == BORROW_STATUS_RETURNED {
            return Err(AppError::BusinessRule(
                ErrorCode::Failure,
                "This loan has already been returned".to_string(),
            ));
        }

        let now = Utc::now();
        let mut tx = self.repository.pool.begin().await?;
        self.repository
            .borrows
            .mark_returned(&mut tx, borrow_id, now, BORROW_STATUS_RETURNED)
            .await?;
        self.repository.books.adjust_amount(&mut tx, &borrow.book_id, 1).await?;
        if now > borrow.due_date {
            self.repository
                .readers
                .increment_ovd_times(&mut tx, &borrow.reader_id)
                .await?;
        }
        tx.commit().await?;

        tracing::info!(borrow_id, "book returned");
        self.repository.borrows.get_by_id(borrow_id).await
    }

    /// Extend an open loan by one more period. Allowed once, and only
    /// before the due date.
    pub async fn renew(&self, borrow_id: &str) -> AppResult<Borrow> {
        let borrow = self.repository.borrows.get_by_id(borrow_id).await?;
        if borrow.status != BORROW_STATUS_OPEN {
            return Err(AppError::BusinessRule(
                ErrorCode::Failure,
                "Only open loans can be renewed".to_string(),
            ));
        }
        if borrow.renew_times >= MAX_RENEWALS {
            return Err(AppError::BusinessRule(
                ErrorCode::Failure,
                "This loan has already been renewed".to_string(),
            ));
        }
        let now = Utc::now();
        if now > borrow.due_date {
            return Err(AppError::BusinessRule(
                ErrorCode::Failure,
                "Overdue loans cannot be renewed".to_string(),
            ));
        }

        let new_due = borrow.due_date + Duration::days(LOAN_PERIOD_DAYS);
        let mut tx = self.repository.pool.begin().await?;
        self.repository.borrows.renew(&mut tx, borrow_id, new_due).await?;
        tx.commit().await?;

        self.repository.borrows.get_by_id(borrow_id).await
    }

    pub async fn list(&self, query: &BorrowQuery) -> AppResult<(Vec<BorrowDetails>, i64)> {
        self.repository.borrows.search(query).await
    }

    pub async fn list_open_for_reader(&self, reader_id: &str) -> AppResult<Vec<BorrowDetails>> {
        self.repository.borrows.list_open_by_reader(reader_id).await
    }

    /// Remove a closed loan record from the history
    pub async fn delete(&self, borrow_id: &str) -> AppResult<()> {
        let borrow = self.repository.borrows.get_by_id(borrow_id).await?;
        if borrow.status == BORROW_STATUS_OPEN {
            return Err(AppError::BusinessRule(
                ErrorCode::Failure,
                "Open loans cannot be deleted".to_string(),
            ));
        }
        self.repository.borrows.delete(borrow_id).await?;
        Ok(())
    }

    /// Email every reader with overdue loans a reminder listing them.
    /// Returns the number of reminders sent; readers without an email
    /// address on file are skipped.
    pub async fn remind_overdue(&self) -> AppResult<usize> {
        let overdue = self.repository.borrows.list_overdue().await?;

        let mut by_reader: std::collections::HashMap<String, Vec<&BorrowDetails>> =
            std::collections::HashMap::new();
        for borrow in &overdue {
            by_reader.entry(borrow.reader_id.clone()).or_default().push(borrow);
        }

        let mut sent = 0;
        for (reader_id, borrows) in by_reader {
            let reader = self.repository.readers.get_by_id(&reader_id).await?;
            let Some(email) = reader.email else {
                tracing::debug!(%reader_id, "overdue reader has no email on file");
                continue;
            };
            let books: Vec<(String, chrono::DateTime<Utc>)> = borrows
                .iter()
                .map(|b| (b.book_name.clone(), b.due_date))
                .collect();
            if let Err(e) = self
                .email
                .send_overdue_reminder(&email, &reader.reader_name, &books)
                .await
            {
                tracing::warn!(%reader_id, error = %e, "failed to send overdue reminder");
                continue;
            }
            sent += 1;
        }
        Ok(sent)
    }
}
