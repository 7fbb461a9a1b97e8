//! Authentication and account management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::collections::HashMap;

use crate::{
    auth::{ClaimsElement, SessionManager, TokenInfo, TokenKind},
    error::{AppError, AppResult},
    models::reader::{Reader, RegisterReader},
    repository::Repository,
    utils,
};

/// All sessions run under a single organisation for now
pub const DEFAULT_ORG_ID: i64 = 0;

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    sessions: SessionManager,
}

impl UsersService {
    pub fn new(repository: Repository, sessions: SessionManager) -> Self {
        Self { repository, sessions }
    }

    /// Authenticate a reader by phone number and hand out a session token.
    ///
    /// A fresh login overwrites any session record the reader already had,
    /// so earlier tokens stop passing the revocation check.
    pub async fn login_reader(&self, phone: &str, password: &str) -> AppResult<(TokenInfo, Reader)> {
        if !utils::is_valid_phone(phone) {
            return Err(AppError::Validation("Invalid phone number".to_string()));
        }

        let reader = self
            .repository
            .readers
            .find_by_phone(phone)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid phone or password".to_string()))?;

        if !verify_password(&reader.password, password)? {
            return Err(AppError::Authentication("Invalid phone or password".to_string()));
        }

        let element = ClaimsElement {
            user_id: reader.reader_id.clone(),
            user_name: reader.reader_name.clone(),
            is_admin: false,
        };
        let token = self
            .sessions
            .generate(&element, DEFAULT_ORG_ID, session_extra(&reader.phone, false), None)
            .await?;

        tracing::info!(reader_id = %reader.reader_id, "reader logged in");
        Ok((token, reader))
    }

    /// Authenticate an administrator. The admin `phone` column is a plain
    /// login name and skips the mobile-number pattern check.
    pub async fn login_admin(&self, phone: &str, password: &str) -> AppResult<TokenInfo> {
        let admin = self
            .repository
            .readers
            .find_admin_by_phone(phone)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid phone or password".to_string()))?;

        if !verify_password(&admin.password, password)? {
            return Err(AppError::Authentication("Invalid phone or password".to_string()));
        }

        let element = ClaimsElement {
            user_id: admin.id.to_string(),
            user_name: admin.phone.clone(),
            is_admin: true,
        };
        let token = self
            .sessions
            .generate(&element, DEFAULT_ORG_ID, session_extra(&admin.phone, true), None)
            .await?;

        tracing::info!(admin_id = admin.id, "admin logged in");
        Ok(token)
    }

    /// Register a new reader account
    pub async fn register(&self, request: RegisterReader) -> AppResult<Reader> {
        if !utils::is_valid_phone(&request.phone) {
            return Err(AppError::Validation("Invalid phone number".to_string()));
        }
        if self.repository.readers.phone_exists(&request.phone).await? {
            return Err(AppError::Conflict("Phone number already registered".to_string()));
        }

        let reader = Reader {
            reader_id: utils::next_id(),
            reader_name: request.reader_name,
            email: request.email,
            phone: request.phone,
            password: hash_password(&request.password)?,
            borrow_times: 0,
            ovd_times: 0,
        };
        self.repository.readers.create(&reader).await?;

        tracing::info!(reader_id = %reader.reader_id, "reader registered");
        Ok(reader)
    }

    /// Drop the caller's session record; their token stops working immediately
    pub async fn logout(&self, user_id: &str) -> AppResult<bool> {
        self.sessions.destroy(user_id, TokenKind::Access).await
    }

    pub async fn get_reader(&self, reader_id: &str) -> AppResult<Reader> {
        self.repository.readers.get_by_id(reader_id).await
    }

    pub async fn list_readers(
        &self,
        query: &crate::models::reader::ReaderQuery,
    ) -> AppResult<(Vec<Reader>, i64)> {
        self.repository.readers.search(query).await
    }

    /// The reader with the most lifetime borrows, if any readers exist
    pub async fn top_borrower(&self) -> AppResult<Option<Reader>> {
        self.repository.readers.top_borrower().await
    }

    /// Remove a reader account. Refused while the reader still has open loans.
    /// The reader's history rows come out in the same transaction so the
    /// account delete cannot trip a reference from an old loan or comment.
    pub async fn delete_reader(&self, reader_id: &str) -> AppResult<()> {
        let open = self.repository.borrows.count_open_by_reader(reader_id).await?;
        if open > 0 {
            return Err(AppError::BusinessRule(
                crate::error::ErrorCode::ReaderHasBorrows,
                "Reader still has open loans".to_string(),
            ));
        }

        let mut tx = self.repository.pool.begin().await?;
        self.repository.reports.delete_by_reader(&mut tx, reader_id).await?;
        self.repository.comments.delete_by_reader(&mut tx, reader_id).await?;
        self.repository.reserves.delete_by_reader(&mut tx, reader_id).await?;
        self.repository.borrows.delete_by_reader(&mut tx, reader_id).await?;
        let deleted = self.repository.readers.delete(&mut tx, reader_id).await?;
        if !deleted {
            tx.rollback().await?;
            return Err(AppError::NotFound(format!("Reader with id {} not found", reader_id)));
        }
        tx.commit().await?;
        // Best effort; a dangling session record expires on its own
        let _ = self.sessions.destroy(reader_id, TokenKind::Access).await;
        Ok(())
    }
}

fn session_extra(phone: &str, is_admin: bool) -> HashMap<String, serde_json::Value> {
    HashMap::from([
        ("phone".to_string(), serde_json::Value::from(phone)),
        ("is_admin".to_string(), serde_json::Value::from(is_admin)),
    ])
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(verify_password(&hash, "s3cret-pass").unwrap());
        assert!(!verify_password(&hash, "wrong-pass").unwrap());
    }

    #[test]
    fn invalid_hash_is_an_error() {
        assert!(verify_password("not-a-hash", "whatever").is_err());
    }
}
