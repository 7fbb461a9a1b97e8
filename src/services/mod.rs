//! Business logic services

pub mod books;
pub mod borrows;
pub mod comments;
pub mod email;
pub mod reports;
pub mod reserves;
pub mod users;

use crate::{
    auth::{SessionManager, SessionStore, TokenSigner},
    config::{AuthConfig, EmailConfig, RedisConfig},
    error::{AppError, AppResult},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub sessions: SessionManager,
    pub users: users::UsersService,
    pub books: books::BooksService,
    pub comments: comments::CommentsService,
    pub borrows: borrows::BorrowsService,
    pub reserves: reserves::ReservesService,
    pub reports: reports::ReportsService,
    pub email: email::EmailService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: &AuthConfig,
        redis_config: &RedisConfig,
        email_config: EmailConfig,
    ) -> AppResult<Self> {
        let signer = TokenSigner::new(auth_config).map_err(AppError::Internal)?;
        let store = SessionStore::new(redis_config, &auth_config.key_prefix)?;
        let sessions = SessionManager::new(signer, store);

        let email = email::EmailService::new(email_config);

        Ok(Self {
            users: users::UsersService::new(repository.clone(), sessions.clone()),
            books: books::BooksService::new(repository.clone()),
            comments: comments::CommentsService::new(repository.clone()),
            borrows: borrows::BorrowsService::new(repository.clone(), email.clone()),
            reserves: reserves::ReservesService::new(repository.clone()),
            reports: reports::ReportsService::new(repository),
            sessions,
            email,
        })
    }
}
