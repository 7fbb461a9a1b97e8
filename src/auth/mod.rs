//! Token and session subsystem
//!
//! Combines a stateless HMAC token signer with a Redis-backed session store.
//! Login issues a signed token and writes one session record per
//! `(subject, token kind)`; a later login for the same subject overwrites the
//! record and thereby invalidates the earlier token.

pub mod claims;
pub mod manager;
pub mod signer;
pub mod store;

pub use claims::{Claims, ClaimsElement, TokenInfo};
pub use manager::SessionManager;
pub use signer::TokenSigner;
pub use store::{SessionRecord, SessionStore, TokenKind};

use thiserror::Error;

use crate::error::AppError;

/// Token verification and session store failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Bad signature, malformed payload or wrong algorithm
    #[error("invalid token")]
    InvalidToken,

    /// The token's expiry is in the past
    #[error("expired token")]
    ExpiredToken,

    /// The token verified but its session record is gone or superseded
    #[error("deleted token")]
    DeletedToken,

    /// The session store could not be reached or timed out
    #[error("session store unavailable: {0}")]
    StoreUnavailable(String),

    /// No session record exists for the key
    #[error("session not found")]
    NotFound,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken => {
                AppError::Authorization("authorization failed".to_string())
            }
            AuthError::ExpiredToken => {
                AppError::Authorization("session superseded, please log in again".to_string())
            }
            AuthError::DeletedToken => {
                AppError::Authorization("authorization expired, please log in again".to_string())
            }
            AuthError::StoreUnavailable(msg) => AppError::Cache(msg),
            AuthError::NotFound => AppError::NotFound("session not found".to_string()),
        }
    }
}
