//! Libris Library Management System
//!
//! A Rust REST API server for managing a library catalog, its readers and
//! their loans, with a token/session authentication subsystem backed by
//! Redis.

use std::sync::Arc;

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
