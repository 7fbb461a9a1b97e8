//! Data models

pub mod book;
pub mod borrow;
pub mod comment;
pub mod reader;
pub mod report;
pub mod reserve;
