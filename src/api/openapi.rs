//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, borrows, comments, health, readers, reports, reserves};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Library Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::register,
        auth::logout,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Readers
        readers::list_readers,
        readers::top_borrower,
        readers::get_reader,
        readers::delete_reader,
        borrows::reader_borrows,
        // Comments
        comments::list_comments,
        comments::create_comment,
        comments::praise_comment,
        // Borrows
        borrows::list_borrows,
        borrows::my_borrows,
        borrows::create_borrow,
        borrows::return_borrow,
        borrows::renew_borrow,
        borrows::delete_borrow,
        borrows::remind_overdue,
        // Reserves
        reserves::list_reserves,
        reserves::my_reserves,
        reserves::create_reserve,
        reserves::cancel_reserve,
        // Reports
        reports::create_report,
        reports::list_reports,
        reports::my_reports,
        reports::manage_report,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::LogoutResponse,
            auth::UserInfo,
            crate::auth::TokenInfo,
            // Books
            crate::models::book::Book,
            crate::models::book::BookQuery,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Readers
            crate::models::reader::Reader,
            crate::models::reader::RegisterReader,
            crate::models::reader::ReaderQuery,
            // Comments
            comments::CommentList,
            crate::models::comment::Comment,
            crate::models::comment::CommentDetails,
            crate::models::comment::CreateComment,
            // Borrows
            crate::models::borrow::Borrow,
            crate::models::borrow::BorrowDetails,
            crate::models::borrow::BorrowQuery,
            crate::models::borrow::CreateBorrow,
            borrows::RemindResponse,
            // Reserves
            crate::models::reserve::Reserve,
            crate::models::reserve::ReserveDetails,
            crate::models::reserve::CreateReserve,
            // Reports
            crate::models::report::Report,
            crate::models::report::ReportDetails,
            crate::models::report::CreateReport,
            crate::models::report::ManageReport,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Catalog management"),
        (name = "readers", description = "Reader management"),
        (name = "comments", description = "Book comments"),
        (name = "borrows", description = "Loan management"),
        (name = "reserves", description = "Book reservations"),
        (name = "reports", description = "Comment moderation")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
