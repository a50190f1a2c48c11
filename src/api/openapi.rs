//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health, loans, publishers, requests, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblion API",
        version = "0.1.0",
        description = "Library Lending Management REST API",
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
        auth::register,
        auth::login,
        auth::validate,
        // Users
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::get_user_loans,
        users::get_user_requests,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Publishers
        publishers::list_publishers,
        publishers::get_publisher,
        publishers::create_publisher,
        publishers::update_publisher,
        publishers::delete_publisher,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Book requests
        requests::create_request,
        requests::list_requests,
        requests::get_request,
        requests::update_request,
        requests::delete_request,
        requests::approve_request,
        // Loans
        loans::list_loans,
        loans::get_loan,
        loans::create_loan,
        loans::update_loan,
        loans::delete_loan,
        loans::return_loan,
    ),
    components(
        schemas(
            // Auth
            auth::LoginData,
            auth::ValidateData,
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            // Users
            crate::models::user::User,
            crate::models::user::UpdateUser,
            crate::models::user::Role,
            // Authors
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            // Publishers
            crate::models::publisher::Publisher,
            crate::models::publisher::CreatePublisher,
            crate::models::publisher::UpdatePublisher,
            // Books
            crate::models::book::Book,
            crate::models::book::BookDetails,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Book requests
            crate::models::request::BookRequest,
            crate::models::request::RequestStatus,
            crate::models::request::CreateBookRequest,
            crate::models::request::UpdateBookRequest,
            crate::models::request::ApproveBookRequest,
            requests::DecisionData,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::CreateLoan,
            crate::models::loan::UpdateLoan,
            crate::models::loan::ReturnLoan,
            // Health
            health::HealthResponse,
            // Envelopes
            super::AuthorEnvelope,
            super::AuthorListEnvelope,
            super::PublisherEnvelope,
            super::PublisherListEnvelope,
            super::BookEnvelope,
            super::BookRecordEnvelope,
            super::BookListEnvelope,
            super::UserEnvelope,
            super::UserListEnvelope,
            super::RequestEnvelope,
            super::RequestListEnvelope,
            super::LoanEnvelope,
            super::LoanListEnvelope,
            super::LoginEnvelope,
            super::ValidateEnvelope,
            super::DecisionEnvelope,
            // Errors
            crate::error::ErrorResponse,
            crate::error::ErrorDetail,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "authors", description = "Author catalog"),
        (name = "publishers", description = "Publisher catalog"),
        (name = "books", description = "Book catalog"),
        (name = "book-requests", description = "Book request lifecycle"),
        (name = "loans", description = "Loan management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
