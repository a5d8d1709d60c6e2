//! API Routes
//!
//! Configures the Axum router: the books resource under `/books`, plus the
//! service endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_book_handler, create_review_handler, health_handler, list_books_handler,
    list_reviews_handler, stats_handler, AppState,
};

/// Routes of the books resource, relative to its root.
///
/// - `GET /` - List all books
/// - `POST /` - Create a book
/// - `GET /:id/review` - List a book's reviews
/// - `POST /:id/review` - Add a review to a book
pub fn books_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books_handler).post(create_book_handler))
        .route(
            "/:id/review",
            get(list_reviews_handler).post(create_review_handler),
        )
}

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `/books/...` - The books resource (see [`books_router`])
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/books", books_router())
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
