//! API Module
//!
//! HTTP handlers and routing for the books REST API.
//!
//! # Endpoints
//! - `GET /books` - List all books (cached)
//! - `POST /books` - Create a book
//! - `GET /books/:id/review` - List a book's reviews (cached)
//! - `POST /books/:id/review` - Add a review to a book
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{books_router, create_router};
