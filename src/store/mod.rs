//! Persistence Store
//!
//! Books and their reviews. The store is the source of truth; the cache only
//! ever holds derived, expiring copies of what these methods return.

mod memory;
#[cfg(feature = "postgres")]
mod postgres;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{Book, BookId, NewBook, NewReview, Review};

pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

/// Relational store over books and reviews.
///
/// Rows are only ever appended. Each method is a single store call.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, ordered by id.
    async fn list_books(&self) -> StoreResult<Vec<Book>>;

    async fn find_book(&self, id: BookId) -> StoreResult<Option<Book>>;

    /// The book with exactly this title and author, if any.
    async fn find_book_by_identity(&self, title: &str, author: &str)
        -> StoreResult<Option<Book>>;

    /// Inserts a book. Fails with `StoreError::Duplicate` if the
    /// (title, author) pair already exists.
    async fn create_book(&self, book: NewBook) -> StoreResult<Book>;

    /// Reviews of one book, ordered by id.
    async fn list_reviews(&self, book_id: BookId) -> StoreResult<Vec<Review>>;

    /// Inserts a review. Fails with `StoreError::MissingParent` if the book
    /// does not exist.
    async fn create_review(&self, review: NewReview) -> StoreResult<Review>;

    async fn health_check(&self) -> StoreResult<()>;
}
