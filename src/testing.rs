//! Faulty collaborators for exercising failure policies.

use async_trait::async_trait;

use crate::cache::{CacheBackend, CacheStats};
use crate::error::{CacheError, CacheResult, StoreError, StoreResult};
use crate::models::{Book, BookId, NewBook, NewReview, Review};
use crate::store::{BookStore, MemoryStore};

/// Cache backend that fails every call.
#[derive(Debug, Clone, Copy)]
pub struct FailingCache {
    hang: bool,
}

impl FailingCache {
    /// Every call returns `CacheError::Unavailable`.
    pub fn erroring() -> Self {
        Self { hang: false }
    }

    /// Every call never completes.
    pub fn hanging() -> Self {
        Self { hang: true }
    }

    async fn fail<T>(&self) -> CacheResult<T> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

#[async_trait]
impl CacheBackend for FailingCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        self.fail().await
    }

    async fn set(&self, _key: &str, _payload: String, _ttl_secs: u64) -> CacheResult<()> {
        self.fail().await
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        self.fail().await
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        self.fail().await
    }
}

/// Persistence store that fails every call with `StoreError::Backend`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

impl FailingStore {
    fn fail<T>() -> StoreResult<T> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}

#[async_trait]
impl BookStore for FailingStore {
    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        Self::fail()
    }

    async fn find_book(&self, _id: BookId) -> StoreResult<Option<Book>> {
        Self::fail()
    }

    async fn find_book_by_identity(
        &self,
        _title: &str,
        _author: &str,
    ) -> StoreResult<Option<Book>> {
        Self::fail()
    }

    async fn create_book(&self, _book: NewBook) -> StoreResult<Book> {
        Self::fail()
    }

    async fn list_reviews(&self, _book_id: BookId) -> StoreResult<Vec<Review>> {
        Self::fail()
    }

    async fn create_review(&self, _review: NewReview) -> StoreResult<Review> {
        Self::fail()
    }

    async fn health_check(&self) -> StoreResult<()> {
        Self::fail()
    }
}

/// Persistence store whose reads succeed and whose inserts fail.
///
/// Reads go to the wrapped [`MemoryStore`]; `create_book` and
/// `create_review` return `StoreError::Backend` without writing.
#[derive(Debug, Default)]
pub struct ReadOnlyStore {
    inner: MemoryStore,
}

impl ReadOnlyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl BookStore for ReadOnlyStore {
    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        self.inner.list_books().await
    }

    async fn find_book(&self, id: BookId) -> StoreResult<Option<Book>> {
        self.inner.find_book(id).await
    }

    async fn find_book_by_identity(
        &self,
        title: &str,
        author: &str,
    ) -> StoreResult<Option<Book>> {
        self.inner.find_book_by_identity(title, author).await
    }

    async fn create_book(&self, _book: NewBook) -> StoreResult<Book> {
        Err(StoreError::Backend("read-only transaction".to_string()))
    }

    async fn list_reviews(&self, book_id: BookId) -> StoreResult<Vec<Review>> {
        self.inner.list_reviews(book_id).await
    }

    async fn create_review(&self, _review: NewReview) -> StoreResult<Review> {
        Err(StoreError::Backend("read-only transaction".to_string()))
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.inner.health_check().await
    }
}
