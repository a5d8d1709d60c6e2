//! In-memory persistence store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::models::{Book, BookId, NewBook, NewReview, Review, ReviewId};
use crate::store::BookStore;

#[derive(Debug, Default)]
struct Tables {
    books: BTreeMap<BookId, Book>,
    reviews: BTreeMap<ReviewId, Review>,
    /// Unique index on (title, author)
    identity: HashMap<(String, String), BookId>,
    /// Index on reviews.book_id
    reviews_by_book: HashMap<BookId, Vec<ReviewId>>,
    last_book_id: BookId,
    last_review_id: ReviewId,
}

/// `BookStore` held in process memory.
///
/// Ids are generated from 1 upwards. Uniqueness and parent checks run under
/// the same write lock as the insert, so they behave like table constraints.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        Ok(self.tables.read().await.books.values().cloned().collect())
    }

    async fn find_book(&self, id: BookId) -> StoreResult<Option<Book>> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn find_book_by_identity(
        &self,
        title: &str,
        author: &str,
    ) -> StoreResult<Option<Book>> {
        let tables = self.tables.read().await;
        Ok(tables
            .identity
            .get(&(title.to_string(), author.to_string()))
            .and_then(|id| tables.books.get(id))
            .cloned())
    }

    async fn create_book(&self, book: NewBook) -> StoreResult<Book> {
        let mut tables = self.tables.write().await;
        let identity = (book.title.clone(), book.author.clone());
        if tables.identity.contains_key(&identity) {
            return Err(StoreError::Duplicate(format!(
                "book '{}' by '{}'",
                book.title, book.author
            )));
        }

        tables.last_book_id += 1;
        let created = Book {
            id: tables.last_book_id,
            title: book.title,
            author: book.author,
        };
        tables.identity.insert(identity, created.id);
        tables.books.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_reviews(&self, book_id: BookId) -> StoreResult<Vec<Review>> {
        let tables = self.tables.read().await;
        let ids = match tables.reviews_by_book.get(&book_id) {
            Some(ids) => ids,
            None => return Ok(Vec::new()),
        };
        Ok(ids
            .iter()
            .filter_map(|id| tables.reviews.get(id))
            .cloned()
            .collect())
    }

    async fn create_review(&self, review: NewReview) -> StoreResult<Review> {
        let mut tables = self.tables.write().await;
        if !tables.books.contains_key(&review.book_id) {
            return Err(StoreError::MissingParent(format!(
                "book {}",
                review.book_id
            )));
        }

        tables.last_review_id += 1;
        let created = Review {
            id: tables.last_review_id,
            book_id: review.book_id,
            review_text: review.review_text,
            rating: review.rating,
        };
        tables
            .reviews_by_book
            .entry(created.book_id)
            .or_default()
            .push(created.id);
        tables.reviews.insert(created.id, created.clone());
        Ok(created)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;
    use std::sync::Arc;

    fn new_book(title: &str, author: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: author.to_string(),
        }
    }

    fn new_review(book_id: BookId, text: &str) -> NewReview {
        NewReview {
            book_id,
            review_text: text.to_string(),
            rating: Rating::from_stored(4.0),
        }
    }

    #[tokio::test]
    async fn test_ids_are_generated_in_order() {
        let store = MemoryStore::new();
        let dune = store.create_book(new_book("Dune", "Herbert")).await.unwrap();
        let emma = store.create_book(new_book("Emma", "Austen")).await.unwrap();

        assert_eq!(dune.id, 1);
        assert_eq!(emma.id, 2);

        let titles: Vec<_> = store
            .list_books()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Dune", "Emma"]);
    }

    #[tokio::test]
    async fn test_duplicate_identity_rejected() {
        let store = MemoryStore::new();
        store.create_book(new_book("Dune", "Herbert")).await.unwrap();

        let err = store
            .create_book(new_book("Dune", "Herbert"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        // Same title by another author is a different book
        assert!(store.create_book(new_book("Dune", "Someone")).await.is_ok());
        assert_eq!(store.list_books().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_identity() {
        let store = MemoryStore::new();
        let dune = store.create_book(new_book("Dune", "Herbert")).await.unwrap();

        assert_eq!(
            store.find_book_by_identity("Dune", "Herbert").await.unwrap(),
            Some(dune)
        );
        assert!(store
            .find_book_by_identity("Dune", "herbert")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_review_requires_existing_book() {
        let store = MemoryStore::new();

        let err = store
            .create_review(new_review(999_999, "Orphan"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingParent(_)));
        assert!(store.list_reviews(999_999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reviews_scoped_to_book() {
        let store = MemoryStore::new();
        let dune = store.create_book(new_book("Dune", "Herbert")).await.unwrap();
        let emma = store.create_book(new_book("Emma", "Austen")).await.unwrap();

        store.create_review(new_review(dune.id, "Great")).await.unwrap();
        store.create_review(new_review(emma.id, "Witty")).await.unwrap();
        store.create_review(new_review(dune.id, "Long")).await.unwrap();

        let texts: Vec<_> = store
            .list_reviews(dune.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.review_text)
            .collect();
        assert_eq!(texts, vec!["Great", "Long"]);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_creation_admits_one() {
        let store = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create_book(new_book("Dune", "Herbert")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.list_books().await.unwrap().len(), 1);
    }
}
