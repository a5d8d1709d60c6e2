//! API Handlers
//!
//! Each read handler goes through the cache-aside path; each write handler
//! validates, persists, and only then invalidates the keys it made stale.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::cache::{CacheAside, CacheKey, MemoryCache};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    Book, BookCreatedResponse, BookId, BookReviewsResponse, CreateBookRequest,
    CreateReviewRequest, HealthResponse, ReviewCreatedResponse, StatsResponse,
};
use crate::store::{BookStore, MemoryStore};

/// Application state shared across all handlers.
///
/// Store handles are built once at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    /// Source of truth
    pub store: Arc<dyn BookStore>,
    /// Cache-aside policy over the cache backend
    pub cache: CacheAside,
}

impl AppState {
    pub fn new(store: Arc<dyn BookStore>, cache: CacheAside) -> Self {
        Self { store, cache }
    }

    /// In-memory store and cache, sized and timed from `config`.
    pub fn in_memory(config: &Config) -> Self {
        let cache = MemoryCache::new(config.cache_max_entries);
        Self::new(
            Arc::new(MemoryStore::new()),
            CacheAside::from_config(Arc::new(cache), config),
        )
    }
}

fn parse_book_id(raw: &str) -> Result<BookId> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::Validation("Invalid book ID".to_string()))
}

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

/// Handler for GET /books
pub async fn list_books_handler(State(state): State<AppState>) -> Result<Json<Vec<Book>>> {
    let store = state.store.clone();
    let books = state
        .cache
        .read_through(&CacheKey::AllBooks, || async move {
            store.list_books().await.map(Some).map_err(ApiError::from)
        })
        .await?;

    Ok(Json(books.unwrap_or_default()))
}

/// Handler for POST /books
pub async fn create_book_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookCreatedResponse>)> {
    let new_book = json_body(payload)?
        .validate()
        .map_err(ApiError::Validation)?;

    // The store's uniqueness guard covers creations racing past this check
    if state
        .store
        .find_book_by_identity(&new_book.title, &new_book.author)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Book already exists".to_string()));
    }

    let book = state.store.create_book(new_book).await?;
    info!(book_id = book.id, "Book created");

    state.cache.invalidate(&CacheKey::AllBooks).await;

    Ok((StatusCode::CREATED, Json(BookCreatedResponse::new(book))))
}

/// Handler for GET /books/:id/review
///
/// An absent book and a book without reviews are both 404 and neither is cached.
pub async fn list_reviews_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<BookReviewsResponse>> {
    let book_id = parse_book_id(&raw_id)?;
    let store = state.store.clone();

    let response = state
        .cache
        .read_through(&CacheKey::BookReviews(book_id), || async move {
            let book = store
                .find_book(book_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;

            let reviews = store.list_reviews(book_id).await?;
            if reviews.is_empty() {
                return Err(ApiError::NotFound(
                    "No reviews found for this book".to_string(),
                ));
            }

            Ok::<_, ApiError>(Some(BookReviewsResponse::new(&book, &reviews)))
        })
        .await?
        .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;

    Ok(Json(response))
}

/// Handler for POST /books/:id/review
pub async fn create_review_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: std::result::Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ReviewCreatedResponse>)> {
    let book_id = parse_book_id(&raw_id)?;
    let new_review = json_body(payload)?
        .validate(book_id)
        .map_err(ApiError::Validation)?;

    if state.store.find_book(book_id).await?.is_none() {
        return Err(ApiError::NotFound("Book not found".to_string()));
    }

    let review = state.store.create_review(new_review).await?;
    info!(book_id, review_id = review.id, "Review created");

    state.cache.invalidate(&CacheKey::BookReviews(book_id)).await;

    Ok((StatusCode::CREATED, Json(ReviewCreatedResponse::new(review))))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().await.into())
}

/// Handler for GET /health
///
/// Reports degraded when the persistence store is unreachable; the cache is
/// optional and does not affect health.
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::healthy())),
        Err(err) => {
            tracing::error!(error = %err, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::degraded()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FailingStore;

    fn test_state() -> AppState {
        AppState::in_memory(&Config::default())
    }

    fn book_body(title: &str, author: &str) -> Json<CreateBookRequest> {
        Json(CreateBookRequest {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
        })
    }

    fn review_body(text: &str, rating: serde_json::Value) -> Json<CreateReviewRequest> {
        Json(CreateReviewRequest {
            review_text: Some(text.to_string()),
            rating: Some(rating),
        })
    }

    #[tokio::test]
    async fn test_create_and_list_books() {
        let state = test_state();

        let (status, created) =
            create_book_handler(State(state.clone()), Ok(book_body("Dune", "Herbert")))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.book.id, 1);

        let Json(books) = list_books_handler(State(state)).await.unwrap();
        assert_eq!(books, vec![created.book.clone()]);
    }

    #[tokio::test]
    async fn test_duplicate_book_is_conflict() {
        let state = test_state();
        let _ = create_book_handler(State(state.clone()), Ok(book_body("Dune", "Herbert")))
            .await
            .unwrap();

        let result =
            create_book_handler(State(state.clone()), Ok(book_body("Dune", "Herbert"))).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
        assert_eq!(state.store.list_books().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_author_creates_nothing() {
        let state = test_state();
        let body = Json(CreateBookRequest {
            title: Some("Dune".to_string()),
            author: None,
        });

        let result = create_book_handler(State(state.clone()), Ok(body)).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(state.store.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reviews_round_trip() {
        let state = test_state();
        let _ = create_book_handler(State(state.clone()), Ok(book_body("Dune", "Herbert")))
            .await
            .unwrap();

        let (status, _) = create_review_handler(
            State(state.clone()),
            Path("1".to_string()),
            Ok(review_body("Great", serde_json::json!(5))),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(listing) = list_reviews_handler(State(state), Path("1".to_string()))
            .await
            .unwrap();
        assert_eq!(listing.message, "Book: Dune");
        assert_eq!(listing.reviews.len(), 1);
        assert_eq!(listing.reviews[0].review_text, "Great");
    }

    #[tokio::test]
    async fn test_review_for_missing_book() {
        let state = test_state();

        let result = create_review_handler(
            State(state.clone()),
            Path("999999".to_string()),
            Ok(review_body("Orphan", serde_json::json!(3))),
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert!(state.store.list_reviews(999_999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_book_id() {
        let state = test_state();

        let result = list_reviews_handler(State(state.clone()), Path("abc".to_string())).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let result = create_review_handler(
            State(state),
            Path("1.5".to_string()),
            Ok(review_body("Great", serde_json::json!(5))),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_book_without_reviews_is_not_found() {
        let state = test_state();
        let _ = create_book_handler(State(state.clone()), Ok(book_body("Dune", "Herbert")))
            .await
            .unwrap();

        let result = list_reviews_handler(State(state.clone()), Path("1".to_string())).await;
        match result {
            Err(ApiError::NotFound(msg)) => assert_eq!(msg, "No reviews found for this book"),
            other => panic!("expected not found, got {:?}", other.map(|j| j.0)),
        }
        assert!(state.cache.backend().get("review:1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let state = AppState::new(Arc::new(FailingStore), test_state().cache);

        let result = list_books_handler(State(state.clone())).await;
        assert!(matches!(result, Err(ApiError::Store(_))));

        let (status, Json(health)) = health_handler(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(health.status, "degraded");
    }

    #[tokio::test]
    async fn test_health_and_stats() {
        let state = test_state();

        let (status, Json(health)) = health_handler(State(state.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(health.status, "healthy");

        let Json(miss) = list_books_handler(State(state.clone())).await.unwrap();
        let Json(hit) = list_books_handler(State(state.clone())).await.unwrap();
        assert_eq!(miss, hit);

        let Json(stats) = stats_handler(State(state)).await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
