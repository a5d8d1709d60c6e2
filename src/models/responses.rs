//! Response DTOs for the books API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::models::{Book, Rating, Review};

/// Response body for POST /books
#[derive(Debug, Clone, Serialize)]
pub struct BookCreatedResponse {
    pub message: String,
    pub book: Book,
}

impl BookCreatedResponse {
    pub fn new(book: Book) -> Self {
        Self {
            message: "Book added".to_string(),
            book,
        }
    }
}

/// Response body for POST /books/:id/review
#[derive(Debug, Clone, Serialize)]
pub struct ReviewCreatedResponse {
    pub message: String,
    pub review: Review,
}

impl ReviewCreatedResponse {
    pub fn new(review: Review) -> Self {
        Self {
            message: "Review added".to_string(),
            review,
        }
    }
}

/// One entry of a book's review listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub review_text: String,
    pub rating: Rating,
}

/// Response body for GET /books/:id/review
///
/// Cached as-is under the book's review key, so hits and misses return the
/// same document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookReviewsResponse {
    pub message: String,
    pub reviews: Vec<ReviewSummary>,
}

impl BookReviewsResponse {
    pub fn new(book: &Book, reviews: &[Review]) -> Self {
        Self {
            message: format!("Book: {}", book.title),
            reviews: reviews
                .iter()
                .map(|review| ReviewSummary {
                    review_text: review.review_text.clone(),
                    rating: review.rating,
                })
                .collect(),
        }
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// Current timestamp in RFC 3339 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self::with_status("healthy")
    }

    /// The persistence store failed its health check.
    pub fn degraded() -> Self {
        Self::with_status("degraded")
    }

    fn with_status(status: &str) -> Self {
        Self {
            status: status.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
