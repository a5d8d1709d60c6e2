//! Entities plus the request and response models of the books API.

pub mod entities;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use entities::{Book, BookId, NewBook, NewReview, Rating, Review, ReviewId};
pub use requests::{CreateBookRequest, CreateReviewRequest};
pub use responses::{
    BookCreatedResponse, BookReviewsResponse, ErrorResponse, HealthResponse,
    ReviewCreatedResponse, ReviewSummary, StatsResponse,
};
