//! Request DTOs for the books API
//!
//! Fields are optional at the serde level so that missing fields surface as
//! our own validation errors rather than extractor rejections.

use serde::Deserialize;
use serde_json::Value;

use crate::models::{BookId, NewBook, NewReview, Rating};

/// Request body for POST /books
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBookRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl CreateBookRequest {
    /// Validates the request into the fields to persist.
    ///
    /// Title and author must be present and not blank; both are trimmed.
    pub fn validate(self) -> Result<NewBook, String> {
        match (non_blank(self.title), non_blank(self.author)) {
            (Some(title), Some(author)) => Ok(NewBook { title, author }),
            _ => Err("Missing title or author".to_string()),
        }
    }
}

/// Request body for POST /books/:id/review
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub review_text: Option<String>,
    /// Kept untyped so a non-numeric rating is reported like a missing one
    #[serde(default)]
    pub rating: Option<Value>,
}

impl CreateReviewRequest {
    pub fn validate(self, book_id: BookId) -> Result<NewReview, String> {
        let review_text = non_blank(self.review_text);
        let score = self.rating.as_ref().and_then(Value::as_f64);

        let (Some(review_text), Some(score)) = (review_text, score) else {
            return Err("Missing reviewText or rating".to_string());
        };

        let rating = Rating::new(score).ok_or_else(|| {
            format!(
                "Rating must be between {} and {}",
                Rating::MIN,
                Rating::MAX
            )
        })?;

        Ok(NewReview {
            book_id,
            review_text,
            rating,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
