//! Persisted entities.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub type BookId = i64;
pub type ReviewId = i64;

/// A book row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
}

/// A review row. Always references an existing [`Book`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub book_id: BookId,
    pub review_text: String,
    pub rating: Rating,
}

/// Validated fields of a book about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
}

/// Validated fields of a review about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub book_id: BookId,
    pub review_text: String,
    pub rating: Rating,
}

// == Rating ==
/// Numeric review score.
///
/// Integral scores serialize as JSON integers (`5`, not `5.0`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rating(f64);

impl Rating {
    pub const MIN: f64 = 1.0;
    pub const MAX: f64 = 5.0;

    /// Accepts finite scores within `MIN..=MAX`.
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && (Self::MIN..=Self::MAX).contains(&value)).then_some(Self(value))
    }

    /// Wraps a score read back from a store, which was validated on the way in.
    pub fn from_stored(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

// Largest magnitude at which every integer is exactly representable as f64
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract() == 0.0 && self.0.abs() < EXACT_INT_LIMIT {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Rating::from_stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(1.0).is_some());
        assert!(Rating::new(4.5).is_some());
        assert!(Rating::new(5.0).is_some());
        assert!(Rating::new(0.99).is_none());
        assert!(Rating::new(5.01).is_none());
        assert!(Rating::new(f64::NAN).is_none());
        assert!(Rating::new(f64::INFINITY).is_none());
    }

    #[test]
    fn test_rating_serialization() {
        assert_eq!(serde_json::to_value(Rating::from_stored(5.0)).unwrap(), json!(5));
        assert_eq!(serde_json::to_value(Rating::from_stored(4.5)).unwrap(), json!(4.5));
    }

    #[test]
    fn test_review_wire_shape() {
        let review = Review {
            id: 3,
            book_id: 1,
            review_text: "Great".into(),
            rating: Rating::from_stored(5.0),
        };

        assert_eq!(
            serde_json::to_value(&review).unwrap(),
            json!({"id": 3, "bookId": 1, "reviewText": "Great", "rating": 5})
        );
    }
}
