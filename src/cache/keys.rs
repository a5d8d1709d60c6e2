//! Cache key naming.
//!
//! Every cached query shape maps to exactly one key string, and distinct
//! shapes never share one.

use std::fmt;

use crate::models::BookId;

/// Logical query whose result is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The all-books listing
    AllBooks,
    /// The reviews listing of one book
    BookReviews(BookId),
}

impl CacheKey {
    const ALL_BOOKS: &'static str = "books";
    const REVIEW_PREFIX: &'static str = "review:";
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::AllBooks => f.write_str(Self::ALL_BOOKS),
            CacheKey::BookReviews(id) => write!(f, "{}{}", Self::REVIEW_PREFIX, id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_key_strings() {
        assert_eq!(CacheKey::AllBooks.to_string(), "books");
        assert_eq!(CacheKey::BookReviews(1).to_string(), "review:1");
        assert_eq!(CacheKey::BookReviews(-7).to_string(), "review:-7");
    }

    proptest! {
        #[test]
        fn prop_distinct_queries_never_collide(a in any::<i64>(), b in any::<i64>()) {
            let ka = CacheKey::BookReviews(a).to_string();
            let kb = CacheKey::BookReviews(b).to_string();
            prop_assert_eq!(ka == kb, a == b);
            prop_assert_ne!(ka, CacheKey::AllBooks.to_string());
        }
    }
}
