//! Versioned cache payload codec.
//!
//! Values are stored as `{"v":<version>,"data":<value>}` JSON. A payload
//! written under another version is a decode error, which readers treat as
//! a miss.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{CacheError, CacheResult};

/// Schema version of the cached response shapes.
///
/// Bump whenever a cached type changes its serialized form.
pub const PAYLOAD_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a, T> {
    v: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct RawEnvelope {
    v: u32,
    data: serde_json::Value,
}

pub fn encode<T: Serialize>(value: &T) -> CacheResult<String> {
    Ok(serde_json::to_string(&Envelope {
        v: PAYLOAD_VERSION,
        data: value,
    })?)
}

pub fn decode<T: DeserializeOwned>(payload: &str) -> CacheResult<T> {
    let raw: RawEnvelope = serde_json::from_str(payload)?;
    if raw.v != PAYLOAD_VERSION {
        return Err(CacheError::Codec(format!(
            "payload version {} does not match {}",
            raw.v, PAYLOAD_VERSION
        )));
    }
    Ok(serde_json::from_value(raw.data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, BookReviewsResponse, Rating, ReviewSummary};

    #[test]
    fn test_encoded_shape() {
        let books = vec![Book {
            id: 1,
            title: "Dune".into(),
            author: "Herbert".into(),
        }];
        let payload = encode(&books).unwrap();
        let json: serde_json::Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(json["v"], PAYLOAD_VERSION);
        assert_eq!(json["data"][0]["title"], "Dune");
        assert_eq!(decode::<Vec<Book>>(&payload).unwrap(), books);
    }

    #[test]
    fn test_decoded_value_serializes_identically() {
        let response = BookReviewsResponse {
            message: "Book: Dune".into(),
            reviews: vec![ReviewSummary {
                review_text: "Great".into(),
                rating: Rating::from_stored(5.0),
            }],
        };
        let decoded: BookReviewsResponse = decode(&encode(&response).unwrap()).unwrap();

        assert_eq!(
            serde_json::to_string(&decoded).unwrap(),
            serde_json::to_string(&response).unwrap()
        );
    }

    #[test]
    fn test_rejects_other_versions() {
        let stale = r#"{"v":0,"data":[]}"#;
        assert!(matches!(
            decode::<Vec<Book>>(stale),
            Err(CacheError::Codec(_))
        ));
    }

    #[test]
    fn test_rejects_unversioned_payloads() {
        // Bare JSON as written by older deployments
        assert!(decode::<Vec<Book>>(r#"[{"id":1,"title":"Dune","author":"Herbert"}]"#).is_err());
        assert!(decode::<Vec<Book>>("not json").is_err());
    }

    #[test]
    fn test_rejects_mismatched_shape() {
        let payload = encode(&vec![1, 2, 3]).unwrap();
        assert!(decode::<Vec<Book>>(&payload).is_err());
    }
}
