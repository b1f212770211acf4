//! REST client for the bookstore backend.
//!
//! # Architecture
//!
//! - One request path for every remote resource: same auth header, same
//!   status mapping, same decode step
//! - The backend is the source of truth - no local sync, direct API calls
//! - In-memory caching via `moka` for catalog responses (5 minute TTL);
//!   customer, cart, and coupon calls are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use bookstore_storefront::api::ApiClient;
//!
//! let api = ApiClient::new(&config.api);
//!
//! // Fetch a book and the names shown next to it
//! let book = api.book(book_id).await?;
//! let (author, publisher) = tokio::join!(
//!     api.author_label(book.author_id),
//!     api.publisher_label(book.publisher_id),
//! );
//! ```

mod cache;
mod cart;
mod catalog;
mod client;
mod customers;
pub mod types;

pub use client::ApiClient;

use thiserror::Error;

/// Errors that can occur when calling the bookstore backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the request.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or rejected credentials.
    #[error("Unauthorized")]
    Unauthorized,

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl ApiError {
    /// Message suitable for showing to the customer, if the backend
    /// provided one.
    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Pull the human-readable message out of an error body.
///
/// The backend wraps errors as `{"message": "..."}`; anything else yields
/// `None` so callers can fall back to the raw body.
fn extract_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("/api/books/99".to_string());
        assert_eq!(err.to_string(), "Not found: /api/books/99");

        let err = ApiError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 500 - boom");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ApiError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_extract_message_from_json_body() {
        let body = r#"{"message": "Email already registered"}"#;
        assert_eq!(
            extract_message(body),
            Some("Email already registered".to_string())
        );
    }

    #[test]
    fn test_extract_message_ignores_blank_and_malformed_bodies() {
        assert_eq!(extract_message(r#"{"message": "  "}"#), None);
        assert_eq!(extract_message("<html>502 Bad Gateway</html>"), None);
        assert_eq!(extract_message(""), None);
    }

    #[test]
    fn test_user_message_only_for_api_errors() {
        let err = ApiError::Api {
            status: 400,
            message: "Coupon expired".to_string(),
        };
        assert_eq!(err.user_message(), Some("Coupon expired"));

        assert_eq!(ApiError::Unauthorized.user_message(), None);
        let blank = ApiError::Api {
            status: 400,
            message: String::new(),
        };
        assert_eq!(blank.user_message(), None);
    }
}
