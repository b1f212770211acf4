//! Cache values for catalog responses.

use super::types::{Author, Book};

/// Cached catalog payloads, keyed by strings like `book:{id}`.
///
/// Name entries keep negative results too, so a missing author name does
/// not re-hit the backend on every card render.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Book(Box<Book>),
    Books(Vec<Book>),
    Author(Box<Author>),
    Name(Option<String>),
}
