//! Catalog lookups: books, authors, publishers.
//!
//! Everything in here is public data and safe to cache; the short TTL
//! keeps stock counts from going too stale.

use bookstore_core::{AuthorId, BookId, PublisherId};
use tracing::{debug, instrument};

use super::ApiError;
use super::cache::CacheValue;
use super::client::ApiClient;
use super::types::{Author, Book};

impl ApiClient {
    /// List the catalog, optionally filtered by the backend's search.
    ///
    /// The unfiltered listing is cached; searches always hit the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be parsed.
    #[instrument(skip(self))]
    pub async fn list_books(&self, query: Option<&str>) -> Result<Vec<Book>, ApiError> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());

        if let Some(q) = query {
            let path = format!("/api/books?query={}", urlencoding::encode(q));
            return self.get_json(&path, None).await;
        }

        let cache_key = "books:all".to_string();

        if let Some(CacheValue::Books(books)) = self.cache().get(&cache_key).await {
            debug!("Cache hit for book list");
            return Ok(books);
        }

        let books: Vec<Book> = self.get_json("/api/books", None).await?;

        self.cache()
            .insert(cache_key, CacheValue::Books(books.clone()))
            .await;

        Ok(books)
    }

    /// Get a book by its id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id, or an error if
    /// the request fails.
    #[instrument(skip(self), fields(book_id = %book_id))]
    pub async fn book(&self, book_id: BookId) -> Result<Book, ApiError> {
        let cache_key = format!("book:{book_id}");

        if let Some(CacheValue::Book(book)) = self.cache().get(&cache_key).await {
            debug!("Cache hit for book");
            return Ok(*book);
        }

        let book: Book = self.get_json(&format!("/api/books/{book_id}"), None).await?;

        self.cache()
            .insert(cache_key, CacheValue::Book(Box::new(book.clone())))
            .await;

        Ok(book)
    }

    /// Author display name from the plain-text name endpoint.
    ///
    /// `Ok(None)` when the backend has no name for the id (including 404),
    /// so callers can fall through to the next source.
    ///
    /// # Errors
    ///
    /// Returns an error if the request itself fails.
    #[instrument(skip(self), fields(author_id = %author_id))]
    pub async fn author_name(&self, author_id: AuthorId) -> Result<Option<String>, ApiError> {
        let cache_key = format!("author-name:{author_id}");

        if let Some(CacheValue::Name(name)) = self.cache().get(&cache_key).await {
            debug!("Cache hit for author name");
            return Ok(name);
        }

        let path = format!("/api/books/authors/{author_id}/name");
        let name = match self.get_text(&path, None).await {
            Ok(name) => name,
            Err(ApiError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        self.cache()
            .insert(cache_key, CacheValue::Name(name.clone()))
            .await;

        Ok(name)
    }

    /// Publisher display name from the plain-text name endpoint.
    ///
    /// Same contract as [`Self::author_name`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request itself fails.
    #[instrument(skip(self), fields(publisher_id = %publisher_id))]
    pub async fn publisher_name(
        &self,
        publisher_id: PublisherId,
    ) -> Result<Option<String>, ApiError> {
        let cache_key = format!("publisher-name:{publisher_id}");

        if let Some(CacheValue::Name(name)) = self.cache().get(&cache_key).await {
            debug!("Cache hit for publisher name");
            return Ok(name);
        }

        let path = format!("/api/books/publishers/{publisher_id}/name");
        let name = match self.get_text(&path, None).await {
            Ok(name) => name,
            Err(ApiError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        self.cache()
            .insert(cache_key, CacheValue::Name(name.clone()))
            .await;

        Ok(name)
    }

    /// Full author record, the fallback when the name endpoint is empty.
    ///
    /// Note the backend serves this one without the `/api` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id, or an error if
    /// the request fails.
    #[instrument(skip(self), fields(author_id = %author_id))]
    pub async fn author(&self, author_id: AuthorId) -> Result<Author, ApiError> {
        let cache_key = format!("author:{author_id}");

        if let Some(CacheValue::Author(author)) = self.cache().get(&cache_key).await {
            debug!("Cache hit for author");
            return Ok(*author);
        }

        let author: Author = self.get_json(&format!("/authors/{author_id}"), None).await?;

        self.cache()
            .insert(cache_key, CacheValue::Author(Box::new(author.clone())))
            .await;

        Ok(author)
    }

    /// Best display name for an author: the name endpoint, then the
    /// author record, then a positional fallback. Lookup failures are
    /// logged and degrade to the fallback, never an error.
    pub async fn author_label(&self, author_id: AuthorId) -> String {
        match self.author_name(author_id).await {
            Ok(Some(name)) => return name,
            Ok(None) => {}
            Err(e) => debug!(error = %e, "Author name lookup failed"),
        }

        match self.author(author_id).await {
            Ok(author) => {
                let name = author.display_name();
                if !name.is_empty() {
                    return name;
                }
            }
            Err(e) => debug!(error = %e, "Author record lookup failed"),
        }

        format!("Author #{author_id}")
    }

    /// Best display name for a publisher, falling back positionally.
    pub async fn publisher_label(&self, publisher_id: PublisherId) -> String {
        match self.publisher_name(publisher_id).await {
            Ok(Some(name)) => name,
            Ok(None) => format!("Publisher #{publisher_id}"),
            Err(e) => {
                debug!(error = %e, "Publisher name lookup failed");
                format!("Publisher #{publisher_id}")
            }
        }
    }
}
