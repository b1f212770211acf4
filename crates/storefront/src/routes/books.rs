//! Book detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bookstore_core::BookId;
use tracing::instrument;

use crate::api::ApiError;
use crate::api::types::Book;
use crate::filters;
use crate::middleware::CustomerSession;
use crate::state::AppState;

use super::Nav;

/// Book display data for the detail page.
#[derive(Clone)]
pub struct BookDetailView {
    pub id: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub price: String,
    pub format: String,
    pub language: String,
    pub genre: String,
    pub date: String,
    pub page_number: u32,
    pub isbn: String,
    pub stock: i32,
    pub image_url: Option<String>,
}

impl BookDetailView {
    fn from_book(book: &Book, author: String, publisher: String) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title.clone(),
            author,
            publisher,
            price: book.price.to_string(),
            format: book.format.clone(),
            language: book.language.clone(),
            genre: book.genre.clone(),
            date: book.date.clone(),
            page_number: book.page_number,
            isbn: book.isbn.clone(),
            stock: book.stock,
            image_url: if book.book_image_url.is_empty() {
                None
            } else {
                Some(book.book_image_url.clone())
            },
        }
    }
}

/// Book detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "books/show.html")]
pub struct BookShowTemplate {
    pub nav: Nav,
    pub book: BookDetailView,
}

/// Fallback page when the book cannot be shown.
#[derive(Template, WebTemplate)]
#[template(path = "books/missing.html")]
pub struct BookMissingTemplate {
    pub nav: Nav,
    pub message: &'static str,
}

/// Display the book detail page.
///
/// The author and publisher names are looked up simultaneously once the
/// book record arrives; both degrade to positional labels on their own.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: CustomerSession,
    Path(book_id): Path<BookId>,
) -> Response {
    let nav = Nav::for_visitor(&session);

    match state.api().book(book_id).await {
        Ok(book) => {
            let (author, publisher) = tokio::join!(
                state.api().author_label(book.author_id),
                state.api().publisher_label(book.publisher_id),
            );

            BookShowTemplate {
                nav,
                book: BookDetailView::from_book(&book, author, publisher),
            }
            .into_response()
        }
        Err(ApiError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            BookMissingTemplate {
                nav,
                message: "Book not found",
            },
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to fetch book {book_id}: {e}");
            (
                StatusCode::BAD_GATEWAY,
                BookMissingTemplate {
                    nav,
                    message: "Could not load book",
                },
            )
                .into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_book_detail_view_mapping() {
        let book: Book = serde_json::from_str(
            r#"{
                "id": 12,
                "title": "Dune",
                "authorId": 3,
                "publisherId": 7,
                "price": 129.5,
                "format": "PAPERBACK",
                "language": "ENGLISH",
                "genre": "SCIENCE_FICTION",
                "date": "1965-08-01",
                "pageNumber": 412,
                "isbn": "9780441013593",
                "stock": 14
            }"#,
        )
        .unwrap();

        let view =
            BookDetailView::from_book(&book, "Frank Herbert".to_string(), "Ace".to_string());
        assert_eq!(view.price, "129.50 TL");
        assert_eq!(view.author, "Frank Herbert");
        assert_eq!(view.publisher, "Ace");
        assert_eq!(view.page_number, 412);
        assert_eq!(view.image_url, None);
    }
}
