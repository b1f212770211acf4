//! Dashboard route handler: the book grid with search.

use std::collections::{HashMap, HashSet};

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use bookstore_core::AuthorId;
use serde::Deserialize;
use tokio::task::JoinSet;
use tracing::instrument;

use crate::api::ApiClient;
use crate::api::types::Book;
use crate::filters;
use crate::middleware::CustomerSession;
use crate::state::AppState;

use super::Nav;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Book card display data for the grid.
#[derive(Clone)]
pub struct BookCardView {
    pub id: String,
    pub title: String,
    pub author: String,
    pub price: String,
    pub image_url: Option<String>,
}

impl BookCardView {
    fn from_book(book: &Book, author: String) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title.clone(),
            author,
            price: book.price.to_string(),
            image_url: if book.book_image_url.is_empty() {
                None
            } else {
                Some(book.book_image_url.clone())
            },
        }
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub nav: Nav,
    pub query: String,
    pub books: Vec<BookCardView>,
    pub load_error: bool,
}

/// Display the dashboard: the full catalog, or the backend's search
/// results when `?q=` is present.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: CustomerSession,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let nav = Nav::for_visitor(&session);
    let term = query.q.trim();

    let (books, load_error) = match state
        .api()
        .list_books(if term.is_empty() { None } else { Some(term) })
        .await
    {
        Ok(books) => (books, false),
        Err(e) => {
            tracing::error!("Failed to fetch book list: {e}");
            (Vec::new(), true)
        }
    };

    let labels = author_labels(state.api(), &books).await;
    let books = books
        .iter()
        .map(|book| {
            let author = labels
                .get(&book.author_id)
                .cloned()
                .unwrap_or_else(|| format!("Author #{}", book.author_id));
            BookCardView::from_book(book, author)
        })
        .collect();

    DashboardTemplate {
        nav,
        query: term.to_string(),
        books,
        load_error,
    }
}

/// Resolve display names for every distinct author in the grid, all
/// lookups in flight at once. Failed lookups fall back inside
/// `author_label`, so the map is only missing an id when its task
/// panicked.
async fn author_labels(api: &ApiClient, books: &[Book]) -> HashMap<AuthorId, String> {
    let mut tasks = JoinSet::new();
    let mut seen = HashSet::new();

    for book in books {
        if !seen.insert(book.author_id) {
            continue;
        }
        let api = api.clone();
        let author_id = book.author_id;
        tasks.spawn(async move { (author_id, api.author_label(author_id).await) });
    }

    let mut labels = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((author_id, label)) => {
                labels.insert(author_id, label);
            }
            Err(e) => tracing::warn!("Author label task failed: {e}"),
        }
    }

    labels
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_book_card_view_mapping() {
        let book: Book = serde_json::from_str(
            r#"{
                "id": 5,
                "title": "Dune",
                "authorId": 3,
                "publisherId": 7,
                "price": 129.5,
                "bookImageUrl": "https://cdn.example.com/dune.jpg"
            }"#,
        )
        .unwrap();

        let view = BookCardView::from_book(&book, "Frank Herbert".to_string());
        assert_eq!(view.id, "5");
        assert_eq!(view.title, "Dune");
        assert_eq!(view.author, "Frank Herbert");
        assert_eq!(view.price, "129.50 TL");
        assert_eq!(view.image_url.as_deref(), Some("https://cdn.example.com/dune.jpg"));
    }

    #[test]
    fn test_book_card_without_image() {
        let book: Book = serde_json::from_str(
            r#"{"id": 5, "title": "Dune", "authorId": 3, "publisherId": 7, "price": 10}"#,
        )
        .unwrap();
        let view = BookCardView::from_book(&book, "Frank Herbert".to_string());
        assert_eq!(view.image_url, None);
    }

    #[test]
    fn test_empty_dashboard_renders_the_no_books_message() {
        let page = DashboardTemplate {
            nav: Nav { signed_in: false },
            query: String::new(),
            books: Vec::new(),
            load_error: false,
        }
        .render()
        .unwrap();

        assert!(page.contains("No books found."));
        assert!(page.contains(r#"href="/auth/login""#));
        assert!(!page.contains("Could not load books"));
    }

    #[test]
    fn test_dashboard_escapes_the_search_query() {
        let page = DashboardTemplate {
            nav: Nav { signed_in: true },
            query: "<script>alert(1)</script>".to_string(),
            books: Vec::new(),
            load_error: false,
        }
        .render()
        .unwrap();

        // The tag must not survive; the inert text does.
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("alert(1)"));
    }
}
