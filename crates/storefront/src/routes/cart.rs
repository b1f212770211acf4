//! Cart route handlers.
//!
//! Every mutation posts to the backend and redirects back to the cart
//! page with a flash code; the page itself re-fetches the cart so the
//! totals always come from what the backend actually holds.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Form, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use bookstore_core::{BookId, CartItemId, Price};
use serde::Deserialize;
use tracing::instrument;

use crate::api::types::CartItem;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::{MessageQuery, Nav};

/// One cart line prepared for display.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub title: String,
    pub author: String,
    pub price: String,
    pub quantity: u32,
    /// Quantity the minus button submits; zero means "remove".
    pub prev_quantity: u32,
    /// Quantity the plus button submits.
    pub next_quantity: u32,
    pub line_total: String,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.to_string(),
            title: item.title.clone(),
            author: item.author.clone(),
            price: item.price.to_string(),
            quantity: item.quantity,
            prev_quantity: item.quantity.saturating_sub(1),
            next_quantity: item.quantity.saturating_add(1),
            line_total: item.line_total().to_string(),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub nav: Nav,
    pub lines: Vec<CartLineView>,
    pub total_items: u32,
    pub total_price: String,
    pub load_error: bool,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Form body for adding a book from its detail page.
#[derive(Debug, Deserialize)]
pub struct AddForm {
    pub book_id: BookId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Form body for the quantity stepper buttons.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub quantity: u32,
}

/// Form body for the coupon field.
#[derive(Debug, Deserialize)]
pub struct CouponForm {
    #[serde(default)]
    pub code: String,
}

/// Item count and price total across all cart lines, weighted by
/// quantity.
fn totals(items: &[CartItem]) -> (u32, Price) {
    let count = items.iter().map(|item| item.quantity).sum();
    let total = items.iter().map(CartItem::line_total).sum();
    (count, total)
}

/// Map an error flash code to the banner shown on the cart page.
fn error_message(code: &str) -> &'static str {
    match code {
        "add" => "Could not add the book to your cart.",
        "update" => "Could not update the quantity.",
        "remove" => "Could not remove the item.",
        "empty_code" => "Enter a coupon code first.",
        "coupon" => "Could not apply that coupon code.",
        "order" => "Could not place your order.",
        _ => "Something went wrong.",
    }
}

/// Map a success flash code to its banner.
fn success_message(code: &str) -> &'static str {
    match code {
        "coupon" => "Coupon applied.",
        "order" => "Order placed. Thank you!",
        _ => "Done.",
    }
}

/// Display the cart page.
#[instrument(skip(state, customer))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
    Query(messages): Query<MessageQuery>,
) -> Response {
    let nav = Nav { signed_in: true };

    let (lines, total_items, total_price, load_error) =
        match state.api().cart_items(customer.id, customer.bearer()).await {
            Ok(items) => {
                let (count, total) = totals(&items);
                let lines = items.iter().map(CartLineView::from).collect();
                (lines, count, total, false)
            }
            Err(e) => {
                tracing::error!("Failed to fetch cart: {e}");
                (Vec::new(), 0, Price::ZERO, true)
            }
        };

    CartTemplate {
        nav,
        lines,
        total_items,
        total_price: total_price.to_string(),
        load_error,
        error: messages.error.as_deref().map(error_message),
        success: messages.success.as_deref().map(success_message),
    }
    .into_response()
}

/// Add a book to the cart and come back to it.
#[instrument(skip(state, customer))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
    Form(form): Form<AddForm>,
) -> Redirect {
    let quantity = form.quantity.max(1);

    match state
        .api()
        .add_cart_item(customer.id, form.book_id, quantity, customer.bearer())
        .await
    {
        Ok(()) => {
            add_breadcrumb(
                "cart",
                "Added book to cart",
                Some(&[("book_id", &form.book_id.to_string())]),
            );
            Redirect::to("/cart")
        }
        Err(e) => {
            tracing::error!("Failed to add book {} to cart: {e}", form.book_id);
            Redirect::to("/cart?error=add")
        }
    }
}

/// Set a cart line to the submitted quantity; zero removes the line.
#[instrument(skip(state, customer))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
    Path(item_id): Path<CartItemId>,
    Form(form): Form<QuantityForm>,
) -> Redirect {
    let result = if form.quantity == 0 {
        state
            .api()
            .remove_cart_item(item_id, customer.bearer())
            .await
    } else {
        state
            .api()
            .set_cart_quantity(item_id, form.quantity, customer.bearer())
            .await
    };

    match result {
        Ok(()) => Redirect::to("/cart"),
        Err(e) => {
            tracing::error!("Failed to update cart item {item_id}: {e}");
            Redirect::to("/cart?error=update")
        }
    }
}

/// Remove a cart line.
#[instrument(skip(state, customer))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
    Path(item_id): Path<CartItemId>,
) -> Redirect {
    match state
        .api()
        .remove_cart_item(item_id, customer.bearer())
        .await
    {
        Ok(()) => Redirect::to("/cart"),
        Err(e) => {
            tracing::error!("Failed to remove cart item {item_id}: {e}");
            Redirect::to("/cart?error=remove")
        }
    }
}

/// Apply a coupon code to the cart.
#[instrument(skip(state, customer, form))]
pub async fn coupon(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
    Form(form): Form<CouponForm>,
) -> Redirect {
    let code = form.code.trim();
    if code.is_empty() {
        return Redirect::to("/cart?error=empty_code");
    }

    match state
        .api()
        .apply_coupon(customer.id, code, customer.bearer())
        .await
    {
        Ok(()) => Redirect::to("/cart?success=coupon"),
        Err(e) => {
            tracing::warn!("Coupon rejected: {e}");
            Redirect::to("/cart?error=coupon")
        }
    }
}

/// Turn the cart into an order.
#[instrument(skip(state, customer))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
) -> Redirect {
    match state.api().place_order(customer.id, customer.bearer()).await {
        Ok(()) => {
            add_breadcrumb("cart", "Placed order", None);
            Redirect::to("/cart?success=order")
        }
        Err(e) => {
            tracing::error!("Failed to place order: {e}");
            Redirect::to("/cart?error=order")
        }
    }
}
