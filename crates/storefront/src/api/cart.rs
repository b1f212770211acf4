//! Cart, coupon, and order calls. Never cached; the cart must always
//! reflect what the backend holds right now.

use bookstore_core::{BookId, CartItemId, CustomerId};
use reqwest::Method;
use tracing::instrument;

use super::ApiError;
use super::client::ApiClient;
use super::types::{CartItem, Coupon};

impl ApiClient {
    /// Current cart lines for a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be parsed.
    #[instrument(skip(self, token), fields(customer_id = %customer_id))]
    pub async fn cart_items(
        &self,
        customer_id: CustomerId,
        token: Option<&str>,
    ) -> Result<Vec<CartItem>, ApiError> {
        self.get_json(&format!("/api/cart/{customer_id}"), token)
            .await
    }

    /// Add a book to the customer's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the item or the request
    /// fails.
    #[instrument(skip(self, token), fields(customer_id = %customer_id, book_id = %book_id))]
    pub async fn add_cart_item(
        &self,
        customer_id: CustomerId,
        book_id: BookId,
        quantity: u32,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "bookId": book_id, "quantity": quantity });
        self.send_empty(
            Method::POST,
            &format!("/api/cart/{customer_id}/items"),
            &body,
            token,
        )
        .await
    }

    /// Set the quantity of one cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change or the request
    /// fails.
    #[instrument(skip(self, token), fields(item_id = %item_id))]
    pub async fn set_cart_quantity(
        &self,
        item_id: CartItemId,
        quantity: u32,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "quantity": quantity });
        self.send_empty(
            Method::PUT,
            &format!("/api/cart/items/{item_id}"),
            &body,
            token,
        )
        .await
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(item_id = %item_id))]
    pub async fn remove_cart_item(
        &self,
        item_id: CartItemId,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        self.delete(&format!("/api/cart/items/{item_id}"), token)
            .await
    }

    /// Apply a coupon code to the customer's cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the code is invalid or expired, with the
    /// backend's message when it sends one.
    #[instrument(skip(self, code, token), fields(customer_id = %customer_id))]
    pub async fn apply_coupon(
        &self,
        customer_id: CustomerId,
        code: &str,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "code": code });
        self.send_empty(
            Method::POST,
            &format!("/api/cart/{customer_id}/coupon"),
            &body,
            token,
        )
        .await
    }

    /// Turn the customer's cart into an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the order or the request
    /// fails.
    #[instrument(skip(self, token), fields(customer_id = %customer_id))]
    pub async fn place_order(
        &self,
        customer_id: CustomerId,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "customerId": customer_id });
        self.send_empty(Method::POST, "/api/orders", &body, token)
            .await
    }

    /// Coupons granted to a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be parsed.
    #[instrument(skip(self, token), fields(customer_id = %customer_id))]
    pub async fn coupons(
        &self,
        customer_id: CustomerId,
        token: Option<&str>,
    ) -> Result<Vec<Coupon>, ApiError> {
        self.get_json(&format!("/api/coupons/{customer_id}"), token)
            .await
    }
}
