//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Dashboard (book grid + search)
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (pings the backend)
//!
//! # Catalog
//! GET  /books/{id}              - Book detail
//!
//! # Cart (requires auth)
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add a book (from book detail)
//! POST /cart/items/{id}         - Set line quantity
//! POST /cart/items/{id}/remove  - Remove a line
//! POST /cart/coupon             - Apply a coupon code
//! POST /cart/checkout           - Place the order
//!
//! # Coupons (requires auth)
//! GET  /coupons                 - Coupon wallet with countdowns
//!
//! # Profile (requires auth)
//! GET  /profile                 - Profile editor
//! POST /profile                 - Save profile changes
//! POST /profile/password        - Change password
//!
//! # Auth (rate limited)
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action
//! GET  /auth/register           - Register page
//! POST /auth/register           - Register action
//! POST /auth/logout             - Logout action
//! ```
//!
//! Every handler follows the same shape: extract identity, call the
//! backend client, map the `Result` into a rendered template or a
//! redirect with a flash code. Mutations are plain forms with
//! redirect-after-POST; there is no client-side state.

pub mod auth;
pub mod books;
pub mod cart;
pub mod coupons;
pub mod dashboard;
pub mod profile;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::middleware::Identity;
use crate::state::AppState;

/// Header context shared by every page template.
///
/// Built from whoever is making the request; templates switch the
/// profile/login links on `signed_in`.
#[derive(Clone, Copy)]
pub struct Nav {
    pub signed_in: bool,
}

impl Nav {
    /// Build the header context from the request's identity.
    pub fn for_visitor(identity: &impl Identity) -> Self {
        Self {
            signed_in: identity.is_signed_in(),
        }
    }
}

/// Flash codes carried across a redirect as query parameters.
///
/// Only fixed tokens travel in the URL; each page maps them back to its
/// own human-readable message.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Create the auth routes router.
///
/// The whole subtree shares the brute-force limiter; the page GETs are
/// cheap and fit comfortably inside the same budget.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        .route_layer(crate::middleware::auth_rate_limiter())
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/items/{id}", post(cart::update))
        .route("/items/{id}/remove", post(cart::remove))
        .route("/coupon", post(cart::coupon))
        .route("/checkout", post(cart::checkout))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::show).post(profile::update))
        .route("/password", post(profile::change_password))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Dashboard is the home page
        .route("/", get(dashboard::index))
        // Book detail
        .route("/books/{id}", get(books::show))
        // Cart routes
        .nest("/cart", cart_routes())
        // Coupon wallet
        .route("/coupons", get(coupons::index))
        // Profile routes
        .nest("/profile", profile_routes())
        // Auth routes
        .nest("/auth", auth_routes())
}
