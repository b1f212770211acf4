//! Session middleware configuration.
//!
//! Sessions live in a signed cookie backed by an in-memory store. The
//! cookie lasts for the browser session and the store is wiped on
//! restart, which is exactly the lifetime customer sign-in state needs
//! here. Nothing in the session is worth keeping longer.

use secrecy::ExposeSecret;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key, service::SignedCookie};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bookstore_session";

/// Create the session layer with the in-memory store and a signed cookie.
///
/// # Panics
///
/// Panics if the session secret is shorter than 32 bytes; configuration
/// validation rejects such secrets before this is called.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    let store = MemoryStore::default();

    // Key::derive_from stretches the configured secret into a signing key
    let key = Key::derive_from(config.session_secret.expose_secret().as_bytes());

    let is_secure = config.environment == "production";

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnSessionEnd)
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}
