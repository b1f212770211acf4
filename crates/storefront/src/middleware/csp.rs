//! Per-request nonce for the content security policy.
//!
//! The storefront serves exactly one inline script, the coupon page's
//! countdown ticker, and the CSP blocks inline scripts unless they carry
//! a nonce matching the header. This middleware mints the nonce,
//! `security_headers` writes it into the CSP header, and the coupons
//! template stamps it on its `<script>` tag.

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;

/// Nonce tying an inline `<script>` to the response's CSP header.
#[derive(Clone, Debug)]
pub struct CspNonce(pub String);

impl CspNonce {
    /// Mint a fresh nonce: 128 random bits, base64-encoded.
    #[must_use]
    pub fn mint() -> Self {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        Self(STANDARD.encode(bytes))
    }
}

/// Store a fresh nonce in the request extensions.
///
/// Layered outside `security_headers_middleware`, so the nonce is already
/// present when that middleware builds the CSP header.
pub async fn csp_nonce_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(CspNonce::mint());
    next.run(request).await
}

/// Extractor handing templates the request's nonce.
///
/// A missing nonce means the middleware stack is wired wrong. The
/// extractor then yields an empty value: the page still renders, and the
/// CSP header simply keeps the inline script from running.
impl<S> FromRequestParts<S> for CspNonce
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_else(|| {
            tracing::warn!("No CSP nonce in request extensions; check the middleware order");
            Self(String::new())
        }))
    }
}
