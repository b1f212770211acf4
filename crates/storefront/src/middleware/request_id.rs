//! Request id middleware.
//!
//! Every request carries an `x-request-id`: the upstream proxy's value
//! when it sent a usable one, otherwise a fresh UUID v4. The id is
//! recorded on the tracing span, tagged on the Sentry scope, and echoed
//! in the response so a customer report can be matched to server logs.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id we echo back; anything bigger gets replaced.
const MAX_ID_LENGTH: usize = 128;

/// Attach a request id to the span, the Sentry scope, and the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|id| !id.is_empty() && id.len() <= MAX_ID_LENGTH)
        .map_or_else(new_request_id, str::to_owned);

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}
