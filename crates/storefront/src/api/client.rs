//! HTTP transport shared by every backend call.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::config::ApiConfig;

use super::cache::CacheValue;
use super::{ApiError, extract_message};

/// Client for the bookstore REST backend.
///
/// Cheap to clone; all state lives behind an `Arc`. Catalog responses are
/// cached for 5 minutes, everything else goes straight through.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                cache,
            }),
        }
    }

    pub(super) fn cache(&self) -> &Cache<String, CacheValue> {
        &self.inner.cache
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.inner.base_url);
        let mut request = self.inner.client.request(method, url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Map the response status the same way for every call, then hand
    /// back the body text.
    async fn handle(path: &str, response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }

        // Body as text first for better error diagnostics
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            error!(
                status = %status,
                path,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_message(&body)
                    .unwrap_or_else(|| body.chars().take(200).collect()),
            });
        }

        Ok(body)
    }

    fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, ApiError> {
        match serde_json::from_str(body) {
            Ok(value) => Ok(value),
            Err(e) => {
                error!(
                    error = %e,
                    path,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse backend response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    /// GET a JSON resource.
    pub(super) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let response = self.request(Method::GET, path, token).send().await?;
        let body = Self::handle(path, response).await?;
        Self::decode(path, &body)
    }

    /// GET a plain-text resource; trimmed, `None` when blank.
    pub(super) async fn get_text(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<Option<String>, ApiError> {
        let response = self
            .request(Method::GET, path, token)
            .header(header::ACCEPT, "text/plain")
            .send()
            .await?;
        let body = Self::handle(path, response).await?;
        let trimmed = body.trim();
        Ok(if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        })
    }

    /// Send a JSON body and decode a JSON reply.
    pub(super) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(method, path, token)
            .json(body)
            .send()
            .await?;
        let text = Self::handle(path, response).await?;
        Self::decode(path, &text)
    }

    /// Send a JSON body and ignore whatever comes back.
    pub(super) async fn send_empty<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        let response = self
            .request(method, path, token)
            .json(body)
            .send()
            .await?;
        Self::handle(path, response).await?;
        Ok(())
    }

    /// DELETE with no body.
    pub(super) async fn delete(&self, path: &str, token: Option<&str>) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, path, token).send().await?;
        Self::handle(path, response).await?;
        Ok(())
    }

    /// One round trip to the backend's health endpoint, for the readiness
    /// probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let response = self.request(Method::GET, "/health", None).send().await?;
        Self::handle("/health", response).await?;
        Ok(())
    }
}
