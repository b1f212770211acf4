//! Customer account calls: login, registration, profile.

use bookstore_core::CustomerId;
use reqwest::Method;
use tracing::instrument;

use super::ApiError;
use super::client::ApiClient;
use super::types::{AuthResponse, CustomerProfile, CustomerUpdate, Registration};

impl ApiClient {
    /// Exchange credentials for a customer id and optional bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for bad credentials, or an
    /// error if the request fails.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.send_json(Method::POST, "/api/auth/login", &body, None)
            .await
    }

    /// Create a new account. A successful response carries the new
    /// customer's id so the caller can sign them in immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration or the
    /// request fails.
    #[instrument(skip_all)]
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        self.send_json(Method::POST, "/api/customers/register", registration, None)
            .await
    }

    /// Fetch a customer's profile record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown customer, or an
    /// error if the request fails.
    #[instrument(skip(self, token), fields(customer_id = %customer_id))]
    pub async fn profile(
        &self,
        customer_id: CustomerId,
        token: Option<&str>,
    ) -> Result<CustomerProfile, ApiError> {
        self.get_json(&format!("/api/customers/{customer_id}"), token)
            .await
    }

    /// Update profile fields. The reply body is ignored; callers re-fetch
    /// the profile for the fresh record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update or the request
    /// fails.
    #[instrument(skip(self, update, token), fields(customer_id = %customer_id))]
    pub async fn update_profile(
        &self,
        customer_id: CustomerId,
        update: &CustomerUpdate,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        self.send_empty(
            Method::PUT,
            &format!("/api/customers/{customer_id}"),
            update,
            token,
        )
        .await
    }

    /// Change the account password.
    ///
    /// # Errors
    ///
    /// Returns an error if the current password is wrong or the request
    /// fails.
    #[instrument(skip_all, fields(customer_id = %customer_id))]
    pub async fn change_password(
        &self,
        customer_id: CustomerId,
        current_password: &str,
        new_password: &str,
        token: Option<&str>,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({
            "userId": customer_id,
            "currentPassword": current_password,
            "newPassword": new_password,
        });
        self.send_empty(Method::POST, "/api/customers/change-password", &body, token)
            .await
    }
}
