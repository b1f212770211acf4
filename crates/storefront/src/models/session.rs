//! Session-related types.
//!
//! Types stored in the session for authentication state.

use bookstore_core::CustomerId;
use serde::{Deserialize, Serialize};

/// Session-stored customer identity.
///
/// Minimal data kept in the session to identify the signed-in customer:
/// the backend id plus the bearer token, when login returned one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentCustomer {
    /// Customer's backend id.
    pub id: CustomerId,
    /// Bearer token for backend calls, if the backend issued one.
    pub token: Option<String>,
}

impl CurrentCustomer {
    /// Build the identity stored at sign-in.
    #[must_use]
    pub const fn new(id: CustomerId, token: Option<String>) -> Self {
        Self { id, token }
    }

    /// Token in the borrowed form backend calls take.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the signed-in customer.
    pub const CURRENT_CUSTOMER: &str = "current_customer";
}
