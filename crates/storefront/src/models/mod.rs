//! Domain models for the storefront.
//!
//! The storefront holds no records of its own; the only local model is
//! the session identity. Everything else arrives from the backend as
//! [`crate::api::types`] and is mapped straight into template view
//! structs.

pub mod session;

pub use session::{CurrentCustomer, keys as session_keys};
