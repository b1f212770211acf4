//! Core types for the BookStore storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod email;
pub mod id;
pub mod price;

pub use address::Address;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
