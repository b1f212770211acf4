//! BookStore Core - Shared types library.
//!
//! This crate provides the domain types shared by BookStore components,
//! currently just the `storefront` binary.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - The address codec plus newtype wrappers for type-safe IDs,
//!   prices, and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
