//! Bookstore storefront library.
//!
//! Server-rendered storefront over the bookstore's REST backend: the
//! catalog, book pages, cart, coupons, profile, and authentication all
//! live here. The binary in `main.rs` wires these modules to a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
