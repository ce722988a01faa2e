//! Artesanía Madera Core - Shared types library.
//!
//! This crate provides common types used across the Artesanía Madera workspace:
//! - `storefront` - Public-facing furniture shop (catalog, cart, checkout)
//! - `integration-tests` - Black-box HTTP tests against the storefront router
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP, no sessions. This
//! keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product/order IDs, prices, emails, and stock levels

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
