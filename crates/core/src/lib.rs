//! Serene Home Core - Shared types and cart logic.
//!
//! This crate provides the domain types used by the storefront:
//! - `storefront` - Catalog, product detail, and cart HTTP service
//! - `integration-tests` - End-to-end tests against the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no async,
//! no storage. Persistence and change observation live in the storefront crate
//! and drive the types defined here.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs and prices
//! - [`cart`] - Line items, cart state, snapshots, and addition detection

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{
    Addition, CartDecodeError, CartSnapshot, CartState, LineItem, Product, detect_additions,
};
pub use types::*;
