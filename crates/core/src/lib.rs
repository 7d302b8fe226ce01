//! Shoes Lulu Core - Shared domain types.
//!
//! This crate provides the domain model used across all Shoes Lulu components:
//! - `storefront` - Public catalog, cart and WhatsApp checkout handoff
//! - `cli` - Command-line tools for inspecting the remote catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no session access. Persistence and fetching live in the
//! storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and stock status
//! - [`product`] - Normalized catalog product
//! - [`cart`] - Cart line items and the cart state machine
//! - [`catalog`] - Search, availability filter and sort pipeline
//! - [`collate`] - Locale-aware name comparison

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod collate;
pub mod product;
pub mod types;

pub use cart::{Cart, CartError, CartLineItem};
pub use catalog::{Availability, Catalog, CatalogQuery, SortOrder, product_count_label};
pub use product::Product;
pub use types::*;
