//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - Session-backed cart persistence
//! - `whatsapp` - `wa.me` deep links for inquiries and checkout

pub mod cart;
pub mod whatsapp;
