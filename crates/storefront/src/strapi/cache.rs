//! Cache types for content API responses.

use std::sync::Arc;

use lulu_core::{Product, ProductId};

/// Cache key for catalog requests.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(ProductId),
    Filtered { search: String, available: bool },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Box<Product>),
}
