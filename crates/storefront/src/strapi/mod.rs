//! Content API client for the product catalog.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest` 0.13; the content API is the source of truth
//! - Raw records are decoded leniently and normalized into [`lulu_core::Product`]
//! - In-memory caching via `moka` for catalog responses (5 minute TTL by default)
//! - Every request is bounded by the configured timeout; there are no retries
//!
//! # Endpoints
//!
//! - `GET {api}/zapatoes?populate=*` - full catalog
//! - `GET {api}/zapatoes/{id}?populate=*` - single product
//! - `GET {api}/zapatoes?filters[...]&populate=*` - server-side filtering
//!
//! # Example
//!
//! ```rust,ignore
//! use lulu_storefront::strapi::{ProductFilters, StrapiClient};
//!
//! let client = StrapiClient::new(&config.catalog)?;
//!
//! let products = client.get_products().await?;
//! let available = client
//!     .filter_products(&ProductFilters { search: None, available: true })
//!     .await?;
//! ```

mod cache;
mod client;
pub mod conversions;
pub mod types;

pub use client::{ProductFilters, StrapiClient};

use std::time::Duration;

use lulu_core::ProductId;
use thiserror::Error;

/// Errors that can occur when talking to the content API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No complete response arrived within the configured wait.
    #[error("Request timed out after {} seconds", .0.as_secs())]
    RequestTimeout(Duration),

    /// The API answered with a non-success status.
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// Transport failure (connection refused, DNS, TLS, ...).
    #[error("Fetch error: {0}")]
    Fetch(#[source] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The requested product does not exist.
    #[error("Not found: product {0}")]
    NotFound(ProductId),

    /// The configured API URL cannot carry path segments.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl CatalogError {
    /// Map a `reqwest` failure, keeping timeouts distinct from other errors.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::RequestTimeout(timeout)
        } else if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
            }
        } else {
            Self::Fetch(err)
        }
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestTimeout(_))
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Message shown to visitors when the catalog cannot be loaded.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::RequestTimeout(_) => {
                "La solicitud ha excedido el tiempo de espera".to_string()
            }
            Self::Http { status } => format!("Error HTTP, estado: {status}"),
            Self::NotFound(_) => "Producto no encontrado".to_string(),
            Self::Fetch(_) | Self::Parse(_) | Self::InvalidUrl(_) => {
                "No fue posible conectar con el catálogo".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound(ProductId::new(42));
        assert_eq!(err.to_string(), "Not found: product 42");

        let err = CatalogError::Http { status: 503 };
        assert_eq!(err.to_string(), "HTTP error: status 503");

        let err = CatalogError::RequestTimeout(Duration::from_secs(60));
        assert_eq!(err.to_string(), "Request timed out after 60 seconds");
    }

    #[test]
    fn test_timeout_is_distinct_from_http() {
        let timeout = CatalogError::RequestTimeout(Duration::from_secs(1));
        let http = CatalogError::Http { status: 500 };

        assert!(timeout.is_timeout());
        assert!(!http.is_timeout());
        assert_ne!(timeout.user_message(), http.user_message());
    }

    #[test]
    fn test_user_message_mentions_status() {
        let err = CatalogError::Http { status: 404 };
        assert!(err.user_message().contains("404"));
    }
}
