//! Normalized catalog product.
//!
//! Products are built by the storefront's catalog conversions, which apply
//! the defaults defined here to whatever the content API returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId, StockStatus};

/// Name used when the source record has none.
pub const DEFAULT_NAME: &str = "Sin nombre";

/// Description used when the source record has none.
pub const DEFAULT_DESCRIPTION: &str = "Sin descripción";

/// Image used when the source record has no usable image.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x400?text=Sin+Imagen";

/// Label used for a size entry without a label.
pub const UNKNOWN_SIZE: &str = "N/A";

/// A catalog product with every field normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Opaque document identifier assigned by the content API.
    pub document_id: Option<String>,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock: i64,
    pub active: bool,
    /// Absolute image URLs. Never empty; the first entry is the primary image.
    pub images: Vec<String>,
    /// Size labels in source order.
    pub sizes: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// A product carrying only defaults.
    #[must_use]
    pub fn placeholder(id: ProductId) -> Self {
        Self {
            id,
            document_id: None,
            name: DEFAULT_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            price: Price::ZERO,
            stock: 0,
            active: true,
            images: vec![PLACEHOLDER_IMAGE.to_string()],
            sizes: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// The first image, or the placeholder when there is none.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images.first().map_or(PLACEHOLDER_IMAGE, String::as_str)
    }

    /// In stock and active.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.stock_status().is_available()
    }

    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        StockStatus::from_stock(self.stock, self.active)
    }

    #[must_use]
    pub fn has_multiple_images(&self) -> bool {
        self.images.len() > 1
    }

    /// Text of a single-product WhatsApp inquiry.
    #[must_use]
    pub fn inquiry_message(&self) -> String {
        format!(
            "Hola! Estoy interesado en el producto: {} - ${}",
            self.name, self.price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64, active: bool) -> Product {
        Product {
            stock,
            active,
            ..Product::placeholder(ProductId::new(1))
        }
    }

    #[test]
    fn test_availability_needs_stock_and_active_flag() {
        assert!(product(1, true).is_available());
        assert!(!product(0, true).is_available());
        assert!(!product(5, false).is_available());
        assert_eq!(product(0, true).stock_status().label(), "Agotado");
        assert_eq!(product(2, true).stock_status().label(), "En Stock");
    }

    #[test]
    fn test_primary_image_falls_back_to_placeholder() {
        let mut p = product(1, true);
        assert_eq!(p.primary_image(), PLACEHOLDER_IMAGE);
        assert!(!p.has_multiple_images());

        p.images = Vec::new();
        assert_eq!(p.primary_image(), PLACEHOLDER_IMAGE);

        p.images = vec!["https://cdn/a.jpg".to_string(), "https://cdn/b.jpg".to_string()];
        assert_eq!(p.primary_image(), "https://cdn/a.jpg");
        assert!(p.has_multiple_images());
    }

    #[test]
    fn test_inquiry_message_uses_raw_price() {
        let p = Product {
            name: "Zapato Rojo".to_string(),
            price: Price::parse_lenient("120000.00"),
            ..Product::placeholder(ProductId::new(3))
        };
        assert_eq!(
            p.inquiry_message(),
            "Hola! Estoy interesado en el producto: Zapato Rojo - $120000"
        );
    }
}
