//! Shopping cart state machine.
//!
//! The cart is an ordered list of line items with at most one line per
//! product. It serializes to a single JSON array; callers persist that blob
//! after every mutation.
//!
//! # Persisted format
//!
//! ```json
//! [{"id": 1, "documentId": "abc", "nombre": "Zapato Rojo",
//!   "precio": "120000", "imagen": "https://...", "cantidad": 2}]
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::Product;
use crate::types::{Price, ProductId};

/// Errors converting a cart to or from its persisted form.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("failed to decode persisted cart: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode cart: {0}")]
    Encode(#[source] serde_json::Error),
}

/// One product in the cart with its requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    #[serde(
        rename = "documentId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub document_id: Option<String>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: Price,
    #[serde(rename = "imagen")]
    pub image: String,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
}

impl CartLineItem {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            document_id: product.document_id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.primary_image().to_string(),
            quantity: 1,
        }
    }

    /// Price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from stored line items.
    ///
    /// Lines with a zero quantity are dropped and duplicate products are
    /// merged into the first occurrence.
    #[must_use]
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match cart.position(item.id) {
                Some(idx) => {
                    if let Some(existing) = cart.items.get_mut(idx) {
                        existing.quantity = existing.quantity.saturating_add(item.quantity);
                    }
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Decode a persisted cart blob.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Decode`] if the blob is not a valid line-item array.
    pub fn from_json(blob: &str) -> Result<Self, CartError> {
        let items: Vec<CartLineItem> = serde_json::from_str(blob).map_err(CartError::Decode)?;
        Ok(Self::from_items(items))
    }

    /// Encode the full line-item list for persistence.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Encode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, CartError> {
        serde_json::to_string(&self.items).map_err(CartError::Encode)
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Add one unit of a product, merging with an existing line.
    pub fn add(&mut self, product: &Product) {
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(CartLineItem::from_product(product)),
        }
    }

    /// Remove a product's line. Returns `true` if a line was removed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Change a line's quantity by `delta`.
    ///
    /// The line is removed when the resulting quantity is zero or below.
    /// Returns `false` when the product is not in the cart.
    pub fn update_quantity(&mut self, id: ProductId, delta: i64) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        let Some(item) = self.items.get_mut(idx) else {
            return false;
        };

        let quantity = i64::from(item.quantity).saturating_add(delta);
        if quantity <= 0 {
            self.items.remove(idx);
        } else {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        true
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |sum, item| sum.saturating_add(item.quantity))
    }

    /// Sum of price times quantity across all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartLineItem::subtotal).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Itemized order summary sent through WhatsApp.
    ///
    /// Returns an empty string for an empty cart.
    #[must_use]
    pub fn checkout_message(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut message =
            String::from("¡Hola! Estoy interesado en los siguientes productos:\n\n");

        for (index, item) in self.items.iter().enumerate() {
            message.push_str(&format!("{}. {}\n", index + 1, item.name));
            message.push_str(&format!("   Cantidad: {}\n", item.quantity));
            message.push_str(&format!(
                "   Precio unitario: ${}\n",
                item.price.format_es()
            ));
            message.push_str(&format!(
                "   Subtotal: ${}\n\n",
                item.subtotal().format_es()
            ));
        }

        message.push_str(&format!("*Total: ${}*", self.total().format_es()));
        message
    }
}
